//! URL state: listing state <-> query string, article ids, and hrefs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::article::slugify;
use crate::listing::{ListingState, SortMode, ViewMode, ALL_TAGS};

pub(crate) fn pairs(query: &str) -> Vec<(String, String)> {
    let query = query.trim().trim_start_matches('?');
    serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_default()
}

/// Last value of `key`, if any.
pub(crate) fn param(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

impl ListingState {
    /// Reads `q`, `tag`, `sort` and `view`. Unknown keys are ignored and
    /// unknown values fall back to their defaults.
    pub fn from_query(query: &str) -> Self {
        let pairs = pairs(query);
        let state = Self::default();
        let state = match param(&pairs, "q") {
            Some(q) => state.with_query(&q),
            None => state,
        };
        let state = match param(&pairs, "tag") {
            Some(tag) => state.with_tag(&tag),
            None => state,
        };
        let sort = param(&pairs, "sort")
            .and_then(|s| SortMode::parse(&s))
            .unwrap_or_default();
        let view = param(&pairs, "view")
            .and_then(|v| ViewMode::parse(&v))
            .unwrap_or_default();
        state.with_sort(sort).with_view(view)
    }

    /// Query string (without `?`) holding only non-default fields.
    pub fn to_query(&self) -> String {
        let mut fields: Vec<(&str, &str)> = Vec::new();
        if !self.query.is_empty() {
            fields.push(("q", &self.query));
        }
        if self.tag != ALL_TAGS {
            fields.push(("tag", &self.tag));
        }
        if self.sort != SortMode::default() {
            fields.push(("sort", self.sort.as_str()));
        }
        if self.view != ViewMode::default() {
            fields.push(("view", self.view.as_str()));
        }
        serde_urlencoded::to_string(&fields).unwrap_or_default()
    }
}

/// Trimmed `id` parameter, `None` when missing or blank.
pub fn article_id(query: &str) -> Option<String> {
    param(&pairs(query), "id")
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
}

/// File stems for the static tree, keyed by article id and by lower-cased
/// tag. Keys whose slugs collide get `-2`, `-3`, ... in first-seen order, so
/// distinct ids and tags never share a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticPaths {
    articles: HashMap<String, String>,
    tags: HashMap<String, String>,
}

impl StaticPaths {
    pub fn new<'a, I, T>(ids: I, tags: T) -> Self
    where
        I: IntoIterator<Item = &'a str>,
        T: IntoIterator<Item = &'a str>,
    {
        Self {
            articles: assign_stems(ids),
            tags: assign_stems(tags),
        }
    }

    pub fn article(&self, id: &str) -> String {
        self.articles
            .get(id)
            .cloned()
            .unwrap_or_else(|| slugify(id))
    }

    pub fn tag(&self, tag: &str) -> String {
        self.tags.get(tag).cloned().unwrap_or_else(|| slugify(tag))
    }
}

fn assign_stems<'a>(keys: impl IntoIterator<Item = &'a str>) -> HashMap<String, String> {
    let mut stems = HashMap::new();
    let mut used = HashSet::new();
    for key in keys {
        if stems.contains_key(key) {
            continue;
        }
        let base = slugify(key);
        let mut stem = base.clone();
        let mut n = 2;
        while !used.insert(stem.clone()) {
            stem = format!("{base}-{n}");
            n += 1;
        }
        stems.insert(key.to_string(), stem);
    }
    stems
}

/// How pages link to each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Links {
    /// Preview server: state travels in query strings.
    Server,
    /// Static tree: one file per article and per tag. `root` is the relative
    /// prefix from the current page back to the site root.
    Static {
        root: String,
        paths: Arc<StaticPaths>,
    },
}

impl Links {
    pub fn static_at_depth(depth: usize, paths: Arc<StaticPaths>) -> Self {
        Self::Static {
            root: "../".repeat(depth),
            paths,
        }
    }

    pub fn is_server(&self) -> bool {
        matches!(self, Self::Server)
    }

    /// Prefix from the current page back to the site root.
    pub fn root(&self) -> &str {
        match self {
            Self::Server => "/",
            Self::Static { root, .. } => root,
        }
    }

    pub fn article(&self, id: &str) -> String {
        match self {
            Self::Server => format!("/article.html?id={}", urlencoding::encode(id)),
            Self::Static { root, paths } => format!("{root}article/{}.html", paths.article(id)),
        }
    }

    pub fn listing(&self, state: &ListingState) -> String {
        match self {
            Self::Server => {
                let query = state.to_query();
                if query.is_empty() {
                    "/".to_string()
                } else {
                    format!("/?{query}")
                }
            }
            Self::Static { root, paths } if state.tag != ALL_TAGS => {
                format!("{root}tags/{}.html", paths.tag(&state.tag))
            }
            Self::Static { root, .. } => match state.view {
                ViewMode::Grid => format!("{root}index.html"),
                ViewMode::List => format!("{root}list.html"),
            },
        }
    }

    /// Portfolio page, with `query` (without `?`) appended when non-empty.
    pub fn landing(&self, query: &str) -> String {
        let page = format!("{}home.html", self.root());
        if query.is_empty() {
            page
        } else {
            format!("{page}?{query}")
        }
    }

    /// Site-relative asset paths are re-rooted; absolute paths and URLs pass through.
    pub fn asset(&self, path: &str) -> String {
        if is_absolute(path) {
            path.to_string()
        } else {
            format!("{}{path}", self.root())
        }
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.contains("://") || path.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_has_empty_query() {
        assert_eq!(ListingState::default().to_query(), "");
        assert_eq!(ListingState::from_query(""), ListingState::default());
        assert_eq!(ListingState::from_query("?"), ListingState::default());
    }

    #[test]
    fn round_trip_non_default_state() {
        let state = ListingState::default()
            .with_query("ospf & bgp")
            .with_tag("Networking")
            .with_sort(SortMode::Title)
            .with_view(ViewMode::List);
        let query = state.to_query();
        assert_eq!(query, "q=ospf+%26+bgp&tag=networking&sort=title&view=list");
        assert_eq!(ListingState::from_query(&query), state);
        assert_eq!(ListingState::from_query(&format!("?{query}")), state);
    }

    #[test]
    fn unknown_values_fall_back() {
        let state = ListingState::from_query("sort=random&view=cards&tag=&extra=1");
        assert_eq!(state, ListingState::default());
    }

    #[test]
    fn last_duplicate_wins() {
        let state = ListingState::from_query("sort=oldest&sort=title");
        assert_eq!(state.sort, SortMode::Title);
    }

    #[test]
    fn article_id_extraction() {
        assert_eq!(article_id("?id=%20abc%20"), Some("abc".to_string()));
        assert_eq!(article_id("id=a%2Fb"), Some("a/b".to_string()));
        assert_eq!(article_id("id="), None);
        assert_eq!(article_id("other=1"), None);
    }

    #[test]
    fn server_links_carry_state() {
        let links = Links::Server;
        assert_eq!(links.article("a b"), "/article.html?id=a%20b");
        assert_eq!(links.listing(&ListingState::default()), "/");
        assert_eq!(
            links.listing(&ListingState::default().with_tag("rust")),
            "/?tag=rust"
        );
        assert_eq!(links.asset("default.jpg"), "/default.jpg");
    }

    #[test]
    fn static_links_are_relative() {
        let links = Links::static_at_depth(1, Arc::default());
        assert_eq!(links.article("Hello World"), "../article/hello-world.html");
        assert_eq!(links.listing(&ListingState::default()), "../index.html");
        assert_eq!(
            links.listing(&ListingState::default().with_view(ViewMode::List)),
            "../list.html"
        );
        assert_eq!(
            links.listing(&ListingState::default().with_tag("CCNA")),
            "../tags/ccna.html"
        );
        assert_eq!(links.landing(""), "../home.html");
        assert_eq!(links.asset("img/a.png"), "../img/a.png");
        assert_eq!(links.asset("https://cdn/x.png"), "https://cdn/x.png");
    }

    #[test]
    fn colliding_slugs_get_distinct_stems() {
        let paths = StaticPaths::new(
            ["Hello World", "hello-world", "Hello World", "hello-world-2"],
            ["c++", "c#", "??", "!!"],
        );
        assert_eq!(paths.article("Hello World"), "hello-world");
        assert_eq!(paths.article("hello-world"), "hello-world-2");
        assert_eq!(paths.article("hello-world-2"), "hello-world-2-2");
        assert_eq!(paths.tag("c++"), "c");
        assert_eq!(paths.tag("c#"), "c-2");
        assert_eq!(paths.tag("??"), "untitled");
        assert_eq!(paths.tag("!!"), "untitled-2");

        let links = Links::static_at_depth(0, Arc::new(paths));
        assert_eq!(links.article("hello-world"), "article/hello-world-2.html");
        assert_eq!(
            links.listing(&ListingState::default().with_tag("C#")),
            "tags/c-2.html"
        );
    }
}
