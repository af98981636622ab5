//! Single-article view: resolve an id against the store, or explain why not.

use serde::Serialize;

use crate::article::{format_date, format_time, reading_time, ArticleRecord};
use crate::config::DisplayConfig;
use crate::error::LoadError;
use crate::markup::Markup;
use crate::store::ArticleStore;

/// Why no article is shown. All variants render through the same panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusPanel {
    MissingId,
    NotFound,
    LoadFailed,
}

impl StatusPanel {
    pub fn title(self) -> &'static str {
        match self {
            Self::MissingId => "Article ID missing",
            Self::NotFound => "Article not found",
            Self::LoadFailed => "Failed to load articles",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::MissingId | Self::NotFound => {
                "Open the article from the listing page or check the URL."
            }
            Self::LoadFailed => "The article index could not be fetched. Reload to try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RibbonTag {
    pub label: String,
    pub class: String,
}

/// Ribbons for an article: `FEATURED` plus one per configured title keyword.
pub fn ribbons(record: &ArticleRecord, display: &DisplayConfig) -> Vec<RibbonTag> {
    let mut list = Vec::new();
    if record.featured {
        list.push(RibbonTag {
            label: "FEATURED".to_string(),
            class: "featured".to_string(),
        });
    }
    let title = record.title.to_lowercase();
    for ribbon in &display.ribbons {
        if !ribbon.keyword.is_empty() && title.contains(&ribbon.keyword.to_lowercase()) {
            list.push(RibbonTag {
                label: ribbon.label.clone(),
                class: ribbon
                    .class
                    .clone()
                    .unwrap_or_else(|| ribbon.keyword.to_lowercase()),
            });
        }
    }
    list
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticlePage {
    pub id: String,
    pub document_title: String,
    pub title: String,
    pub summary: String,
    pub cover: String,
    pub ribbons: Vec<RibbonTag>,
    pub date: String,
    pub time: String,
    pub reading_time: String,
    pub verified: bool,
    pub tags: Vec<String>,
    /// Rendered body, already escaped.
    pub body_html: String,
}

impl ArticlePage {
    pub fn new(
        record: &ArticleRecord,
        markup: &Markup,
        display: &DisplayConfig,
        site_title: &str,
    ) -> Self {
        let offset = display.offset();
        let title = record.display_title().to_string();
        Self {
            id: record.id.clone(),
            document_title: format!("{title} | {site_title}"),
            title,
            summary: record.summary.clone(),
            cover: record.cover_or(&display.default_cover).to_string(),
            ribbons: ribbons(record, display),
            date: format_date(record.datetime, &offset),
            time: format_time(record.datetime, &offset),
            reading_time: reading_time(&record.content, display.words_per_minute),
            verified: record.verified,
            tags: record.tags.iter().take(display.article_tags).cloned().collect(),
            body_html: markup.render(&record.content),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderView {
    Article(Box<ArticlePage>),
    Status(StatusPanel),
}

impl ReaderView {
    pub fn status(&self) -> Option<StatusPanel> {
        match self {
            Self::Article(_) => None,
            Self::Status(s) => Some(*s),
        }
    }
}

/// Resolves `id` against the loaded store. Never fails: missing ids, unknown
/// ids and load failures each map to a [`StatusPanel`].
pub fn resolve(
    id: Option<&str>,
    store: Result<&ArticleStore, &LoadError>,
    markup: &Markup,
    display: &DisplayConfig,
    site_title: &str,
) -> ReaderView {
    let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
        return ReaderView::Status(StatusPanel::MissingId);
    };
    let store = match store {
        Ok(store) => store,
        Err(_) => return ReaderView::Status(StatusPanel::LoadFailed),
    };
    match store.find(id) {
        Some(record) => ReaderView::Article(Box::new(ArticlePage::new(
            record, markup, display, site_title,
        ))),
        None => ReaderView::Status(StatusPanel::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ArticleStore {
        ArticleStore::from_json(
            br###"[
                {"id": "ccna-labs", "title": "CCNA <Labs>", "featured": true,
                 "datetime": "2024-06-01T09:15:00Z", "content": "## Intro\nhello",
                 "tags": ["a","b","c","d","e","f","g","h","i"], "verified": true},
                {"id": "plain", "title": "", "content": ""}
            ]"###,
        )
        .unwrap()
    }

    fn run(id: Option<&str>, store: Result<&ArticleStore, &LoadError>) -> ReaderView {
        let markup = Markup::new().unwrap();
        resolve(id, store, &markup, &DisplayConfig::default(), "Folio")
    }

    #[test]
    fn missing_id_is_reported_before_loading() {
        let err = LoadError::Shape;
        assert_eq!(run(None, Err(&err)).status(), Some(StatusPanel::MissingId));
        assert_eq!(run(Some("  "), Ok(&store())).status(), Some(StatusPanel::MissingId));
    }

    #[test]
    fn unknown_id_is_not_found() {
        assert_eq!(
            run(Some("nope"), Ok(&store())).status(),
            Some(StatusPanel::NotFound)
        );
    }

    #[test]
    fn load_failure_is_distinct_state() {
        let err = LoadError::Status {
            url: "http://x/articles.json".into(),
            status: 404,
        };
        assert_eq!(
            run(Some("plain"), Err(&err)).status(),
            Some(StatusPanel::LoadFailed)
        );
    }

    #[test]
    fn found_article_is_fully_populated() {
        let ReaderView::Article(page) = run(Some("ccna-labs"), Ok(&store())) else {
            panic!("expected article");
        };
        assert_eq!(page.document_title, "CCNA <Labs> | Folio");
        assert_eq!(page.body_html, "<h2>Intro</h2><p>hello</p>");
        assert_eq!(page.date, "Jun 01, 2024");
        assert_eq!(page.time, "09:15");
        assert_eq!(page.tags.len(), 8);
        assert!(page.verified);
        let labels: Vec<_> = page.ribbons.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["FEATURED", "CCNA"]);
    }

    #[test]
    fn empty_article_uses_placeholders() {
        let ReaderView::Article(page) = run(Some("plain"), Ok(&store())) else {
            panic!("expected article");
        };
        assert_eq!(page.title, "Untitled");
        assert_eq!(page.cover, crate::config::BUILTIN_COVER);
        assert_eq!(page.body_html, crate::markup::NO_CONTENT);
        assert!(page.ribbons.is_empty());
    }
}
