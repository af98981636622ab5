use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::{Ord, Ordering, PartialOrd};
use std::path::PathBuf;

/// One generated page, as recorded in the site manifest.
#[derive(Debug, PartialEq, Eq, Serialize, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageNode {
    Listing {
        path: PathBuf,
        tag: Option<String>,
        articles: usize,
    },
    Article {
        path: PathBuf,
        id: String,
        title: String,
        datetime: Option<DateTime<Utc>>,
    },
    Landing {
        path: PathBuf,
    },
}

impl PageNode {
    pub fn path(&self) -> &PathBuf {
        match self {
            PageNode::Listing { path, .. }
            | PageNode::Article { path, .. }
            | PageNode::Landing { path } => path,
        }
    }
}

impl PartialOrd for PageNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PageNode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // an article must be less than any other page
            (PageNode::Article { .. }, PageNode::Listing { .. } | PageNode::Landing { .. }) => {
                Ordering::Less
            }
            (PageNode::Listing { .. } | PageNode::Landing { .. }, PageNode::Article { .. }) => {
                Ordering::Greater
            }
            (
                PageNode::Article {
                    path: path1,
                    datetime: date1,
                    ..
                },
                PageNode::Article {
                    path: path2,
                    datetime: date2,
                    ..
                },
            ) => {
                // newest first, undated last
                let t1 = date1.map_or(0, |d| d.timestamp());
                let t2 = date2.map_or(0, |d| d.timestamp());
                t2.cmp(&t1).then_with(|| path1.cmp(path2))
            }
            (a, b) => a.path().cmp(b.path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::parse_timestamp;

    fn article(path: &str, date: &str) -> PageNode {
        PageNode::Article {
            path: path.into(),
            id: path.into(),
            title: path.into(),
            datetime: parse_timestamp(date),
        }
    }

    fn listing(path: &str) -> PageNode {
        PageNode::Listing {
            path: path.into(),
            tag: None,
            articles: 0,
        }
    }

    #[test]
    fn articles_precede_listings_newest_first() {
        let mut nodes = vec![
            listing("tags/rust.html"),
            PageNode::Landing {
                path: "home.html".into(),
            },
            article("article/old.html", "2023-01-01"),
            listing("index.html"),
            article("article/undated.html", ""),
            article("article/new.html", "2024-01-01"),
            article("article/also-new.html", "2024-01-01"),
        ];
        nodes.sort();
        let paths: Vec<_> = nodes.iter().map(|n| n.path().to_str().unwrap()).collect();
        assert_eq!(
            paths,
            [
                "article/also-new.html",
                "article/new.html",
                "article/old.html",
                "article/undated.html",
                "home.html",
                "index.html",
                "tags/rust.html",
            ]
        );
    }

    #[test]
    fn manifest_serializes_with_kind_tag() {
        let json = serde_json::to_value(listing("index.html")).unwrap();
        assert_eq!(json["kind"], "listing");
        assert_eq!(json["path"], "index.html");
    }
}
