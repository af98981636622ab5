//! Article store loading.
//!
//! The store is a JSON array of article records, or an object whose `items`
//! field holds that array. It is read-only: loaded once per render, never
//! written back.

use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, warn};

use crate::article::{ArticleRecord, RawArticle};
use crate::error::LoadError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleStore {
    records: Vec<ArticleRecord>,
}

impl ArticleStore {
    pub fn new(records: Vec<ArticleRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_slice(bytes)?;
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => return Err(LoadError::Shape),
            },
            _ => return Err(LoadError::Shape),
        };

        let total = items.len();
        let mut records = Vec::with_capacity(total);
        for (index, item) in items.into_iter().enumerate() {
            let raw: RawArticle = match serde_json::from_value(item) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(index, error = %e, "skipping malformed article record");
                    continue;
                }
            };
            match raw.normalize() {
                Some(record) => records.push(record),
                None => warn!(index, "skipping article record without id"),
            }
        }
        debug!(total, kept = records.len(), "parsed article store");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ArticleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record with this id. Ids are not checked for uniqueness.
    pub fn find(&self, id: &str) -> Option<&ArticleRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Where the article index lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSource {
    File(PathBuf),
    Http(String),
}

impl StoreSource {
    pub fn parse(source: &str) -> Self {
        let source = source.trim();
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Http(source.to_string())
        } else {
            Self::File(PathBuf::from(source))
        }
    }
}

impl std::fmt::Display for StoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Http(url) => f.write_str(url),
        }
    }
}

/// Fetches the store. No retry, no caching: every call hits the source.
#[derive(Debug, Clone)]
pub struct StoreLoader {
    source: StoreSource,
    client: reqwest::Client,
}

impl StoreLoader {
    pub fn new(source: StoreSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    pub fn source(&self) -> &StoreSource {
        &self.source
    }

    pub async fn fetch_bytes(&self) -> Result<Vec<u8>, LoadError> {
        match &self.source {
            StoreSource::File(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.clone(),
                        source,
                    })
            }
            StoreSource::Http(url) => {
                let network = |e: reqwest::Error| LoadError::Network {
                    url: url.clone(),
                    message: e.to_string(),
                };
                let response = self
                    .client
                    .get(url)
                    .header(reqwest::header::CACHE_CONTROL, "no-store")
                    .send()
                    .await
                    .map_err(network)?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                let body = response.bytes().await.map_err(network)?;
                Ok(body.to_vec())
            }
        }
    }

    pub async fn load(&self) -> Result<ArticleStore, LoadError> {
        let bytes = self.fetch_bytes().await?;
        ArticleStore::from_json(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_array() {
        let store = ArticleStore::from_json(br#"[{"id":"a"},{"id":"b"}]"#).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn parses_items_envelope() {
        let store = ArticleStore::from_json(br#"{"items":[{"id":"a"}]}"#).unwrap();
        assert_eq!(store.records()[0].id, "a");
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(matches!(
            ArticleStore::from_json(br#"{"articles":[]}"#),
            Err(LoadError::Shape)
        ));
        assert!(matches!(ArticleStore::from_json(b"42"), Err(LoadError::Shape)));
        assert!(matches!(
            ArticleStore::from_json(b"not json"),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn skips_records_without_id_or_with_bad_fields() {
        let store = ArticleStore::from_json(
            br#"[{"title":"no id"},{"id":"ok"},{"id":"bad","featured":"yes"}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].id, "ok");
    }

    #[test]
    fn find_returns_first_match_for_duplicate_ids() {
        let store = ArticleStore::from_json(
            br#"[{"id":"dup","title":"first"},{"id":"dup","title":"second"}]"#,
        )
        .unwrap();
        assert_eq!(store.find("dup").unwrap().title, "first");
        assert!(store.find("missing").is_none());
    }

    #[test]
    fn source_parse_distinguishes_urls() {
        assert_eq!(
            StoreSource::parse("https://example.com/articles.json"),
            StoreSource::Http("https://example.com/articles.json".into())
        );
        assert_eq!(
            StoreSource::parse("data/articles.json"),
            StoreSource::File(PathBuf::from("data/articles.json"))
        );
    }

    #[tokio::test]
    async fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, r#"[{"id":"x","title":"Hello"}]"#).unwrap();
        let store = StoreLoader::new(StoreSource::File(path)).load().await.unwrap();
        assert_eq!(store.find("x").unwrap().title, "Hello");
    }

    #[tokio::test]
    async fn load_missing_file_is_io_error() {
        let loader = StoreLoader::new(StoreSource::File("/nonexistent/articles.json".into()));
        assert!(matches!(loader.load().await, Err(LoadError::Io { .. })));
    }

    async fn spawn_http(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn http_source_loads_and_reports_status() {
        let router = axum::Router::new().route(
            "/articles.json",
            axum::routing::get(|| async { r#"{"items":[{"id":"net","title":"Over HTTP"}]}"# }),
        );
        let base = spawn_http(router).await;

        let store = StoreLoader::new(StoreSource::parse(&format!("{base}/articles.json")))
            .load()
            .await
            .unwrap();
        assert_eq!(store.find("net").unwrap().title, "Over HTTP");

        let missing = StoreLoader::new(StoreSource::parse(&format!("{base}/missing.json")));
        match missing.load().await {
            Err(LoadError::Status { status, url }) => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/missing.json"));
            }
            other => panic!("expected 404 status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let loader = StoreLoader::new(StoreSource::parse(&format!("http://{addr}/a.json")));
        assert!(matches!(loader.load().await, Err(LoadError::Network { .. })));
    }
}
