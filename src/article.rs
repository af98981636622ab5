use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the article index.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
pub struct ArticleRecord {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub cover: Option<String>,
    pub tags: Vec<String>,
    pub datetime: Option<DateTime<Utc>>,
    pub featured: bool,
    pub verified: bool,
    pub active: bool,
}

/// Record as it appears in the JSON store, before normalization.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawArticle {
    id: Option<Value>,
    title: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    cover: Option<String>,
    tags: Vec<Value>,
    datetime: Option<String>,
    featured: bool,
    verified: bool,
    active: Option<bool>,
}

impl RawArticle {
    /// Returns `None` when the record has no usable id.
    pub(crate) fn normalize(self) -> Option<ArticleRecord> {
        let id = match self.id? {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        if id.is_empty() {
            return None;
        }
        let tags = self
            .tags
            .into_iter()
            .filter_map(|t| match t {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect();

        Some(ArticleRecord {
            id,
            title: self.title.unwrap_or_default(),
            summary: self.summary.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            cover: self.cover.filter(|c| !c.trim().is_empty()),
            tags,
            datetime: self.datetime.as_deref().and_then(parse_timestamp),
            featured: self.featured,
            verified: self.verified,
            active: self.active.unwrap_or(true),
        })
    }
}

impl ArticleRecord {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    pub fn cover_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.cover.as_deref().unwrap_or(default)
    }

    /// Seconds since the epoch; records without a usable timestamp sort as 0.
    pub fn timestamp(&self) -> i64 {
        self.datetime.map_or(0, |d| d.timestamp())
    }

    /// `tag` must already be lower-cased.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }

    /// Lower-cased haystack used by the text search.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.summary, self.tags.join(" ")).to_lowercase()
    }
}

pub fn slugify(value: &str) -> String {
    let slug: String = value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

/// Lenient timestamp parsing. Naive forms are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(raw) {
        return Some(d.with_timezone(&Utc));
    }
    const NAIVE: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE {
        if let Ok(d) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(d.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}

pub fn format_date(datetime: Option<DateTime<Utc>>, offset: &FixedOffset) -> String {
    match datetime {
        Some(d) => d.with_timezone(offset).format("%b %d, %Y").to_string(),
        None => "Unknown date".to_string(),
    }
}

pub fn format_time(datetime: Option<DateTime<Utc>>, offset: &FixedOffset) -> String {
    match datetime {
        Some(d) => d.with_timezone(offset).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

/// Estimated reading time, never less than one minute.
pub fn reading_time(text: &str, words_per_minute: usize) -> String {
    let words = text.split_whitespace().count();
    let minutes = (words as f64 / words_per_minute.max(1) as f64).round() as usize;
    format!("{} min read", minutes.max(1))
}
