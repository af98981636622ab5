//! Site configuration.
//!
//! Loaded from a YAML file (`folio.yaml` by convention). Every field has a
//! default so an absent or partial file yields a usable configuration.

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::interact::Project;
use crate::theme::Theme;

/// Cover shipped with the binary, written to the site root by `build` and
/// served at `/default.svg`.
pub const BUILTIN_COVER: &str = "default.svg";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub store: StoreSection,
    pub display: DisplayConfig,
    pub theme: ThemeConfig,
    pub contact: ContactConfig,
    pub server: ServerConfig,
    pub portfolio: PortfolioConfig,
    /// Directory holding `listing.html`, `article.html` and `status.html`
    /// overrides. Built-in templates are used for any file not present.
    pub templates_dir: Option<PathBuf>,
    /// Static files (covers, PDFs, images) copied into the site root and
    /// served by the preview server.
    pub assets_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteSection {
    pub title: String,
    pub tagline: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            tagline: "Notes, write-ups and projects".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreSection {
    /// File path or `http(s)://` URL of the article index.
    pub source: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            source: "articles.json".to_string(),
        }
    }
}

/// Ribbon shown on an article whose title contains `keyword`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeywordRibbon {
    pub keyword: String,
    pub label: String,
    #[serde(default)]
    pub class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub utc_offset_seconds: i32,
    pub default_cover: String,
    pub words_per_minute: usize,
    pub featured_tags: usize,
    pub card_tags: usize,
    pub article_tags: usize,
    pub ribbons: Vec<KeywordRibbon>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_seconds: 0,
            default_cover: BUILTIN_COVER.to_string(),
            words_per_minute: 200,
            featured_tags: 5,
            card_tags: 4,
            article_tags: 8,
            ribbons: vec![
                KeywordRibbon {
                    keyword: "ccna".to_string(),
                    label: "CCNA".to_string(),
                    class: None,
                },
                KeywordRibbon {
                    keyword: "ccnp".to_string(),
                    label: "CCNP".to_string(),
                    class: None,
                },
            ],
        }
    }
}

impl DisplayConfig {
    /// Offset used when formatting timestamps. Out-of-range values fall back to UTC.
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_seconds).unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Scheme assumed when no preference has been stored.
    pub system: Theme,
    pub prefs_file: PathBuf,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            system: Theme::Light,
            prefs_file: PathBuf::from(".folio-prefs.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContactConfig {
    pub chat_phone: String,
    pub chat_message: String,
    pub quick_message: String,
    /// Endpoint that accepts contact form submissions as JSON. When unset the
    /// form is validated and acknowledged locally without sending anything.
    pub relay_url: Option<String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            chat_phone: "8801713086375".to_string(),
            chat_message: "Hello, I want to discuss a project.".to_string(),
            quick_message: "Hello, I need quick help.".to_string(),
            relay_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Content of the portfolio landing page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub about: String,
    pub skills: Vec<SkillEntry>,
    pub documents: Vec<DocumentEntry>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
}

/// Skill bar level as written in the config: a number or free text.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SkillLevel {
    Number(i64),
    Text(String),
}

impl Default for SkillLevel {
    fn default() -> Self {
        Self::Number(0)
    }
}

impl SkillLevel {
    pub fn raw(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(t) => t.clone(),
        }
    }
}

/// A previewable document, grouped into tabs on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DocumentEntry {
    pub tab: String,
    pub title: String,
    /// Site-relative path or URL of the PDF. Blank means missing.
    #[serde(default)]
    pub file: String,
}

impl SiteConfig {
    /// Loads the configuration at `path`, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Invalid("site.title must not be empty".into()));
        }
        if self.store.source.trim().is_empty() {
            return Err(ConfigError::Invalid("store.source must not be empty".into()));
        }
        let d = &self.display;
        if d.featured_tags == 0 || d.card_tags == 0 || d.article_tags == 0 {
            return Err(ConfigError::Invalid("tag limits must be at least 1".into()));
        }
        if d.words_per_minute == 0 {
            return Err(ConfigError::Invalid(
                "display.words_per_minute must be at least 1".into(),
            ));
        }
        if let Some(dir) = &self.assets_dir {
            if !dir.is_dir() {
                return Err(ConfigError::Invalid(format!(
                    "assets_dir {} is not a directory",
                    dir.display()
                )));
            }
        }
        if self.portfolio.documents.iter().any(|doc| doc.tab.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "portfolio.documents entries need a tab".into(),
            ));
        }
        if FixedOffset::east_opt(d.utc_offset_seconds).is_none() {
            return Err(ConfigError::Invalid(format!(
                "display.utc_offset_seconds {} is out of range",
                d.utc_offset_seconds
            )));
        }
        Ok(())
    }
}
