//! Light/dark theme preference.
//!
//! A stored choice always wins; without one the system color scheme is used.
//! Pages carry the resolved theme in `data-theme` and a toggle that persists
//! the visitor's choice in `localStorage` under [`STORAGE_KEY`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FolioError, Result};

pub const STORAGE_KEY: &str = "folio-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(FolioError::Usage(format!(
                "unknown theme `{other}`, expected `light` or `dark`"
            ))),
        }
    }
}

pub fn resolve_theme(stored: Option<Theme>, system: Theme) -> Theme {
    stored.unwrap_or(system)
}

/// Persistence for the theme choice.
pub trait ThemeStore {
    fn load(&self) -> Option<Theme>;
    fn save(&self, theme: Theme) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Prefs {
    theme: Option<Theme>,
}

/// JSON file holding `{ "theme": "dark" }`.
#[derive(Debug, Clone)]
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// [`ThemeStore::load`] on the async runtime, for request handlers.
    pub async fn load_async(&self) -> Option<Theme> {
        self.interpret(tokio::fs::read_to_string(&self.path).await)
    }

    /// An unreadable or corrupt file counts as no preference.
    fn interpret(&self, read: std::io::Result<String>) -> Option<Theme> {
        let text = match read {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read theme preference");
                return None;
            }
        };
        match serde_json::from_str::<Prefs>(&text) {
            Ok(prefs) => prefs.theme,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring corrupt theme preference");
                None
            }
        }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Option<Theme> {
        self.interpret(std::fs::read_to_string(&self.path))
    }

    fn save(&self, theme: Theme) -> Result<()> {
        let body = serde_json::to_string_pretty(&Prefs { theme: Some(theme) })?;
        std::fs::write(&self.path, body).map_err(|e| FolioError::io(&self.path, e))?;
        debug!(path = %self.path.display(), theme = theme.as_str(), "saved theme preference");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FolioError::io(&self.path, e)),
        }
    }
}
