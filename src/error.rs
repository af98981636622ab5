//! Error types for folio.
//!
//! User-facing degradations (missing article, failed store fetch on a page)
//! are not errors here; they are rendered as status panels and notices.
//! These types cover what the CLI reports and maps to an exit code.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FolioError>;

/// Process exit codes.
pub struct ExitCode;

impl ExitCode {
    pub const SUCCESS: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
    pub const IO_ERROR: i32 = 3;
    pub const STORE_ERROR: i32 = 4;
    pub const USAGE_ERROR: i32 = 64;
}

#[derive(Debug, Error)]
pub enum FolioError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Server(String),

    #[error("usage: {0}")]
    Usage(String),
}

impl FolioError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => ExitCode::CONFIG_ERROR,
            Self::Io { .. } => ExitCode::IO_ERROR,
            Self::Load(_) => ExitCode::STORE_ERROR,
            Self::Usage(_) => ExitCode::USAGE_ERROR,
            Self::Contact(_) | Self::Pattern(_) | Self::Json(_) | Self::Server(_) => {
                ExitCode::ERROR
            }
        }
    }
}

/// Failure to obtain the article store.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("article store is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("article store must be an array or an object with an `items` array")]
    Shape,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("please fill all required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("relay request failed: {0}")]
    Relay(String),
}
