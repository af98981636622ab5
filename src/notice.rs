use serde::Serialize;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// Short non-blocking message shown alongside a page (the toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Info => "toast info",
            NoticeKind::Success => "toast success",
            NoticeKind::Error => "toast error",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.kind {
            NoticeKind::Info => "info",
            NoticeKind::Success => "ok",
            NoticeKind::Error => "error",
        };
        write!(f, "[{label}] {}", self.message)
    }
}
