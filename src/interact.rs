//! Portfolio page interaction state.
//!
//! The landing page's controls (navigation drawer, scroll-spy, document tabs,
//! PDF preview, project filter, chat panel, back-to-top) are modelled as one
//! immutable [`PageState`]. Events produce a new state; nothing is shared.

use serde::{Deserialize, Serialize};

use crate::notice::Notice;

/// Viewport width at or below which the navigation collapses into a drawer.
pub const MOBILE_BREAKPOINT: u32 = 760;
/// Scroll depth after which the back-to-top control appears.
pub const BACK_TO_TOP_AFTER: f64 = 500.0;
pub const DEFAULT_SECTION: &str = "home";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfPreview {
    pub file: String,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Done,
    Ongoing,
    Planned,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [Self::Done, Self::Ongoing, Self::Planned];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Ongoing => "ongoing",
            Self::Planned => "planned",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::Ongoing => "Ongoing",
            Self::Planned => "Planned",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectFilter {
    #[default]
    All,
    Only(ProjectStatus),
}

impl ProjectFilter {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "done" => Self::Only(ProjectStatus::Done),
            "ongoing" => Self::Only(ProjectStatus::Ongoing),
            "planned" => Self::Only(ProjectStatus::Planned),
            _ => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(status) => status.as_str(),
        }
    }

    pub fn accepts(self, status: ProjectStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Where a click landed, relative to the interactive widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Nav,
    Chat,
    Elsewhere,
}

/// A page section and its top offset in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: String,
    pub top: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    ToggleNav,
    NavLinkClicked,
    OutsideClick {
        viewport_width: u32,
        target: ClickTarget,
    },
    Escape,
    Scrolled {
        y: f64,
        sections: Vec<Section>,
        nav_offset: f64,
    },
    SelectTab(String),
    SelectProjectFilter(ProjectFilter),
    OpenPdf {
        file: Option<String>,
        title: Option<String>,
    },
    ClosePdf,
    ToggleChat,
    CloseChat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageState {
    pub nav_open: bool,
    pub active_section: String,
    pub active_tab: Option<String>,
    pub project_filter: ProjectFilter,
    pub pdf: Option<PdfPreview>,
    pub chat_open: bool,
    pub show_back_to_top: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            nav_open: false,
            active_section: DEFAULT_SECTION.to_string(),
            active_tab: None,
            project_filter: ProjectFilter::All,
            pdf: None,
            chat_open: false,
            show_back_to_top: false,
        }
    }
}

/// Result of applying an event: the next state and an optional toast.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PageState,
    pub notice: Option<Notice>,
}

impl PageState {
    /// While the PDF preview is open the page body must not scroll.
    pub fn body_scroll_locked(&self) -> bool {
        self.pdf.is_some()
    }

    pub fn apply(&self, event: PageEvent) -> Transition {
        let mut next = self.clone();
        let mut notice = None;
        match event {
            PageEvent::ToggleNav => next.nav_open = !self.nav_open,
            PageEvent::NavLinkClicked => next.nav_open = false,
            PageEvent::OutsideClick {
                viewport_width,
                target,
            } => {
                if viewport_width <= MOBILE_BREAKPOINT && target != ClickTarget::Nav {
                    next.nav_open = false;
                }
                if target != ClickTarget::Chat {
                    next.chat_open = false;
                }
            }
            PageEvent::Escape => {
                next.nav_open = false;
                next.pdf = None;
            }
            PageEvent::Scrolled {
                y,
                sections,
                nav_offset,
            } => {
                next.active_section = active_section(&sections, y, nav_offset);
                next.show_back_to_top = y > BACK_TO_TOP_AFTER;
            }
            PageEvent::SelectTab(tab) => {
                if !tab.trim().is_empty() {
                    next.active_tab = Some(tab);
                }
            }
            PageEvent::SelectProjectFilter(filter) => next.project_filter = filter,
            PageEvent::OpenPdf { file, title } => match file.filter(|f| !f.trim().is_empty()) {
                Some(file) => {
                    next.pdf = Some(PdfPreview {
                        file,
                        title: title
                            .filter(|t| !t.trim().is_empty())
                            .unwrap_or_else(|| "Preview".to_string()),
                    });
                }
                None => notice = Some(Notice::error("PDF file not found.")),
            },
            PageEvent::ClosePdf => next.pdf = None,
            PageEvent::ToggleChat => next.chat_open = !self.chat_open,
            PageEvent::CloseChat => next.chat_open = false,
        }
        Transition {
            state: next,
            notice,
        }
    }
}

/// Scroll-spy: the last section whose top has been passed.
pub fn active_section(sections: &[Section], scroll_y: f64, nav_offset: f64) -> String {
    let position = scroll_y + nav_offset + 10.0;
    sections
        .iter()
        .rfind(|s| position >= s.top)
        .map_or_else(|| DEFAULT_SECTION.to_string(), |s| s.id.clone())
}

/// Skill bar width from a `data-level` attribute; garbage reads as 0.
pub fn skill_level(raw: &str) -> u8 {
    raw.trim()
        .parse::<i64>()
        .map_or(0, |level| level.clamp(0, 100) as u8)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub summary: String,
}
