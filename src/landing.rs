//! Portfolio landing page.
//!
//! The page opens in the state named by its query string: `tab`, `filter`,
//! `pdf` with `title`, `nav=open` and `chat=open` become [`PageEvent`]s folded
//! through [`PageState::apply`]. The rendered page starts from that state and
//! its script keeps applying the same rules in the browser.

use serde::Serialize;

use crate::config::{DocumentEntry, PortfolioConfig};
use crate::interact::{
    skill_level, PageEvent, PageState, PdfPreview, ProjectFilter, ProjectStatus, Transition,
};
use crate::notice::Notice;
use crate::query::{pairs, param};

/// Folds the query string's events over the default page state. The first
/// notice raised wins.
pub fn landing_transition(query: &str) -> Transition {
    let pairs = pairs(query);
    let mut events = Vec::new();
    if param(&pairs, "nav").as_deref() == Some("open") {
        events.push(PageEvent::ToggleNav);
    }
    if let Some(tab) = param(&pairs, "tab") {
        events.push(PageEvent::SelectTab(tab));
    }
    if let Some(filter) = param(&pairs, "filter") {
        events.push(PageEvent::SelectProjectFilter(ProjectFilter::parse(&filter)));
    }
    if pairs.iter().any(|(k, _)| k == "pdf") {
        events.push(PageEvent::OpenPdf {
            file: param(&pairs, "pdf"),
            title: param(&pairs, "title"),
        });
    }
    if param(&pairs, "chat").as_deref() == Some("open") {
        events.push(PageEvent::ToggleChat);
    }

    let start = Transition {
        state: PageState::default(),
        notice: None,
    };
    events.into_iter().fold(start, |acc, event| {
        let next = acc.state.apply(event);
        Transition {
            state: next.state,
            notice: acc.notice.or(next.notice),
        }
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTab {
    pub name: String,
    pub active: bool,
    pub documents: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub value: &'static str,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCard {
    pub name: String,
    pub status: ProjectStatus,
    pub summary: String,
    /// Filtered out by the current project filter.
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillBar {
    pub name: String,
    /// Bar width in percent.
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LandingView {
    pub state: PageState,
    pub notice: Option<Notice>,
    pub about: String,
    pub tabs: Vec<DocumentTab>,
    pub filters: Vec<FilterChip>,
    pub projects: Vec<ProjectCard>,
    pub skills: Vec<SkillBar>,
}

impl LandingView {
    pub fn build(portfolio: &PortfolioConfig, transition: Transition) -> Self {
        let state = transition.state;

        let mut tabs: Vec<DocumentTab> = Vec::new();
        for doc in &portfolio.documents {
            match tabs.iter_mut().find(|t| t.name == doc.tab) {
                Some(tab) => tab.documents.push(doc.clone()),
                None => tabs.push(DocumentTab {
                    name: doc.tab.clone(),
                    active: false,
                    documents: vec![doc.clone()],
                }),
            }
        }
        let active = state
            .active_tab
            .as_deref()
            .and_then(|wanted| tabs.iter().position(|t| t.name == wanted))
            .unwrap_or(0);
        if let Some(tab) = tabs.get_mut(active) {
            tab.active = true;
        }

        let projects = portfolio
            .projects
            .iter()
            .map(|p| ProjectCard {
                name: p.name.clone(),
                status: p.status,
                summary: p.summary.clone(),
                hidden: !state.project_filter.accepts(p.status),
            })
            .collect();

        let filters = std::iter::once(ProjectFilter::All)
            .chain(ProjectStatus::ALL.into_iter().map(ProjectFilter::Only))
            .map(|filter| FilterChip {
                value: filter.as_str(),
                label: match filter {
                    ProjectFilter::All => "All",
                    ProjectFilter::Only(status) => status.label(),
                },
                active: filter == state.project_filter,
            })
            .collect();

        let skills = portfolio
            .skills
            .iter()
            .map(|s| SkillBar {
                name: s.name.clone(),
                level: skill_level(&s.level.raw()),
            })
            .collect();

        Self {
            notice: transition.notice,
            about: portfolio.about.clone(),
            tabs,
            filters,
            projects,
            skills,
            state,
        }
    }

    pub fn preview(&self) -> Option<&PdfPreview> {
        self.state.pdf.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SkillEntry, SkillLevel};
    use crate::interact::Project;
    use crate::notice::NoticeKind;

    fn portfolio() -> PortfolioConfig {
        let doc = |tab: &str, title: &str, file: &str| DocumentEntry {
            tab: tab.into(),
            title: title.into(),
            file: file.into(),
        };
        PortfolioConfig {
            about: "Network engineer".into(),
            skills: vec![
                SkillEntry {
                    name: "Routing".into(),
                    level: SkillLevel::Number(130),
                },
                SkillEntry {
                    name: "Python".into(),
                    level: SkillLevel::Text("n/a".into()),
                },
            ],
            documents: vec![
                doc("certificates", "CCNA", "docs/ccna.pdf"),
                doc("resume", "CV", "docs/cv.pdf"),
                doc("certificates", "CCNP", "docs/ccnp.pdf"),
            ],
            projects: vec![
                Project {
                    name: "Campus LAN".into(),
                    status: ProjectStatus::Done,
                    summary: "VLANs".into(),
                },
                Project {
                    name: "Homelab".into(),
                    status: ProjectStatus::Ongoing,
                    summary: String::new(),
                },
            ],
        }
    }

    #[test]
    fn default_page_opens_first_tab_with_all_projects() {
        let view = LandingView::build(&portfolio(), landing_transition(""));
        assert_eq!(view.tabs.len(), 2);
        assert!(view.tabs[0].active);
        assert_eq!(view.tabs[0].documents.len(), 2);
        assert!(view.projects.iter().all(|p| !p.hidden));
        assert!(view.filters[0].active);
        assert_eq!(view.skills[0].level, 100);
        assert_eq!(view.skills[1].level, 0);
        assert!(view.preview().is_none());
        assert!(view.notice.is_none());
    }

    #[test]
    fn query_selects_tab_filter_and_preview() {
        let transition =
            landing_transition("tab=resume&filter=ongoing&pdf=docs%2Fcv.pdf&title=CV&nav=open");
        assert!(transition.state.nav_open);
        assert!(transition.state.body_scroll_locked());
        let view = LandingView::build(&portfolio(), transition);
        assert!(!view.tabs[0].active);
        assert!(view.tabs[1].active);
        assert!(view.projects[0].hidden);
        assert!(!view.projects[1].hidden);
        assert!(view.filters.iter().any(|f| f.value == "ongoing" && f.active));
        let preview = view.preview().unwrap();
        assert_eq!(preview.file, "docs/cv.pdf");
        assert_eq!(preview.title, "CV");
    }

    #[test]
    fn unknown_tab_falls_back_to_first() {
        let view = LandingView::build(&portfolio(), landing_transition("tab=awards"));
        assert_eq!(view.state.active_tab.as_deref(), Some("awards"));
        assert!(view.tabs[0].active);
    }

    #[test]
    fn blank_pdf_raises_error_notice() {
        let transition = landing_transition("pdf=&title=CV&chat=open");
        assert!(transition.state.pdf.is_none());
        assert!(transition.state.chat_open);
        assert_eq!(transition.notice.unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn empty_portfolio_has_no_tabs() {
        let view = LandingView::build(&PortfolioConfig::default(), landing_transition("tab=x"));
        assert!(view.tabs.is_empty());
        assert!(view.projects.is_empty());
        assert_eq!(view.filters.len(), 4);
    }
}
