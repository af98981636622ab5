//! View models to HTML pages.
//!
//! Templates use `{{ key }}` placeholders. Substitution is a single pass over
//! the template, so placeholder-looking text inside article data is never
//! expanded. Every value taken from the store is escaped here.

use std::collections::HashMap;
use std::path::Path;

use chrono::{Datelike, Utc};
use tracing::debug;

use crate::config::SiteConfig;
use crate::contact::chat_link;
use crate::error::{FolioError, Result};
use crate::interact::{BACK_TO_TOP_AFTER, MOBILE_BREAKPOINT};
use crate::landing::LandingView;
use crate::listing::{Card, ListingState, ListingView, SortMode, ViewMode};
use crate::markup::escape_html as esc;
use crate::notice::Notice;
use crate::query::Links;
use crate::reader::{ArticlePage, StatusPanel};
use crate::theme::{resolve_theme, Theme};

pub const LISTING_TEMPLATE: &str = include_str!("../assets/listing.html");
pub const ARTICLE_TEMPLATE: &str = include_str!("../assets/article.html");
pub const STATUS_TEMPLATE: &str = include_str!("../assets/status.html");
pub const LANDING_TEMPLATE: &str = include_str!("../assets/landing.html");
pub const THEME_SCRIPT: &str = include_str!("../assets/theme.js");
pub const LISTING_SCRIPT: &str = include_str!("../assets/listing.js");
pub const STYLESHEET: &str = include_str!("../assets/style.css");
pub const DEFAULT_COVER_SVG: &str = include_str!("../assets/default.svg");

/// Landing page sections, in page order.
const SECTIONS: [(&str, &str); 5] = [
    ("home", "Home"),
    ("about", "About"),
    ("documents", "Documents"),
    ("projects", "Projects"),
    ("contact", "Contact"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    pub listing: String,
    pub article: String,
    pub status: String,
    pub landing: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            listing: LISTING_TEMPLATE.to_string(),
            article: ARTICLE_TEMPLATE.to_string(),
            status: STATUS_TEMPLATE.to_string(),
            landing: LANDING_TEMPLATE.to_string(),
        }
    }
}

impl Templates {
    /// Built-in templates, each replaced by `<dir>/<name>.html` when present.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut templates = Self::default();
        let Some(dir) = dir else {
            return Ok(templates);
        };
        for (name, slot) in [
            ("listing.html", &mut templates.listing),
            ("article.html", &mut templates.article),
            ("status.html", &mut templates.status),
            ("landing.html", &mut templates.landing),
        ] {
            let path = dir.join(name);
            if path.is_file() {
                *slot = std::fs::read_to_string(&path).map_err(|e| FolioError::io(&path, e))?;
                debug!(path = %path.display(), "using template override");
            }
        }
        Ok(templates)
    }
}

/// Replaces `{{ key }}` placeholders. Unknown keys are left as written.
pub fn fill(template: &str, values: &HashMap<&str, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match values.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Values shared by every page.
#[derive(Debug, Clone)]
pub struct Chrome {
    pub site_title: String,
    pub tagline: String,
    pub theme: Theme,
    /// Whether `theme` came from a stored preference or the system default.
    pub theme_stored: bool,
    pub links: Links,
    pub chat_link: String,
    pub default_cover: String,
    pub year: i32,
}

impl Chrome {
    pub fn new(config: &SiteConfig, links: Links, stored_theme: Option<Theme>) -> Self {
        Self {
            site_title: config.site.title.clone(),
            tagline: config.site.tagline.clone(),
            theme: resolve_theme(stored_theme, config.theme.system),
            theme_stored: stored_theme.is_some(),
            links,
            chat_link: chat_link(&config.contact.chat_phone, "", &config.contact.chat_message),
            default_cover: config.display.default_cover.clone(),
            year: Utc::now().year(),
        }
    }

    fn values(&self, title: &str) -> HashMap<&'static str, String> {
        HashMap::from([
            ("title", esc(title)),
            ("theme", self.theme.as_str().to_string()),
            (
                "theme_source",
                if self.theme_stored { "stored" } else { "system" }.to_string(),
            ),
            ("theme_script", THEME_SCRIPT.to_string()),
            ("root", esc(self.links.root())),
            ("home", esc(&self.links.listing(&ListingState::default()))),
            ("portfolio", esc(&self.links.landing(""))),
            ("back", esc(&self.links.listing(&ListingState::default()))),
            ("site_title", esc(&self.site_title)),
            ("tagline", esc(&self.tagline)),
            ("chat_link", esc(&self.chat_link)),
            ("year", self.year.to_string()),
            ("notice", notice_html(None)),
        ])
    }

    fn cover(&self, cover: &str) -> String {
        esc(&self.links.asset(cover))
    }
}

pub fn notice_html(notice: Option<&Notice>) -> String {
    match notice {
        Some(n) => format!(
            "<div id=\"toast\" class=\"{} show\" role=\"status\">{}</div>",
            n.css_class(),
            esc(&n.message)
        ),
        None => "<div id=\"toast\" class=\"toast\" role=\"status\"></div>".to_string(),
    }
}

fn tags_html(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("<span class=\"tag\">{}</span>", esc(t)))
        .collect()
}

fn featured_html(card: Option<&Card>, chrome: &Chrome) -> String {
    let Some(f) = card else {
        return "<div class=\"muted small\">No featured post yet.</div>".to_string();
    };
    let verified = if f.verified {
        "<span class=\"badge ok\">Verified</span>"
    } else {
        ""
    };
    format!(
        concat!(
            "<article class=\"featured-card\" data-id=\"{id}\" aria-label=\"Featured article\">",
            "<a class=\"f-link\" href=\"{href}\" aria-label=\"Read: {title}\">",
            "<div class=\"f-media\"><img src=\"{cover}\" alt=\"{title}\" ",
            "onerror=\"this.onerror=null;this.src='{fallback}'\"></div>",
            "<div class=\"f-body\"><h3 class=\"f-title\">{title}</h3>",
            "<p class=\"f-sum\">{summary}</p>",
            "<div class=\"meta\"><span class=\"badge\">{date} &bull; {time}</span>",
            "<span class=\"badge\">{reading}</span>{verified}</div>",
            "<div class=\"tags\" aria-label=\"Tags\">{tags}</div></div></a></article>"
        ),
        id = esc(&f.id),
        href = esc(&chrome.links.article(&f.id)),
        title = esc(&f.title),
        cover = chrome.cover(&f.cover),
        fallback = chrome.cover(&chrome.default_cover),
        summary = esc(&f.summary),
        date = esc(&f.date),
        time = esc(&f.time),
        reading = esc(&f.reading_time),
        verified = verified,
        tags = tags_html(&f.tags),
    )
}

fn card_html(card: &Card, chrome: &Chrome) -> String {
    let verified = if card.verified {
        "<span class=\"verified\" title=\"Verified\">&#10003;</span>"
    } else {
        ""
    };
    format!(
        concat!(
            "<article class=\"card\" data-id=\"{id}\" data-ts=\"{ts}\" ",
            "data-title=\"{sort_title}\" data-search=\"{search}\" aria-label=\"{title}\">",
            "<a class=\"card-link\" href=\"{href}\" aria-label=\"Read: {title}\">",
            "<div class=\"media\"><img src=\"{cover}\" alt=\"{title}\" ",
            "onerror=\"this.onerror=null;this.src='{fallback}'\">",
            "<span class=\"ribbon {ribbon_class}\">{ribbon}</span>{verified}</div>",
            "<div class=\"body\"><h3 class=\"title\">{title}</h3>",
            "<p class=\"summary\">{summary}</p>",
            "<div class=\"meta\"><span class=\"badge\">{date} &bull; {time}</span>",
            "<span class=\"badge\">{reading}</span></div>",
            "<div class=\"tags\" aria-label=\"Tags\">{tags}</div></div></a></article>"
        ),
        id = esc(&card.id),
        ts = card.timestamp,
        sort_title = esc(&card.title.to_lowercase()),
        search = esc(&card.search),
        href = esc(&chrome.links.article(&card.id)),
        title = esc(&card.title),
        cover = chrome.cover(&card.cover),
        fallback = chrome.cover(&chrome.default_cover),
        ribbon_class = card.ribbon.css_class(),
        ribbon = card.ribbon.label(),
        verified = verified,
        summary = esc(&card.summary),
        date = esc(&card.date),
        time = esc(&card.time),
        reading = esc(&card.reading_time),
        tags = tags_html(&card.tags),
    )
}

fn chips_html(view: &ListingView, links: &Links) -> String {
    view.chips
        .iter()
        .map(|chip| {
            format!(
                "<a class=\"chip{}\" data-tag=\"{}\" href=\"{}\">{}</a>",
                if chip.active { " active" } else { "" },
                esc(&chip.value),
                esc(&links.listing(&view.state.with_tag(&chip.value))),
                esc(&chip.label),
            )
        })
        .collect()
}

/// Search form, sort selector and view toggle. Static pages get a search box
/// and sort selector driven by an inline script over the cards' `data-*`.
fn controls_html(state: &ListingState, links: &Links) -> String {
    let options: String = SortMode::ALL
        .iter()
        .map(|mode| {
            format!(
                "<option value=\"{}\"{}>{}</option>",
                mode.as_str(),
                if *mode == state.sort { " selected" } else { "" },
                mode.label()
            )
        })
        .collect();
    if !links.is_server() {
        return format!(
            concat!(
                "<div class=\"controls\" role=\"search\">",
                "<input id=\"search\" type=\"search\" placeholder=\"Search articles\" aria-label=\"Search articles\">",
                "<select id=\"sort\" aria-label=\"Sort\">{options}</select></div>",
                "<script>{script}</script>"
            ),
            options = options,
            script = LISTING_SCRIPT,
        );
    }
    let mut hidden = String::new();
    if state.tag != crate::listing::ALL_TAGS {
        hidden.push_str(&format!(
            "<input type=\"hidden\" name=\"tag\" value=\"{}\">",
            esc(&state.tag)
        ));
    }
    if state.view != ViewMode::default() {
        hidden.push_str(&format!(
            "<input type=\"hidden\" name=\"view\" value=\"{}\">",
            state.view.as_str()
        ));
    }
    let view_link = |mode: ViewMode, label: &str| {
        format!(
            "<a class=\"{}\" href=\"{}\">{label}</a>",
            if state.view == mode { "active" } else { "" },
            esc(&links.listing(&state.with_view(mode)))
        )
    };
    format!(
        concat!(
            "<form class=\"controls\" method=\"get\" action=\"/\">",
            "<input id=\"search\" type=\"search\" name=\"q\" value=\"{q}\" placeholder=\"Search articles\">",
            "{hidden}<select name=\"sort\" onchange=\"this.form.submit()\">{options}</select>",
            "<button type=\"submit\">Search</button></form>",
            "<div class=\"views\">{grid} {list}</div>"
        ),
        q = esc(&state.query),
        hidden = hidden,
        options = options,
        grid = view_link(ViewMode::Grid, "Grid"),
        list = view_link(ViewMode::List, "List"),
    )
}

pub fn render_listing(view: &ListingView, chrome: &Chrome, templates: &Templates) -> String {
    let mut values = chrome.values(&chrome.site_title);
    values.insert("featured", featured_html(view.featured.as_ref(), chrome));
    values.insert("controls", controls_html(&view.state, &chrome.links));
    values.insert("chips", chips_html(view, &chrome.links));
    values.insert(
        "grid",
        view.cards.iter().map(|c| card_html(c, chrome)).collect(),
    );
    values.insert("view", view.state.view.as_str().to_string());
    values.insert(
        "empty",
        if view.is_empty() {
            "<div id=\"empty\" class=\"empty\">No articles match the current filters.</div>"
                .to_string()
        } else if !chrome.links.is_server() {
            "<div id=\"empty\" class=\"empty\" hidden>No articles match the current filters.</div>"
                .to_string()
        } else {
            String::new()
        },
    );
    values.insert("stat_total", view.stats.total.to_string());
    values.insert("stat_featured", view.stats.featured.to_string());
    values.insert(
        "stat_latest",
        esc(view.stats.latest.as_deref().unwrap_or("\u{2014}")),
    );
    values.insert("notice", notice_html(view.notice.as_ref()));
    fill(&templates.listing, &values)
}

pub fn render_article(page: &ArticlePage, chrome: &Chrome, templates: &Templates) -> String {
    let mut values = chrome.values(&page.document_title);
    values.insert("cover", chrome.cover(&page.cover));
    values.insert("default_cover", chrome.cover(&chrome.default_cover));
    values.insert("article_title", esc(&page.title));
    values.insert("summary", esc(&page.summary));
    values.insert(
        "ribbons",
        page.ribbons
            .iter()
            .map(|r| {
                format!(
                    "<span class=\"ribbon {}\">{}</span>",
                    esc(&r.class),
                    esc(&r.label)
                )
            })
            .collect(),
    );
    values.insert("date", esc(&page.date));
    values.insert("time", esc(&page.time));
    values.insert("reading_time", esc(&page.reading_time));
    values.insert(
        "verified_hidden",
        if page.verified { "" } else { " hidden" }.to_string(),
    );
    values.insert("tags", tags_html(&page.tags));
    values.insert("content", page.body_html.clone());
    fill(&templates.article, &values)
}

pub fn render_landing(view: &LandingView, chrome: &Chrome, templates: &Templates) -> String {
    let state = &view.state;
    let links = &chrome.links;
    let mut values = chrome.values(&chrome.site_title);
    let flag = |on: bool, class: &str| if on { class.to_string() } else { String::new() };

    values.insert("body_class", flag(state.body_scroll_locked(), "locked"));
    values.insert("nav_class", flag(state.nav_open, " open"));
    values.insert("nav_expanded", state.nav_open.to_string());
    values.insert("chat_class", flag(state.chat_open, " open"));
    values.insert("top_hidden", flag(!state.show_back_to_top, " hidden"));
    values.insert("breakpoint", MOBILE_BREAKPOINT.to_string());
    values.insert("back_to_top", BACK_TO_TOP_AFTER.to_string());
    values.insert(
        "sections",
        SECTIONS
            .iter()
            .map(|(id, label)| {
                format!(
                    "<a href=\"#{id}\"{}>{label}</a>",
                    if state.active_section == *id { " class=\"active\"" } else { "" }
                )
            })
            .collect(),
    );
    values.insert("articles", esc(&links.listing(&ListingState::default())));
    values.insert("about", esc(&view.about));
    values.insert(
        "skills",
        view.skills
            .iter()
            .map(|s| {
                format!(
                    concat!(
                        "<div class=\"skill\" data-level=\"{level}\"><span>{name}</span>",
                        "<div class=\"skill-bar\"><div class=\"skill-fill\" style=\"width:{level}%\"></div></div></div>"
                    ),
                    name = esc(&s.name),
                    level = s.level,
                )
            })
            .collect(),
    );

    let link = |pairs: &[(&str, &str)]| {
        esc(&links.landing(&serde_urlencoded::to_string(pairs).unwrap_or_default()))
    };
    values.insert(
        "tabs",
        view.tabs
            .iter()
            .map(|t| {
                format!(
                    "<a class=\"tab{}\" role=\"tab\" data-tab=\"{name}\" href=\"{href}\">{name}</a>",
                    if t.active { " active" } else { "" },
                    name = esc(&t.name),
                    href = link(&[("tab", t.name.as_str())]),
                )
            })
            .collect(),
    );
    values.insert(
        "panels",
        view.tabs
            .iter()
            .map(|t| {
                let docs: String = t
                    .documents
                    .iter()
                    .map(|d| {
                        let file = if d.file.trim().is_empty() {
                            String::new()
                        } else {
                            links.asset(&d.file)
                        };
                        format!(
                            concat!(
                                "<div class=\"doc\"><span>{title}</span>",
                                "<a data-pdf=\"{file}\" data-title=\"{title}\" href=\"{href}\">Preview</a></div>"
                            ),
                            title = esc(&d.title),
                            file = esc(&file),
                            href = link(&[
                                ("tab", t.name.as_str()),
                                ("pdf", d.file.as_str()),
                                ("title", d.title.as_str()),
                            ]),
                        )
                    })
                    .collect();
                format!(
                    "<div class=\"panel\" role=\"tabpanel\" data-tab=\"{}\"{}>{docs}</div>",
                    esc(&t.name),
                    if t.active { "" } else { " hidden" },
                )
            })
            .collect(),
    );
    values.insert(
        "filters",
        view.filters
            .iter()
            .map(|f| {
                format!(
                    "<a class=\"chip{}\" data-filter=\"{}\" href=\"{}\">{}</a>",
                    if f.active { " active" } else { "" },
                    f.value,
                    link(&[("filter", f.value)]),
                    f.label,
                )
            })
            .collect(),
    );
    values.insert(
        "projects",
        view.projects
            .iter()
            .map(|p| {
                format!(
                    concat!(
                        "<article class=\"project\" data-status=\"{status}\"{hidden}>",
                        "<span class=\"status\">{label}</span><h3>{name}</h3><p>{summary}</p></article>"
                    ),
                    status = p.status.as_str(),
                    hidden = if p.hidden { " hidden" } else { "" },
                    label = p.status.label(),
                    name = esc(&p.name),
                    summary = esc(&p.summary),
                )
            })
            .collect(),
    );

    let preview = view.preview();
    values.insert("modal_hidden", flag(preview.is_none(), " hidden"));
    values.insert(
        "pdf_title",
        esc(preview.map_or("Preview", |p| p.title.as_str())),
    );
    values.insert(
        "pdf_src",
        esc(&preview.map_or_else(|| "about:blank".to_string(), |p| links.asset(&p.file))),
    );
    values.insert("close_pdf", esc(&links.landing("")));
    values.insert("notice", notice_html(view.notice.as_ref()));
    fill(&templates.landing, &values)
}

pub fn render_status(
    panel: StatusPanel,
    notice: Option<&Notice>,
    chrome: &Chrome,
    templates: &Templates,
) -> String {
    let title = format!("{} | {}", panel.title(), chrome.site_title);
    let mut values = chrome.values(&title);
    values.insert(
        "status",
        match panel {
            StatusPanel::MissingId => "missing-id",
            StatusPanel::NotFound => "not-found",
            StatusPanel::LoadFailed => "load-failed",
        }
        .to_string(),
    );
    values.insert("status_title", esc(panel.title()));
    values.insert("status_hint", esc(panel.hint()));
    values.insert("notice", notice_html(notice));
    fill(&templates.status, &values)
}
