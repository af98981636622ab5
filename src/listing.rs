//! Listing view model: featured slot, filtered grid, tag chips and stats.
//!
//! Everything here is a pure function of the records and a [`ListingState`].
//! State changes produce new state values; nothing is mutated in place.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::article::{format_date, format_time, reading_time, ArticleRecord};
use crate::config::DisplayConfig;
use crate::notice::Notice;

pub const ALL_TAGS: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    #[default]
    Newest,
    Oldest,
    Title,
}

impl SortMode {
    pub const ALL: [SortMode; 3] = [SortMode::Newest, SortMode::Oldest, SortMode::Title];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Title => "title",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Newest => "Newest first",
            Self::Oldest => "Oldest first",
            Self::Title => "Title",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(Self::Grid),
            "list" => Some(Self::List),
            _ => None,
        }
    }
}

/// Current UI state of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    pub query: String,
    /// Lower-cased tag, or [`ALL_TAGS`].
    pub tag: String,
    pub sort: SortMode,
    pub view: ViewMode,
    pub active_only: bool,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            query: String::new(),
            tag: ALL_TAGS.to_string(),
            sort: SortMode::default(),
            view: ViewMode::default(),
            active_only: true,
        }
    }
}

impl ListingState {
    pub fn with_query(&self, query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
            ..self.clone()
        }
    }

    pub fn with_tag(&self, tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        Self {
            tag: if tag.is_empty() { ALL_TAGS.to_string() } else { tag },
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: SortMode) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }

    pub fn with_view(&self, view: ViewMode) -> Self {
        Self {
            view,
            ..self.clone()
        }
    }

    fn matches(&self, record: &ArticleRecord) -> bool {
        let tag_ok = self.tag == ALL_TAGS || record.has_tag(&self.tag);
        let query_ok =
            self.query.is_empty() || record.search_text().contains(&self.query.to_lowercase());
        tag_ok && query_ok
    }
}

/// Records visible under `active_only`, in store order.
pub fn visible_records<'a>(
    records: &'a [ArticleRecord],
    state: &ListingState,
) -> Vec<&'a ArticleRecord> {
    records
        .iter()
        .filter(|r| !state.active_only || r.active)
        .collect()
}

pub fn compare(sort: SortMode, a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
    match sort {
        SortMode::Newest => b.timestamp().cmp(&a.timestamp()),
        SortMode::Oldest => a.timestamp().cmp(&b.timestamp()),
        SortMode::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
    }
}

/// Filtered and ordered subset for the grid. Sorting is stable.
pub fn filter_sort<'a>(records: &'a [ArticleRecord], state: &ListingState) -> Vec<&'a ArticleRecord> {
    let mut list: Vec<&ArticleRecord> = visible_records(records, state)
        .into_iter()
        .filter(|r| state.matches(r))
        .collect();
    list.sort_by(|a, b| compare(state.sort, a, b));
    list
}

/// Most recent featured record; the earliest in store order wins a tie.
pub fn featured<'a, I>(records: I) -> Option<&'a ArticleRecord>
where
    I: IntoIterator<Item = &'a ArticleRecord>,
{
    records
        .into_iter()
        .filter(|r| r.featured)
        .fold(None, |best: Option<&ArticleRecord>, r| match best {
            Some(b) if b.timestamp() >= r.timestamp() => Some(b),
            _ => Some(r),
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagChip {
    pub label: String,
    pub value: String,
    pub active: bool,
}

/// `all` followed by the distinct tags, compared case-insensitively.
pub fn tag_chips<'a, I>(records: I, active: &str) -> Vec<TagChip>
where
    I: IntoIterator<Item = &'a ArticleRecord>,
{
    let mut seen = HashSet::new();
    let mut tags: Vec<(String, String)> = Vec::new();
    for record in records {
        for tag in &record.tags {
            let value = tag.trim().to_lowercase();
            if !value.is_empty() && seen.insert(value.clone()) {
                tags.push((tag.trim().to_string(), value));
            }
        }
    }
    tags.sort_by(|a, b| a.1.cmp(&b.1));

    let mut chips = vec![TagChip {
        label: "All".to_string(),
        value: ALL_TAGS.to_string(),
        active: active == ALL_TAGS,
    }];
    chips.extend(tags.into_iter().map(|(label, value)| TagChip {
        active: value == active,
        label,
        value,
    }));
    chips
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ribbon {
    Featured,
    Article,
}

impl Ribbon {
    pub fn label(self) -> &'static str {
        match self {
            Self::Featured => "FEATURED",
            Self::Article => "ARTICLE",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Featured => "r-featured",
            Self::Article => "r-article",
        }
    }
}

/// Display-ready summary of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub cover: String,
    pub ribbon: Ribbon,
    pub verified: bool,
    pub date: String,
    pub time: String,
    pub reading_time: String,
    pub tags: Vec<String>,
    /// Lower-cased title, summary and tags, matched by the static search box.
    pub search: String,
    pub timestamp: i64,
}

impl Card {
    pub fn new(record: &ArticleRecord, display: &DisplayConfig, tag_limit: usize) -> Self {
        let offset = display.offset();
        Self {
            id: record.id.clone(),
            title: record.display_title().to_string(),
            summary: record.summary.clone(),
            cover: record.cover_or(&display.default_cover).to_string(),
            ribbon: if record.featured {
                Ribbon::Featured
            } else {
                Ribbon::Article
            },
            verified: record.verified,
            date: format_date(record.datetime, &offset),
            time: format_time(record.datetime, &offset),
            reading_time: reading_time(&record.content, display.words_per_minute),
            tags: record.tags.iter().take(tag_limit).cloned().collect(),
            search: record.search_text(),
            timestamp: record.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingStats {
    pub total: usize,
    pub featured: usize,
    /// Date of the newest record, `None` when it has no usable timestamp.
    pub latest: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingView {
    pub state: ListingState,
    pub featured: Option<Card>,
    pub cards: Vec<Card>,
    pub chips: Vec<TagChip>,
    pub stats: ListingStats,
    pub notice: Option<Notice>,
}

impl ListingView {
    pub fn build(records: &[ArticleRecord], state: &ListingState, display: &DisplayConfig) -> Self {
        let visible = visible_records(records, state);

        let newest = visible
            .iter()
            .copied()
            .min_by(|a, b| compare(SortMode::Newest, a, b));
        let stats = ListingStats {
            total: visible.len(),
            featured: visible.iter().filter(|r| r.featured).count(),
            latest: newest
                .and_then(|r| r.datetime)
                .map(|d| format_date(Some(d), &display.offset())),
        };

        let cards = filter_sort(records, state)
            .into_iter()
            .map(|r| Card::new(r, display, display.card_tags))
            .collect();

        Self {
            state: state.clone(),
            featured: featured(visible.iter().copied())
                .map(|r| Card::new(r, display, display.featured_tags)),
            cards,
            chips: tag_chips(visible.iter().copied(), &state.tag),
            stats,
            notice: None,
        }
    }

    /// Listing rendered when the store could not be loaded.
    pub fn unavailable(state: &ListingState, notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            ..Self::build(&[], state, &DisplayConfig::default())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::parse_timestamp;

    fn record(id: &str, title: &str, date: &str, tags: &[&str]) -> ArticleRecord {
        ArticleRecord {
            id: id.to_string(),
            title: title.to_string(),
            summary: format!("summary of {title}"),
            content: String::new(),
            cover: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            datetime: parse_timestamp(date),
            featured: false,
            verified: false,
            active: true,
        }
    }

    fn sample() -> Vec<ArticleRecord> {
        vec![
            record("jan", "Zebra routing", "2024-01-01", &["Networking"]),
            record("jun", "Alpha switching", "2024-06-01", &["CCNA", "networking"]),
            record("mar", "Middle ground", "2024-03-01", &["Linux"]),
        ]
    }

    fn ids(list: &[&ArticleRecord]) -> Vec<String> {
        list.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn newest_first_is_default() {
        let records = sample();
        let list = filter_sort(&records, &ListingState::default());
        assert_eq!(ids(&list), ["jun", "mar", "jan"]);
    }

    #[test]
    fn oldest_first_reverses() {
        let records = sample();
        let state = ListingState::default().with_sort(SortMode::Oldest);
        assert_eq!(ids(&filter_sort(&records, &state)), ["jan", "mar", "jun"]);
    }

    #[test]
    fn title_sort_ignores_timestamps() {
        let records = sample();
        let state = ListingState::default().with_sort(SortMode::Title);
        assert_eq!(ids(&filter_sort(&records, &state)), ["jun", "mar", "jan"]);

        let mut shuffled = sample();
        for r in &mut shuffled {
            r.datetime = None;
        }
        assert_eq!(ids(&filter_sort(&shuffled, &state)), ["jun", "mar", "jan"]);
    }

    #[test]
    fn unparseable_dates_sort_last_when_newest_first() {
        let mut records = sample();
        records.push(record("undated", "Undated", "sometime", &[]));
        let list = filter_sort(&records, &ListingState::default());
        assert_eq!(list.last().unwrap().id, "undated");
    }

    #[test]
    fn tag_filter_matches_case_insensitively() {
        let records = sample();
        let state = ListingState::default().with_tag("LINUX");
        assert_eq!(ids(&filter_sort(&records, &state)), ["mar"]);

        let state = ListingState::default().with_tag("networking");
        assert_eq!(ids(&filter_sort(&records, &state)), ["jun", "jan"]);
    }

    #[test]
    fn all_tag_is_identity_over_active_records() {
        let mut records = sample();
        records[2].active = false;
        let list = filter_sort(&records, &ListingState::default().with_tag("all"));
        assert_eq!(ids(&list), ["jun", "jan"]);
    }

    #[test]
    fn inactive_records_shown_when_not_active_only() {
        let mut records = sample();
        records[2].active = false;
        let state = ListingState {
            active_only: false,
            ..ListingState::default()
        };
        assert_eq!(filter_sort(&records, &state).len(), 3);
    }

    #[test]
    fn text_search_covers_title_summary_and_tags() {
        let records = sample();
        let by_title = ListingState::default().with_query("ZEBRA");
        assert_eq!(ids(&filter_sort(&records, &by_title)), ["jan"]);
        let by_summary = ListingState::default().with_query("summary of middle");
        assert_eq!(ids(&filter_sort(&records, &by_summary)), ["mar"]);
        let by_tag = ListingState::default().with_query("ccna");
        assert_eq!(ids(&filter_sort(&records, &by_tag)), ["jun"]);
        let none = ListingState::default().with_query("kubernetes");
        assert!(filter_sort(&records, &none).is_empty());
    }

    #[test]
    fn filtering_is_deterministic() {
        let records = sample();
        let state = ListingState::default().with_query("a").with_sort(SortMode::Title);
        assert_eq!(filter_sort(&records, &state), filter_sort(&records, &state));
    }

    #[test]
    fn featured_picks_most_recent_flagged() {
        let mut records = sample();
        records[0].featured = true;
        records[2].featured = true;
        assert_eq!(featured(&records).unwrap().id, "mar");
        assert!(featured(&sample()).is_none());
    }

    #[test]
    fn chips_are_distinct_and_sorted() {
        let records = sample();
        let chips = tag_chips(&records, "linux");
        let values: Vec<_> = chips.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["all", "ccna", "linux", "networking"]);
        assert_eq!(chips[1].label, "CCNA");
        assert_eq!(chips[3].label, "Networking");
        assert!(chips[2].active);
        assert!(!chips[0].active);
    }

    #[test]
    fn view_reports_stats_and_empty_state() {
        let mut records = sample();
        records[1].featured = true;
        let display = DisplayConfig::default();
        let view = ListingView::build(
            &records,
            &ListingState::default().with_query("nothing matches"),
            &display,
        );
        assert!(view.is_empty());
        assert_eq!(view.stats.total, 3);
        assert_eq!(view.stats.featured, 1);
        assert_eq!(view.stats.latest.as_deref(), Some("Jun 01, 2024"));
        assert_eq!(view.featured.as_ref().unwrap().id, "jun");
        assert_eq!(view.featured.as_ref().unwrap().ribbon, Ribbon::Featured);
    }

    #[test]
    fn view_without_featured_has_empty_slot() {
        let view = ListingView::build(&sample(), &ListingState::default(), &DisplayConfig::default());
        assert!(view.featured.is_none());
        assert_eq!(view.cards.len(), 3);
    }

    #[test]
    fn cards_truncate_tags_and_fall_back_to_default_cover() {
        let mut records = vec![record("t", "Tags", "2024-01-01", &["a", "b", "c", "d", "e"])];
        records[0].verified = true;
        let view = ListingView::build(&records, &ListingState::default(), &DisplayConfig::default());
        let card = &view.cards[0];
        assert_eq!(card.tags.len(), 4);
        assert_eq!(card.cover, crate::config::BUILTIN_COVER);
        assert!(card.verified);
        assert_eq!(card.ribbon, Ribbon::Article);
    }

    #[test]
    fn unavailable_view_is_empty_with_notice() {
        let view = ListingView::unavailable(&ListingState::default(), Notice::error("down"));
        assert!(view.is_empty());
        assert_eq!(view.stats.total, 0);
        assert_eq!(view.stats.latest, None);
        assert_eq!(view.notice.unwrap().message, "down");
    }

    #[test]
    fn sort_mode_parse() {
        assert_eq!(SortMode::parse("Oldest"), Some(SortMode::Oldest));
        assert_eq!(SortMode::parse("random"), None);
        assert_eq!(ViewMode::parse("LIST"), Some(ViewMode::List));
    }
}
