use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{SiteConfig, BUILTIN_COVER};
use crate::error::{FolioError, LoadError, Result};
use crate::html::{
    render_article, render_landing, render_listing, Chrome, Templates, DEFAULT_COVER_SVG,
    STYLESHEET,
};
use crate::landing::{landing_transition, LandingView};
use crate::listing::{tag_chips, ListingState, ListingView, ViewMode, ALL_TAGS};
use crate::markup::Markup;
use crate::notice::Notice;
use crate::query::{Links, StaticPaths};
use crate::reader::ArticlePage;
use crate::store::{ArticleStore, StoreLoader, StoreSource};
use crate::theme::Theme;
use crate::tree::PageNode;

/// Static site builder.
#[derive(Debug)]
pub struct Site {
    config: SiteConfig,
    dest: PathBuf,
    loader: StoreLoader,
    templates: Templates,
    markup: Markup,
    theme: Option<Theme>,
}

impl Site {
    pub fn new(config: SiteConfig, dest: PathBuf, theme: Option<Theme>) -> Result<Site> {
        let templates = Templates::load(config.templates_dir.as_deref())?;
        let loader = StoreLoader::new(StoreSource::parse(&config.store.source));
        Ok(Site {
            config,
            dest,
            loader,
            templates,
            markup: Markup::new()?,
            theme,
        })
    }

    fn chrome(&self, depth: usize, paths: &Arc<StaticPaths>) -> Chrome {
        Chrome::new(
            &self.config,
            Links::static_at_depth(depth, Arc::clone(paths)),
            self.theme,
        )
    }

    fn write(&self, relative: &Path, contents: &[u8]) -> Result<()> {
        let path = self.dest.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FolioError::io(parent, e))?;
        }
        std::fs::write(&path, contents).map_err(|e| FolioError::io(&path, e))
    }

    fn write_listing(
        &self,
        relative: &str,
        view: &ListingView,
        tag: Option<String>,
        paths: &Arc<StaticPaths>,
    ) -> Result<PageNode> {
        let depth = relative.matches('/').count();
        let html = render_listing(view, &self.chrome(depth, paths), &self.templates);
        self.write(Path::new(relative), html.as_bytes())?;
        info!(path = relative, articles = view.cards.len(), "wrote listing");
        Ok(PageNode::Listing {
            path: relative.into(),
            tag,
            articles: view.cards.len(),
        })
    }

    fn write_landing(&self, paths: &Arc<StaticPaths>) -> Result<PageNode> {
        let view = LandingView::build(&self.config.portfolio, landing_transition(""));
        let html = render_landing(&view, &self.chrome(0, paths), &self.templates);
        let path = PathBuf::from("home.html");
        self.write(&path, html.as_bytes())?;
        info!(path = %path.display(), tabs = view.tabs.len(), "wrote landing page");
        Ok(PageNode::Landing { path })
    }

    /// Fetches and parses the store; either failure counts as unavailable.
    async fn fetch_store(&self) -> std::result::Result<(Vec<u8>, ArticleStore), LoadError> {
        let bytes = self.loader.fetch_bytes().await?;
        let store = ArticleStore::from_json(&bytes)?;
        Ok((bytes, store))
    }

    /// Loads the store once and writes the whole tree. When the store cannot
    /// be loaded or parsed the index still gets written, carrying a notice,
    /// and the load error is returned.
    pub async fn build(&self) -> Result<Vec<PageNode>> {
        std::fs::create_dir_all(&self.dest).map_err(|e| FolioError::io(&self.dest, e))?;
        self.write(Path::new("style.css"), STYLESHEET.as_bytes())?;
        self.write(Path::new(BUILTIN_COVER), DEFAULT_COVER_SVG.as_bytes())?;
        if let Some(dir) = &self.config.assets_dir {
            let copied = copy_tree(dir, &self.dest)?;
            info!(from = %dir.display(), files = copied, "copied assets");
        }

        let (bytes, store) = match self.fetch_store().await {
            Ok(loaded) => loaded,
            Err(e) => {
                error!(source = %self.loader.source(), error = %e, "article store unavailable");
                let view = ListingView::unavailable(
                    &ListingState::default(),
                    Notice::error("Articles data not found. Check the store path or URL."),
                );
                self.write_listing("index.html", &view, None, &Arc::default())?;
                return Err(e.into());
            }
        };
        self.write(Path::new("articles.json"), &bytes)?;

        let display = &self.config.display;
        let state = ListingState::default();
        let view = ListingView::build(store.records(), &state, display);
        let chips = tag_chips(store.records(), ALL_TAGS);
        let paths = Arc::new(StaticPaths::new(
            store.records().iter().map(|r| r.id.as_str()),
            chips
                .iter()
                .filter(|c| c.value != ALL_TAGS)
                .map(|c| c.value.as_str()),
        ));

        let mut pages = Vec::new();
        pages.extend(self.write_articles(&store, &paths)?);
        pages.push(self.write_listing("index.html", &view, None, &paths)?);

        let list_state = state.with_view(ViewMode::List);
        let list_view = ListingView::build(store.records(), &list_state, display);
        pages.push(self.write_listing("list.html", &list_view, None, &paths)?);

        for chip in view.chips.iter().filter(|c| c.value != ALL_TAGS) {
            let tag_state = state.with_tag(&chip.value);
            let tag_view = ListingView::build(store.records(), &tag_state, display);
            let relative = format!("tags/{}.html", paths.tag(&chip.value));
            pages.push(self.write_listing(&relative, &tag_view, Some(chip.value.clone()), &paths)?);
        }

        pages.push(self.write_landing(&paths)?);

        pages.sort();
        self.write(Path::new("site.json"), serde_json::to_string_pretty(&pages)?.as_bytes())?;
        info!(pages = pages.len(), dest = %self.dest.display(), "site built");
        Ok(pages)
    }

    /// One page per distinct id. Later records repeating an id are skipped.
    fn write_articles(
        &self,
        store: &ArticleStore,
        paths: &Arc<StaticPaths>,
    ) -> Result<Vec<PageNode>> {
        let chrome = self.chrome(1, paths);
        let mut seen = HashSet::new();
        let mut pages = Vec::new();
        for record in store.records() {
            if !seen.insert(record.id.as_str()) {
                warn!(id = %record.id, "duplicate article id, skipping");
                continue;
            }
            let relative = PathBuf::from(format!("article/{}.html", paths.article(&record.id)));
            info!(id = %record.id, path = %relative.display(), "processing article");

            let page = ArticlePage::new(
                record,
                &self.markup,
                &self.config.display,
                &self.config.site.title,
            );
            let html = render_article(&page, &chrome, &self.templates);
            self.write(&relative, html.as_bytes())?;
            pages.push(PageNode::Article {
                path: relative,
                id: record.id.clone(),
                title: page.title,
                datetime: record.datetime,
            });
        }
        Ok(pages)
    }
}

/// Copies every file under `from` into `to`, keeping relative paths.
fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    let entries = std::fs::read_dir(from).map_err(|e| FolioError::io(from, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| FolioError::io(from, e))?;
        let source = entry.path();
        let target = to.join(entry.file_name());
        let kind = entry.file_type().map_err(|e| FolioError::io(&source, e))?;
        if kind.is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| FolioError::io(&target, e))?;
            copied += copy_tree(&source, &target)?;
        } else if kind.is_file() {
            std::fs::copy(&source, &target).map_err(|e| FolioError::io(&source, e))?;
            debug!(path = %target.display(), "copied asset");
            copied += 1;
        }
    }
    Ok(copied)
}
