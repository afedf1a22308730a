//! End-to-end book download: index → title + TOC → chapters → one HTML file.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};
use url::Url;

use bookgrab_crawler::{CompiledQueries, Fetcher, parse};
use bookgrab_shared::{
    AppConfig, BookDocument, BookgrabError, ChapterFragment, FetchConfig, Result,
    StructuralQueries,
};

use crate::output;

/// Configuration for [`steal_a_book`].
#[derive(Debug, Clone)]
pub struct StealBookConfig {
    /// Root URL of the book. A trailing `/` is added if missing.
    pub root_url: String,
    /// Index page, relative to the root.
    pub index_page: String,
    /// Explicit output file. Overrides `save_to`.
    pub save_path: Option<PathBuf>,
    /// Directory for the title-derived output file.
    pub save_to: PathBuf,
    /// HTTP client settings.
    pub fetch: FetchConfig,
    /// Structural queries for the target site.
    pub queries: StructuralQueries,
}

impl StealBookConfig {
    /// Build a run config from the app config; `save_path` comes from the caller.
    pub fn from_app_config(
        config: &AppConfig,
        root_url: impl Into<String>,
        save_path: Option<PathBuf>,
    ) -> Self {
        Self {
            root_url: root_url.into(),
            index_page: config.defaults.index_page.clone(),
            save_path,
            save_to: PathBuf::from(&config.defaults.save_to),
            fetch: config.fetch.clone(),
            queries: config.queries.clone(),
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct BookSummary {
    /// Book title as found on the index page.
    pub title: String,
    /// File the book was written to.
    pub path: PathBuf,
    /// Number of TOC entries fetched.
    pub chapter_count: usize,
    /// Number of bytes written.
    pub bytes_written: usize,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the index page yielded a title.
    fn title_found(&self, title: &str);
    /// Called after each chapter page is fetched and extracted.
    fn chapter_fetched(&self, url: &str, current: usize, total: usize);
    /// Called when the book has been saved.
    fn done(&self, summary: &BookSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn title_found(&self, _title: &str) {}
    fn chapter_fetched(&self, _url: &str, _current: usize, _total: usize) {}
    fn done(&self, _summary: &BookSummary) {}
}

/// Download a whole book and save it as a single HTML file.
///
/// 1. Fetch the index page and extract title, first page and TOC
/// 2. Fetch every TOC entry in order, one at a time
/// 3. Concatenate first page + chapters
/// 4. Write to `save_path` or `save_to/<title>.html`
///
/// Any failure aborts the run. A missing title or a TOC anchor without
/// `href` aborts before any chapter is requested; a chapter page without a
/// chapter block contributes nothing.
#[instrument(skip_all, fields(root_url = %config.root_url))]
pub async fn steal_a_book(
    config: &StealBookConfig,
    progress: &dyn ProgressReporter,
) -> Result<BookSummary> {
    let start = Instant::now();

    let queries = CompiledQueries::compile(&config.queries)?;
    let fetcher = Fetcher::new(&config.fetch)?;
    let root = normalize_root(&config.root_url)?;

    info!(%root, "downloading a book");
    progress.phase(&format!("Downloading a book at {root}"));

    // --- Index page ---
    let index_url = root.join(&config.index_page).map_err(|e| {
        BookgrabError::parse(format!("invalid index page '{}': {e}", config.index_page))
    })?;
    let index = fetcher.fetch(&index_url).await?;

    let (title, first_page, toc) = {
        let doc = parse(&index.text);
        let title = queries.book_title(&doc, &index.url)?;
        (title, queries.first_page(&doc), queries.toc(&doc)?)
    };

    info!(%title, chapters = toc.len(), "found book");
    progress.title_found(&title);

    let chapter_urls = toc
        .resolve(&root)
        .map_err(|e| BookgrabError::parse(format!("unresolvable TOC entry under {root}: {e}")))?;

    // --- Chapters, strictly in TOC order ---
    info!("extracting chapters");
    progress.phase("Extracting chapters");

    let total = chapter_urls.len();
    let mut chapters = Vec::with_capacity(total);
    for (i, url) in chapter_urls.into_iter().enumerate() {
        let chapter = steal_a_chapter(&fetcher, &queries, url).await?;
        progress.chapter_fetched(chapter.url.as_str(), i + 1, total);
        chapters.push(chapter);
    }

    let book = BookDocument {
        title,
        first_page,
        chapters,
    };

    // --- Save ---
    let path = output::output_path(config.save_path.as_deref(), &config.save_to, &book.title);
    info!(?path, "saving");
    progress.phase("Saving");

    let bytes_written = output::write_book(&path, &book.render())?;

    let summary = BookSummary {
        title: book.title,
        path,
        chapter_count: book.chapters.len(),
        bytes_written,
        elapsed: start.elapsed(),
    };

    info!(
        bytes = summary.bytes_written,
        chapters = summary.chapter_count,
        elapsed_ms = summary.elapsed.as_millis(),
        "all done"
    );
    progress.done(&summary);

    Ok(summary)
}

/// Fetch one chapter page and extract its chapter block.
async fn steal_a_chapter(
    fetcher: &Fetcher,
    queries: &CompiledQueries,
    url: Url,
) -> Result<ChapterFragment> {
    let page = fetcher.fetch(&url).await?;
    let html = queries.chapter(&parse(&page.text));
    if html.is_empty() {
        debug!(%url, "no chapter block on page");
    }
    Ok(ChapterFragment { url, html })
}

/// Parse the root URL, making sure it ends with `/` so relative joins stay beneath it.
pub fn normalize_root(root_url: &str) -> Result<Url> {
    let mut root = root_url.to_string();
    if !root.ends_with('/') {
        root.push('/');
    }
    Url::parse(&root).map_err(|e| BookgrabError::parse(format!("invalid book URL '{root_url}': {e}")))
}
