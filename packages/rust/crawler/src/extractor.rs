//! Tolerant HTML parsing and structural queries.
//!
//! Parsing goes through html5ever (via `scraper`), which recovers from any
//! malformed input instead of failing. Queries return empty results when
//! nothing matches; only the book title and TOC link targets are mandatory.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use bookgrab_shared::{BookgrabError, Result, StructuralQueries, TableOfContents};

// ---------------------------------------------------------------------------
// ParsedDocument
// ---------------------------------------------------------------------------

/// A best-effort parse tree of one page. Never mutated.
pub struct ParsedDocument {
    html: Html,
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("errors", &self.html.errors.len())
            .finish()
    }
}

/// Parse `text` into a tree, repairing or dropping anything unparseable.
pub fn parse(text: &str) -> ParsedDocument {
    let html = Html::parse_document(text);
    if !html.errors.is_empty() {
        debug!(errors = html.errors.len(), "recovered from malformed markup");
    }
    ParsedDocument { html }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A named, compiled CSS selector.
#[derive(Debug, Clone)]
pub struct Query {
    name: &'static str,
    selector: Selector,
}

impl Query {
    /// Compile `source`; an invalid selector is a config error.
    pub fn new(name: &'static str, source: &str) -> Result<Self> {
        let selector = Selector::parse(source).map_err(|e| {
            BookgrabError::config(format!("invalid {name} query '{source}': {e}"))
        })?;
        Ok(Self { name, selector })
    }
}

/// Elements matching `query`, in document order.
pub fn query_elements<'a>(doc: &'a ParsedDocument, query: &Query) -> Vec<ElementRef<'a>> {
    let found: Vec<_> = doc.html.select(&query.selector).collect();
    debug!(query = query.name, matches = found.len(), "evaluated query");
    found
}

/// Outer HTML of every element matching `query`, concatenated with no separator.
pub fn query_serialized(doc: &ParsedDocument, query: &Query) -> String {
    query_elements(doc, query)
        .iter()
        .map(|el| el.html())
        .collect()
}

// ---------------------------------------------------------------------------
// CompiledQueries
// ---------------------------------------------------------------------------

/// The four structural queries, compiled once per run.
#[derive(Debug, Clone)]
pub struct CompiledQueries {
    pub book_title: Query,
    pub first_page: Query,
    pub toc: Query,
    pub chapter: Query,
}

impl CompiledQueries {
    pub fn compile(queries: &StructuralQueries) -> Result<Self> {
        Ok(Self {
            book_title: Query::new("book_title", &queries.book_title)?,
            first_page: Query::new("first_page", &queries.first_page)?,
            toc: Query::new("toc", &queries.toc)?,
            chapter: Query::new("chapter", &queries.chapter)?,
        })
    }

    /// Text of the first title match, trimmed.
    ///
    /// Fails with [`BookgrabError::MissingTitle`] when nothing matches.
    pub fn book_title(&self, doc: &ParsedDocument, page_url: &Url) -> Result<String> {
        let first = query_elements(doc, &self.book_title)
            .into_iter()
            .next()
            .ok_or_else(|| BookgrabError::MissingTitle {
                url: page_url.to_string(),
            })?;
        Ok(first.text().collect::<String>().trim().to_string())
    }

    /// Serialized first-page block; empty when absent.
    pub fn first_page(&self, doc: &ParsedDocument) -> String {
        query_serialized(doc, &self.first_page)
    }

    /// `href` of every TOC anchor, verbatim and in document order.
    ///
    /// An anchor without `href` is a parse error; no entry is dropped.
    pub fn toc(&self, doc: &ParsedDocument) -> Result<TableOfContents> {
        let hrefs = query_elements(doc, &self.toc)
            .into_iter()
            .map(|a| {
                a.value().attr("href").map(str::to_string).ok_or_else(|| {
                    BookgrabError::parse(format!("TOC anchor without href: {}", a.html()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TableOfContents::new(hrefs))
    }

    /// Serialized chapter block(s); empty when absent.
    pub fn chapter(&self, doc: &ParsedDocument) -> String {
        query_serialized(doc, &self.chapter)
    }
}
