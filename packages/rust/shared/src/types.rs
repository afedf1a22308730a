//! Domain types for a single book download.
//!
//! Everything here is transient: built during one run, written out once,
//! then dropped.

use url::Url;

// ---------------------------------------------------------------------------
// RawDocument
// ---------------------------------------------------------------------------

/// Decoded page text plus the URL it was fetched from.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Source URL of the page.
    pub url: Url,
    /// Decoded markup with the embedded encoding declaration removed.
    pub text: String,
}

// ---------------------------------------------------------------------------
// TableOfContents
// ---------------------------------------------------------------------------

/// Ordered chapter link targets, exactly as written on the index page.
///
/// Order decides chapter order in the output. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOfContents {
    pub hrefs: Vec<String>,
}

impl TableOfContents {
    pub fn new(hrefs: Vec<String>) -> Self {
        Self { hrefs }
    }

    pub fn len(&self) -> usize {
        self.hrefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hrefs.is_empty()
    }

    /// Resolve every entry against `base`.
    ///
    /// Absolute hrefs pass through unchanged; relative ones are joined with
    /// standard URL resolution rules.
    pub fn resolve(&self, base: &Url) -> std::result::Result<Vec<Url>, url::ParseError> {
        self.hrefs.iter().map(|href| base.join(href)).collect()
    }
}

// ---------------------------------------------------------------------------
// ChapterFragment / BookDocument
// ---------------------------------------------------------------------------

/// Serialized markup extracted from one chapter page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterFragment {
    /// Page the fragment was extracted from.
    pub url: Url,
    /// Outer HTML of every chapter block on the page. Empty if none matched.
    pub html: String,
}

/// The assembled book: first page followed by chapters in TOC order.
#[derive(Debug, Clone)]
pub struct BookDocument {
    pub title: String,
    pub first_page: String,
    pub chapters: Vec<ChapterFragment>,
}

impl BookDocument {
    /// Concatenate the first page and all chapters with no separator.
    pub fn render(&self) -> String {
        let capacity =
            self.first_page.len() + self.chapters.iter().map(|c| c.html.len()).sum::<usize>();
        let mut out = String::with_capacity(capacity);
        out.push_str(&self.first_page);
        for chapter in &self.chapters {
            out.push_str(&chapter.html);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_relative_and_absolute() {
        let base = Url::parse("http://example.com/book/").unwrap();
        let toc = TableOfContents::new(vec![
            "ch1.html".into(),
            "http://other.com/x.html".into(),
        ]);

        let urls = toc.resolve(&base).unwrap();
        assert_eq!(urls[0].as_str(), "http://example.com/book/ch1.html");
        assert_eq!(urls[1].as_str(), "http://other.com/x.html");
    }

    #[test]
    fn resolve_keeps_order_and_duplicates() {
        let base = Url::parse("http://example.com/book/").unwrap();
        let toc = TableOfContents::new(vec!["b.html".into(), "a.html".into(), "b.html".into()]);

        let paths: Vec<String> = toc
            .resolve(&base)
            .unwrap()
            .iter()
            .map(|u| u.path().to_string())
            .collect();
        assert_eq!(paths, ["/book/b.html", "/book/a.html", "/book/b.html"]);
    }

    #[test]
    fn render_concatenates_without_separator() {
        let url = Url::parse("http://example.com/book/ch1.html").unwrap();
        let book = BookDocument {
            title: "T".into(),
            first_page: "<div>first</div>".into(),
            chapters: vec![
                ChapterFragment {
                    url: url.clone(),
                    html: "<div>one</div>".into(),
                },
                ChapterFragment {
                    url: url.clone(),
                    html: String::new(),
                },
                ChapterFragment {
                    url,
                    html: "<div>two</div>".into(),
                },
            ],
        };

        assert_eq!(book.render(), "<div>first</div><div>one</div><div>two</div>");
    }
}
