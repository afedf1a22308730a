//! Page fetching and structural content extraction.
//!
//! This crate provides:
//! - [`fetcher`]: HTTP fetcher with charset decoding and encoding-declaration stripping
//! - [`extractor`]: tolerant HTML parsing and the four structural queries

pub mod extractor;
pub mod fetcher;

pub use extractor::{
    CompiledQueries, ParsedDocument, Query, parse, query_elements, query_serialized,
};
pub use fetcher::{Fetcher, charset_from_content_type, decode_body, strip_encoding_declaration};

#[cfg(test)]
mod tests {
    use super::*;
    use bookgrab_shared::StructuralQueries;
    use url::Url;

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn ofps() -> CompiledQueries {
        CompiledQueries::compile(&StructuralQueries::ofps()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Fixture extraction tests
    // -----------------------------------------------------------------------

    #[test]
    fn index_fixture_declaration_is_stripped() {
        let raw = load_fixture("ofps_index.html");
        assert!(raw.contains("<?xml"));

        let stripped = strip_encoding_declaration(&raw);
        assert!(!stripped.contains("encoding="));
        assert!(stripped.trim_start().starts_with("<!DOCTYPE"));
    }

    #[test]
    fn index_fixture_title_and_first_page() {
        let doc = parse(&strip_encoding_declaration(&load_fixture("ofps_index.html")));
        let url = Url::parse("http://ofps.example.com/titles/9780596155957/index.html").unwrap();
        let queries = ofps();

        assert_eq!(queries.book_title(&doc, &url).unwrap(), "Programming Scala: Vol. 1?");

        let first = queries.first_page(&doc);
        assert!(first.starts_with(r#"<div class="book""#));
        assert!(first.contains("Dean Wampler"));
        // Site navigation outside main_content is not part of the book.
        assert!(!first.contains("Site navigation"));
    }

    #[test]
    fn index_fixture_toc_order() {
        let doc = parse(&strip_encoding_declaration(&load_fixture("ofps_index.html")));
        let toc = ofps().toc(&doc).unwrap();

        assert_eq!(
            toc.hrefs,
            [
                "preface.html",
                "ZeroToSixty.html",
                "TypeLessDoMore.html",
                "http://ofps.example.com/extras/appendix.html",
            ]
        );
    }

    #[test]
    fn chapter_fixture_extracts_block() {
        let doc = parse(&load_fixture("ofps_chapter.html"));
        let html = ofps().chapter(&doc);

        assert!(html.starts_with(r#"<div class="chapter""#));
        assert!(html.contains("Zero to Sixty"));
        assert!(!html.contains("Comments powered by"));
    }

    #[test]
    fn chapter_fixture_without_block_is_empty() {
        let doc = parse(&load_fixture("ofps_missing_chapter.html"));
        assert_eq!(ofps().chapter(&doc), "");
    }
}
