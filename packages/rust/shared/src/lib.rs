//! Shared types, error model, and configuration for bookgrab.
//!
//! This crate is the foundation depended on by all other bookgrab crates.
//! It provides:
//! - [`BookgrabError`]: the unified error type
//! - Domain types ([`RawDocument`], [`TableOfContents`], [`ChapterFragment`], [`BookDocument`])
//! - Configuration ([`AppConfig`], [`StructuralQueries`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, FetchConfig, OFPS_BOOK_TITLE_QUERY, OFPS_CHAPTER_QUERY,
    OFPS_FIRST_PAGE_QUERY, OFPS_TOC_QUERY, StructuralQueries, config_dir, config_file_path,
    load_config, load_config_from,
};
pub use error::{BookgrabError, Result};
pub use types::{BookDocument, ChapterFragment, RawDocument, TableOfContents};
