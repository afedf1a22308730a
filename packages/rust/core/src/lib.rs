//! Book download orchestration for bookgrab.
//!
//! Ties the fetcher and extractor together into the end-to-end
//! [`steal_a_book`](pipeline::steal_a_book) workflow and owns output naming.

pub mod output;
pub mod pipeline;

pub use output::{output_path, sanitize_title, write_book};
pub use pipeline::{
    BookSummary, ProgressReporter, SilentProgress, StealBookConfig, normalize_root, steal_a_book,
};
