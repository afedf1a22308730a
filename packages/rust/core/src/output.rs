//! Output file naming and persistence.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use bookgrab_shared::{BookgrabError, Result};

/// Everything that may not appear in a title-derived file name.
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_\-.() ]+").expect("static regex is valid"));

/// Drop every character that is not ASCII alphanumeric, `_`, `-`, `.`, `(`, `)` or space.
pub fn sanitize_title(title: &str) -> String {
    UNSAFE_FILENAME_CHARS.replace_all(title, "").into_owned()
}

/// `save_path` verbatim if given, otherwise `save_to/<sanitized title>.html`.
pub fn output_path(save_path: Option<&Path>, save_to: &Path, title: &str) -> PathBuf {
    match save_path {
        Some(path) => path.to_path_buf(),
        None => save_to.join(format!("{}.html", sanitize_title(title))),
    }
}

/// Create or truncate `path` and write `contents` in one go.
///
/// The handle is closed on every path out of this function. A failed write
/// may leave a partial file behind.
pub fn write_book(path: &Path, contents: &str) -> Result<usize> {
    let mut file = File::create(path).map_err(|e| BookgrabError::io(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| BookgrabError::io(path, e))?;
    debug!(?path, bytes = contents.len(), "book written");
    Ok(contents.len())
}
