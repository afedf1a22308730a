//! Application configuration for bookgrab.
//!
//! User config lives at `~/.bookgrab/bookgrab.toml` and is optional.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BookgrabError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "bookgrab.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".bookgrab";

/// Book title heading on an OFPS index page.
pub const OFPS_BOOK_TITLE_QUERY: &str =
    r#"div[id="main_content"] div[class="book"] h1[class="title"]"#;

/// First-page content block on an OFPS index page.
pub const OFPS_FIRST_PAGE_QUERY: &str = r#"div[id="main_content"] div[class="book"]"#;

/// Table-of-contents anchors on an OFPS index page.
pub const OFPS_TOC_QUERY: &str =
    r#"div[id="main_content"] div[class="toc"] > dl > dt > span > a"#;

/// Chapter content block on an OFPS chapter page.
pub const OFPS_CHAPTER_QUERY: &str = r#"div[id="main_content"] div[class="chapter"]"#;

// ---------------------------------------------------------------------------
// Config structs (matching bookgrab.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Structural queries locating content on the target site.
    #[serde(default)]
    pub queries: StructuralQueries,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Index page name, relative to the book root URL.
    #[serde(default = "default_index_page")]
    pub index_page: String,

    /// Directory for title-derived output files.
    #[serde(default = "default_save_to")]
    pub save_to: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            index_page: default_index_page(),
            save_to: default_save_to(),
        }
    }
}

fn default_index_page() -> String {
    "index.html".into()
}
fn default_save_to() -> String {
    ".".into()
}

/// `[fetch]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout. Unset means the transport default (none).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Maximum redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: None,
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_user_agent() -> String {
    concat!("bookgrab/", env!("CARGO_PKG_VERSION")).into()
}
fn default_max_redirects() -> usize {
    10
}

/// `[queries]` section: the four CSS selectors tying bookgrab to one site layout.
///
/// Retargeting to a differently structured site means replacing these values;
/// the pipeline itself does not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralQueries {
    #[serde(default = "default_book_title")]
    pub book_title: String,

    #[serde(default = "default_first_page")]
    pub first_page: String,

    #[serde(default = "default_toc")]
    pub toc: String,

    #[serde(default = "default_chapter")]
    pub chapter: String,
}

impl StructuralQueries {
    /// The query set for O'Reilly OFPS-style books.
    pub fn ofps() -> Self {
        Self {
            book_title: OFPS_BOOK_TITLE_QUERY.into(),
            first_page: OFPS_FIRST_PAGE_QUERY.into(),
            toc: OFPS_TOC_QUERY.into(),
            chapter: OFPS_CHAPTER_QUERY.into(),
        }
    }
}

impl Default for StructuralQueries {
    fn default() -> Self {
        Self::ofps()
    }
}

fn default_book_title() -> String {
    OFPS_BOOK_TITLE_QUERY.into()
}
fn default_first_page() -> String {
    OFPS_FIRST_PAGE_QUERY.into()
}
fn default_toc() -> String {
    OFPS_TOC_QUERY.into()
}
fn default_chapter() -> String {
    OFPS_CHAPTER_QUERY.into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.bookgrab/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BookgrabError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.bookgrab/bookgrab.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = match config_file_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "no home directory, using default config");
            return Ok(AppConfig::default());
        }
    };

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BookgrabError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BookgrabError::config(format!("failed to parse {}: {e}", path.display())))
}
