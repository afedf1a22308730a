//! HTTP page fetcher.
//!
//! Downloads a page, decodes it with the charset the server declared in
//! `Content-Type`, and strips the embedded `<?xml ... encoding=... ?>`
//! declaration before anything tries to parse it.

use std::sync::LazyLock;
use std::time::Duration;

use encoding_rs::Encoding;
use regex::Regex;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, instrument};
use url::Url;

use bookgrab_shared::{BookgrabError, FetchConfig, RawDocument, Result};

/// An XML declaration carrying an `encoding=` attribute.
static ENCODING_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\?xml(.+?)encoding=(.+?)\?>").expect("static regex is valid")
});

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// Sequential page fetcher. One request at a time, no retries.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Create a fetcher with the given HTTP settings.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects));

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| BookgrabError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Fetch `url` and return its decoded text with the encoding declaration removed.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<RawDocument> {
        info!(%url, "fetching");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| BookgrabError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BookgrabError::Network(format!("{url}: HTTP {status}")));
        }

        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type)
            .map(str::to_owned);

        let body = response
            .bytes()
            .await
            .map_err(|e| BookgrabError::Network(format!("{url}: body read failed: {e}")))?;

        debug!(bytes = body.len(), charset = charset.as_deref().unwrap_or("-"), "response received");

        let text = decode_body(&body, charset.as_deref(), url)?;

        Ok(RawDocument {
            url: url.clone(),
            text: strip_encoding_declaration(&text),
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pull the `charset` parameter out of a `Content-Type` header value.
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches('"');
            (!value.is_empty()).then_some(value)
        } else {
            None
        }
    })
}

/// Decode `bytes` strictly with the declared charset (UTF-8 when none is declared).
///
/// Unknown labels and malformed byte sequences are errors.
pub fn decode_body(bytes: &[u8], charset: Option<&str>, url: &Url) -> Result<String> {
    let encoding = match charset {
        Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
            BookgrabError::decode(url.as_str(), format!("unknown charset '{label}'"))
        })?,
        None => encoding_rs::UTF_8,
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
        .ok_or_else(|| {
            BookgrabError::decode(
                url.as_str(),
                format!("malformed {} byte sequence", encoding.name()),
            )
        })
}

/// Remove the first `<?xml ... encoding=... ?>` declaration; later ones stay.
pub fn strip_encoding_declaration(text: &str) -> String {
    ENCODING_DECLARATION.replace(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn any_url() -> Url {
        Url::parse("http://example.com/book/index.html").unwrap()
    }

    #[test]
    fn strips_declaration_and_preserves_the_rest() {
        let input = r#"<?xml version="1.0" encoding="utf-8"?><html><body>x</body></html>"#;
        assert_eq!(
            strip_encoding_declaration(input),
            "<html><body>x</body></html>"
        );

        let input = "<!-- a -->\n<?xml version='1.0' encoding='iso-8859-1' ?>\n<p>b</p>";
        assert_eq!(strip_encoding_declaration(input), "<!-- a -->\n\n<p>b</p>");
    }

    #[test]
    fn strips_only_the_first_declaration() {
        let second = r#"<?xml version="1.0" encoding="ascii"?>"#;
        let input = format!(r#"<?xml version="1.0" encoding="utf-8"?><a/>{second}<b/>"#);
        assert_eq!(strip_encoding_declaration(&input), format!("<a/>{second}<b/>"));
    }

    #[test]
    fn declaration_without_encoding_is_kept() {
        let input = r#"<?xml version="1.0"?><html/>"#;
        assert_eq!(strip_encoding_declaration(input), input);
    }

    #[test]
    fn charset_parameter_parsing() {
        assert_eq!(charset_from_content_type("text/html; charset=utf-8"), Some("utf-8"));
        assert_eq!(
            charset_from_content_type("text/html;Charset=\"ISO-8859-1\""),
            Some("ISO-8859-1")
        );
        assert_eq!(charset_from_content_type("text/html"), None);
        assert_eq!(charset_from_content_type("text/html; charset="), None);
        assert_eq!(charset_from_content_type("charset=utf-8"), None);
    }

    #[test]
    fn decodes_with_declared_charset() {
        let latin1 = b"caf\xe9";
        assert_eq!(decode_body(latin1, Some("iso-8859-1"), &any_url()).unwrap(), "café");
        assert_eq!(decode_body("café".as_bytes(), None, &any_url()).unwrap(), "café");
    }

    #[test]
    fn decode_failures_are_errors() {
        let err = decode_body(b"caf\xe9", Some("utf-8"), &any_url()).unwrap_err();
        assert!(matches!(err, BookgrabError::Decode { .. }));

        let err = decode_body(b"abc", Some("klingon"), &any_url()).unwrap_err();
        assert!(err.to_string().contains("unknown charset 'klingon'"));
    }

    #[tokio::test]
    async fn fetch_decodes_and_strips() {
        let server = MockServer::start().await;
        let mut body = br#"<?xml version="1.0" encoding="iso-8859-1"?>"#.to_vec();
        body.extend_from_slice(b"<html><body><p>Se\xf1or</p></body></html>");

        Mock::given(method("GET"))
            .and(path("/book/index.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body, "text/html; charset=iso-8859-1"),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/book/index.html", server.uri())).unwrap();
        let doc = fetcher.fetch(&url).await.unwrap();

        assert_eq!(doc.text, "<html><body><p>Señor</p></body></html>");
        assert_eq!(doc.url, url);
    }

    #[tokio::test]
    async fn fetch_http_error_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/missing.html", server.uri())).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();

        assert!(matches!(err, BookgrabError::Network(_)));
        assert!(err.to_string().contains("404"));
    }
}
