use thiserror::Error;
use url::Url;

/// Maximum accepted length for a link handed to the system browser.
const MAX_OPEN_URL_LENGTH: usize = 2048;

/// Why an article link was refused.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// The URL contains whitespace or control characters.
    #[error("URL contains control characters")]
    ControlCharacters,
    /// The URL exceeds the length limit.
    #[error("URL too long ({0} bytes)")]
    TooLong(usize),
}

/// Validate an article link before handing it to `open::that`.
///
/// Article URLs come from the headline service, so anything that is not a
/// plain http(s) link with a host is refused. The raw string is checked for
/// whitespace and control characters before parsing because the URL parser
/// silently strips some of them.
///
/// # Examples
///
/// ```
/// use headlines::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://example.com/story").is_ok());
/// assert!(validate_url_for_open("file:///etc/passwd").is_err());
/// assert!(validate_url_for_open("javascript:alert(1)").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    if url_str.len() > MAX_OPEN_URL_LENGTH {
        return Err(UrlValidationError::TooLong(url_str.len()));
    }
    if url_str.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(UrlValidationError::ControlCharacters);
    }

    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_links_accepted() {
        assert!(validate_url_for_open("https://news.example.com/2024/05/story.html").is_ok());
        assert!(validate_url_for_open("http://example.org/a?b=c#d").is_ok());
        assert!(validate_url_for_open("https://example.com:8443/x").is_ok());
    }

    #[test]
    fn test_non_http_schemes_rejected() {
        for url in [
            "file:///etc/passwd",
            "ftp://example.com/file",
            "javascript:alert(1)",
            "data:text/html,hi",
        ] {
            assert!(
                matches!(
                    validate_url_for_open(url),
                    Err(UrlValidationError::UnsupportedScheme(_))
                ),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_unparseable_rejected() {
        assert!(matches!(
            validate_url_for_open("not a url"),
            Err(UrlValidationError::ControlCharacters)
        ));
        assert!(matches!(
            validate_url_for_open("example.com/no-scheme"),
            Err(UrlValidationError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_embedded_controls_rejected() {
        assert!(matches!(
            validate_url_for_open("https://example.com/\nrm -rf"),
            Err(UrlValidationError::ControlCharacters)
        ));
        assert!(matches!(
            validate_url_for_open("https://example.com/\x1b[31m"),
            Err(UrlValidationError::ControlCharacters)
        ));
    }

    #[test]
    fn test_overlong_rejected() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_OPEN_URL_LENGTH));
        assert!(matches!(
            validate_url_for_open(&url),
            Err(UrlValidationError::TooLong(_))
        ));
    }
}
