//! URL Validator (§4.1): normalizes a user-supplied URL and rejects anything
//! that isn't a plausible HTTP(S) site to crawl.

use crate::error::AppError;
use crate::url_norm::normalize;
use std::net::IpAddr;
use url::Url;

/// Validates and normalizes `raw_url`, returning the canonical
/// `scheme://host[:port]/path[?query]` form.
pub fn validate_url(raw_url: &str) -> Result<String, AppError> {
    let value = raw_url.trim();
    if value.is_empty() {
        return Err(AppError::InvalidUrl("url is required".into()));
    }

    let parsed = match Url::parse(value) {
        Ok(url) if !url.cannot_be_a_base() => url,
        _ => {
            let with_scheme = format!("https://{value}");
            Url::parse(&with_scheme)
                .map_err(|_| AppError::InvalidUrl("invalid url".into()))?
        }
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::InvalidUrl(
            "url must start with http:// or https://".into(),
        ));
    }

    let host = parsed.host_str().unwrap_or("");
    if host.is_empty() {
        return Err(AppError::InvalidUrl("invalid url".into()));
    }

    if host != "localhost" && host.parse::<IpAddr>().is_err() && !host.contains('.') {
        return Err(AppError::InvalidUrl("invalid url host".into()));
    }

    Ok(normalize(&parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert!(validate_url("").is_err());
        assert!(validate_url("   ").is_err());
    }

    #[test]
    fn prepends_https_when_scheme_missing() {
        assert_eq!(validate_url("example.com").unwrap(), "https://example.com/");
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn rejects_dotless_host() {
        assert!(validate_url("https://examplecom").is_err());
    }

    #[test]
    fn allows_localhost() {
        assert_eq!(validate_url("http://localhost:8080").unwrap(), "http://localhost:8080/");
    }

    #[test]
    fn allows_ip_literal() {
        assert_eq!(validate_url("http://127.0.0.1/path").unwrap(), "http://127.0.0.1/path");
    }

    #[test]
    fn strips_fragment_and_defaults_path() {
        assert_eq!(validate_url("https://example.com#frag").unwrap(), "https://example.com/");
    }

    #[test]
    fn keeps_query_string() {
        assert_eq!(
            validate_url("https://example.com/search?q=1").unwrap(),
            "https://example.com/search?q=1"
        );
    }
}
