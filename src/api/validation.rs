use thiserror::Error;
use url::Url;

use super::models::AnalyzeRequest;

const MAX_PAGES_MIN: u32 = 1;
const MAX_PAGES_MAX: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    #[error("url is required")]
    MissingUrl,
    #[error("url must be a parseable http/https URL")]
    InvalidUrl,
    #[error("max_pages must be between 1 and 10, got {0}")]
    InvalidMaxPages(u32),
}

/// Validate an inbound analyze request; returns the target URL on success.
///
/// Validation happens once at entry, before any downstream call. The raw
/// URL string is handed to the analyzer untouched, so the parsed form is
/// only used for checking.
pub fn validate_request(request: &AnalyzeRequest) -> Result<&str, RequestValidationError> {
    let url = request
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .ok_or(RequestValidationError::MissingUrl)?;

    let parsed = Url::parse(url).map_err(|_| RequestValidationError::InvalidUrl)?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(RequestValidationError::InvalidUrl);
    }

    if !(MAX_PAGES_MIN..=MAX_PAGES_MAX).contains(&request.max_pages) {
        return Err(RequestValidationError::InvalidMaxPages(request.max_pages));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::StylePreference;

    fn sample_request() -> AnalyzeRequest {
        AnalyzeRequest {
            url: Some("https://example.com".to_string()),
            include_seo: true,
            max_pages: 3,
            generate_homepage: true,
            style_preference: StylePreference::Modern,
            include_booking: false,
        }
    }

    #[test]
    fn validate_request_accepts_valid_payload() {
        let request = sample_request();
        assert_eq!(validate_request(&request), Ok("https://example.com"));
    }

    #[test]
    fn validate_request_rejects_absent_url() {
        let mut request = sample_request();
        request.url = None;

        assert_eq!(
            validate_request(&request),
            Err(RequestValidationError::MissingUrl)
        );
    }

    #[test]
    fn validate_request_rejects_empty_url() {
        let mut request = sample_request();
        request.url = Some(String::new());

        assert_eq!(
            validate_request(&request),
            Err(RequestValidationError::MissingUrl)
        );
    }

    #[test]
    fn validate_request_rejects_unparseable_url() {
        let mut request = sample_request();
        request.url = Some("not a url".to_string());

        assert_eq!(
            validate_request(&request),
            Err(RequestValidationError::InvalidUrl)
        );
    }

    #[test]
    fn validate_request_rejects_non_http_scheme() {
        let mut request = sample_request();
        request.url = Some("ftp://example.com/file".to_string());

        assert_eq!(
            validate_request(&request),
            Err(RequestValidationError::InvalidUrl)
        );
    }

    #[test]
    fn validate_request_limits_max_pages() {
        let mut request = sample_request();
        request.max_pages = 0;
        assert_eq!(
            validate_request(&request),
            Err(RequestValidationError::InvalidMaxPages(0))
        );

        request.max_pages = 11;
        assert_eq!(
            validate_request(&request),
            Err(RequestValidationError::InvalidMaxPages(11))
        );

        request.max_pages = 10;
        assert!(validate_request(&request).is_ok());
    }
}
