//! TAXII media types: Accept negotiation, Content-Type checks, and the JSON
//! response wrapper that labels bodies as `application/taxii+json`.

use axum::extract::Request;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::{ServerError, ServerResult};

pub const TAXII_MEDIA_TYPE: &str = "application/taxii+json";
pub const TAXII_CONTENT_TYPE: &str = "application/taxii+json;version=2.1";
pub const SUPPORTED_VERSION: &str = "2.1";

/// JSON body served with the TAXII content type.
#[derive(Debug, Clone)]
pub struct TaxiiJson<T>(pub T);

impl<T: Serialize> IntoResponse for TaxiiJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(bytes) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(TAXII_CONTENT_TYPE))],
                bytes,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "response serialization failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Parse one media range as a TAXII type, returning its version if given.
///
/// `Some(None)` is a bare `application/taxii+json`; `None` is not a TAXII
/// range at all (including a malformed version parameter).
fn taxii_version(range: &str) -> Option<Option<&str>> {
    let rest = range.strip_prefix(TAXII_MEDIA_TYPE)?;
    if rest.is_empty() {
        return Some(None);
    }
    let version = rest.strip_prefix(";version=")?;
    match version.as_bytes() {
        [major, b'.', minor] if major.is_ascii_digit() && minor.is_ascii_digit() => {
            Some(Some(version))
        }
        _ => None,
    }
}

/// Decide whether an Accept header value selects TAXII 2.1.
///
/// Whitespace is ignored and the value is split on commas. The first TAXII
/// range decides: a bare type or `version=2.1` is accepted, any other
/// version is unsupported. No TAXII range at all is not acceptable.
pub fn negotiate(accept: Option<&str>) -> ServerResult<()> {
    let compact: String = accept
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    for range in compact.split(',') {
        match taxii_version(range) {
            Some(None) | Some(Some(SUPPORTED_VERSION)) => return Ok(()),
            Some(Some(other)) => return Err(ServerError::UnsupportedVersion(other.to_string())),
            None => continue,
        }
    }
    Err(ServerError::NotAcceptable)
}

/// Require a TAXII 2.1 Content-Type on a request body.
pub fn require_taxii_content(headers: &HeaderMap) -> ServerResult<()> {
    let raw = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    match taxii_version(&compact) {
        Some(None) | Some(Some(SUPPORTED_VERSION)) => Ok(()),
        _ => Err(ServerError::UnsupportedMediaType(raw.to_string())),
    }
}

/// Middleware rejecting requests whose Accept header does not select TAXII 2.1.
pub async fn require_taxii_accept(request: Request, next: Next) -> Result<Response, ServerError> {
    let accept = request
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok());
    negotiate(accept)?;
    Ok(next.run(request).await)
}
