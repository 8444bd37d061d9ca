use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use taxii_engine::EngineError;
use taxii_store::StoreError;
use taxii_types::TypeError;
use thiserror::Error;

use crate::media::TaxiiJson;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("authentication required")]
    Unauthorized,

    #[error("api root not found: {0}")]
    RootNotFound(String),

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("discovery information is not configured")]
    DiscoveryNotConfigured,

    #[error("unsupported TAXII version: {0}")]
    UnsupportedVersion(String),

    #[error("the media type provided in the Accept header is invalid")]
    NotAcceptable,

    #[error("unsupported content type: {0}")]
    UnsupportedMediaType(String),

    #[error("request body exceeds the limit of {max} bytes")]
    PayloadTooLarge { max: u64 },

    #[error("unreadable request body: {0}")]
    UnreadableBody(String),

    #[error("invalid bundle: {0}")]
    Bundle(#[from] TypeError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::RootNotFound(_)
            | Self::CollectionNotFound(_)
            | Self::DiscoveryNotConfigured
            | Self::UnsupportedVersion(_) => StatusCode::NOT_FOUND,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Bundle(_) | Self::UnreadableBody(_) => StatusCode::BAD_REQUEST,
            Self::Engine(EngineError::InvalidParameter { .. }) => StatusCode::BAD_REQUEST,
            Self::Engine(EngineError::Store(e)) | Self::Store(e) => store_status(e),
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn store_status(error: &StoreError) -> StatusCode {
    if error.is_retryable() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// TAXII error message body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    title: String,
    http_status: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = ErrorBody {
            title: self.to_string(),
            http_status: status.as_u16().to_string(),
        };
        let mut response = (status, TaxiiJson(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Basic realm=\"taxii\""),
            );
        }
        response
    }
}
