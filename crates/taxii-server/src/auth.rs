use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine as _;

use crate::config::CredentialsConfig;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// The authenticated caller, attached to each request as an extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
}

impl Identity {
    pub fn user(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { username: String, password: String },
    Anonymous,
}

impl Credentials {
    /// Extract HTTP Basic credentials from request headers.
    ///
    /// A missing header, another scheme, bad base64, or a value without a
    /// `:` separator all yield `Anonymous`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(value) = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return Self::Anonymous;
        };
        let Some(encoded) = value.strip_prefix("Basic ") else {
            return Self::Anonymous;
        };
        let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(encoded.trim()) else {
            return Self::Anonymous;
        };
        let Ok(pair) = String::from_utf8(decoded) else {
            return Self::Anonymous;
        };
        match pair.split_once(':') {
            Some((username, password)) => Self::Basic {
                username: username.to_string(),
                password: password.to_string(),
            },
            None => Self::Anonymous,
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::Anonymous => f.write_str("Anonymous"),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;
}

/// Accepts exactly one configured username/password pair.
pub struct SharedCredentialAuth {
    username: String,
    password: String,
}

impl SharedCredentialAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &CredentialsConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

#[async_trait]
impl AuthProvider for SharedCredentialAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::Basic { username, password }
                if *username == self.username && *password == self.password =>
            {
                Ok(Identity::user(username.clone()))
            }
            _ => Err(ServerError::Unauthorized),
        }
    }
}

/// Middleware: authenticate every request before it reaches a handler.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let credentials = Credentials::from_headers(request.headers());
    let identity = match state.auth.authenticate(&credentials).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(
                path = %request.uri().path(),
                credentials = ?credentials,
                "authentication failed"
            );
            return Err(e);
        }
    };
    tracing::trace!(user = %identity.name, "authenticated");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
