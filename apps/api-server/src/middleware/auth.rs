//! Authentication extractor.
//!
//! Authentication is delegated to the external validator service: the
//! request carries an opaque validator token, the service resolves it to a
//! username, and the allowlist decides whether that user may mutate posts.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use futures_util::future::LocalBoxFuture;

use warpdrive_core::ports::AuthError;

use crate::state::AppState;

/// Validated caller identity.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::NotAllowed(_) => actix_web::http::StatusCode::FORBIDDEN,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        use warpdrive_shared::ErrorResponse;

        let error = match &self.0 {
            AuthError::MissingToken => {
                ErrorResponse::unauthorized("invalid or missing validator")
            }
            AuthError::InvalidToken => {
                ErrorResponse::unauthorized("invalid or missing validator")
            }
            AuthError::Unavailable(_) => ErrorResponse::unauthorized("validator unreachable"),
            AuthError::NotAllowed(_) => ErrorResponse::forbidden("user not allowed"),
        };

        actix_web::HttpResponse::build(self.status_code()).json(error)
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = extract_token(req);

        Box::pin(async move {
            let state = match state {
                Some(state) => state,
                None => {
                    tracing::error!("AppState not found in app data");
                    return Err(AuthenticationError(AuthError::Unavailable(
                        "server configuration error".to_string(),
                    )));
                }
            };

            let token = token.ok_or(AuthenticationError(AuthError::MissingToken))?;
            let username = state
                .validator
                .validate(&token)
                .await
                .map_err(AuthenticationError)?;

            if !state.allowed_users.contains(&username) {
                tracing::debug!(%username, "validated user not on the allowlist");
                return Err(AuthenticationError(AuthError::NotAllowed(username)));
            }

            Ok(Identity { username })
        })
    }
}

/// The validator token comes from `X-Rotur-Validator` or, failing that,
/// `Authorization: Validator <token>`.
fn extract_token(req: &HttpRequest) -> Option<String> {
    if let Some(value) = req.headers().get("X-Rotur-Validator") {
        if let Ok(token) = value.to_str() {
            let token = token.trim();
            if !token.is_empty() {
                return Some(token.to_string());
            }
        }
    }

    let auth = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    auth.strip_prefix("Validator ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
