//! Auth Middleware
//!
//! The request gate for protected routes, the typed extractor handlers use
//! to read the authenticated caller, and the request deadline layer.

use std::time::Duration;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use kernel::error::{
    app_error::{AppError, AppResult},
    kind::{ErrorKind, Layer},
};
use platform::bearer::{BEARER_SCHEME, extract_bearer};
use tokio::time::Instant;

use crate::application::TokenValidator;
use crate::domain::entity::principal::AuthenticatedUser;
use crate::domain::mailer::Mailer;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::AuthAppState;

/// Absolute deadline for the current request
///
/// Inserted by [`request_deadline`]; the gate bounds the account lookup by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestDeadline(pub Instant);

/// Middleware that requires a valid bearer token
///
/// Missing or malformed `Authorization` headers fail with `JwtMissing`
/// before any signature work. On success the caller's
/// [`AuthenticatedUser`] is stored in the request extensions.
pub async fn require_auth<R, M>(
    State(state): State<AuthAppState<R, M>>,
    mut req: Request,
    next: Next,
) -> AppResult<Response>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let token = extract_bearer(req.headers(), BEARER_SCHEME)
        .map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            AppError::transport(ErrorKind::JwtMissing).with_inner(e)
        })?
        .to_owned();

    let deadline = req
        .extensions()
        .get::<RequestDeadline>()
        .map(|deadline| deadline.0);

    let validator = TokenValidator::new(state.repo.clone(), state.config.clone());
    let user = validator
        .authenticate(&token, deadline)
        .await
        .map_err(reject)?;

    tracing::debug!(
        user_id = %user.user_id,
        claim_type = %user.claim_type,
        "Request authenticated"
    );

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Map a validator failure to what the client sees
///
/// Token-level failures collapse into `JwtInvalid`; account-level failures
/// keep their kind and are answered with 401 unless they are server faults.
fn reject(err: AppError) -> AppError {
    if err.is(ErrorKind::InvalidToken) {
        return AppError::transport(ErrorKind::JwtInvalid).with_inner(err);
    }

    let err = err.into_layer(Layer::Transport);
    if err.is_server_error() {
        err
    } else {
        err.with_status(401)
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!(path = %parts.uri.path(), "Handler reached without an authenticated user");
                AppError::transport(ErrorKind::JwtMissing)
            })
    }
}

/// Middleware that stamps a [`RequestDeadline`] and enforces it
///
/// A timeout too large to place on the clock leaves the request unbounded.
///
/// ## Arguments
/// * `timeout` - Budget for the whole request, from arrival
pub async fn request_deadline(
    State(timeout): State<Duration>,
    mut req: Request,
    next: Next,
) -> AppResult<Response> {
    let Some(deadline) = Instant::now().checked_add(timeout) else {
        tracing::warn!(timeout_secs = timeout.as_secs(), "Request timeout out of range, not enforced");
        return Ok(next.run(req).await);
    };
    req.extensions_mut().insert(RequestDeadline(deadline));

    tokio::time::timeout_at(deadline, next.run(req))
        .await
        .map_err(|elapsed| {
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Request deadline exceeded");
            AppError::transport(ErrorKind::InternalService).with_inner(elapsed)
        })
}
