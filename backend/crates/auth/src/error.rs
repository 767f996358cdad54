//! Auth Error Helpers
//!
//! Auth uses `kernel::error::AppError` directly. This module holds the
//! translation rules applied when an error crosses into the service layer.

use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Auth result type alias
pub type AuthResult<T> = AppResult<T>;

/// Re-raise a lower-layer error at the service layer
///
/// Kinds listed in `passthrough` keep their identity; every other kind
/// collapses to `InternalService`. The original error is always chained.
///
/// ## Examples
/// ```rust
/// use auth::error::service_error;
/// use kernel::error::{app_error::AppError, kind::{ErrorKind, Layer}};
///
/// let repo = AppError::repo(ErrorKind::UserNotFound);
/// let err = service_error(repo, &[ErrorKind::UserNotFound]);
/// assert!(err.is(ErrorKind::UserNotFound));
/// assert_eq!(err.layer(), Layer::Service);
/// ```
pub fn service_error(err: AppError, passthrough: &[ErrorKind]) -> AppError {
    let kind = if passthrough.iter().any(|kind| err.is(*kind)) {
        err.kind()
    } else {
        if !err.is(ErrorKind::InternalService) {
            tracing::warn!(error = %err, "Unexpected error kind collapsed to internal");
        }
        ErrorKind::InternalService
    };

    AppError::service(kind).with_inner(err)
}
