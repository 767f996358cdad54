//! Account lookups shared by the use cases
//!
//! Repository failures are re-raised at the service layer; only
//! `UserNotFound` keeps its identity.

use kernel::error::{app_error::AppResult, kind::ErrorKind};

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserId};
use crate::error::service_error;

pub(crate) async fn find_user_by_id<R>(repo: &R, id: UserId) -> AppResult<User>
where
    R: UserRepository,
{
    repo.find_by_id(id).await.map_err(|e| {
        tracing::debug!(user_id = %id, error = %e, "User lookup failed");
        service_error(e, &[ErrorKind::UserNotFound])
    })
}

pub(crate) async fn find_user_by_email<R>(repo: &R, email: &Email) -> AppResult<User>
where
    R: UserRepository,
{
    repo.find_by_email(email).await.map_err(|e| {
        tracing::debug!(error = %e, "User lookup by email failed");
        service_error(e, &[ErrorKind::UserNotFound])
    })
}

/// Persist an updated account; a collision on email or mobile keeps its kind
pub(crate) async fn save_user<R>(repo: &R, user: &User) -> AppResult<User>
where
    R: UserRepository,
{
    repo.update(user).await.map_err(|e| {
        tracing::debug!(user_id = %user.id, error = %e, "User update failed");
        service_error(e, &[ErrorKind::UserNotFound, ErrorKind::UserAlreadyExists])
    })
}
