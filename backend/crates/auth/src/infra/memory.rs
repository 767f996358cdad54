//! In-Memory Repository Implementation
//!
//! Same contract as the PostgreSQL store, for local runs and tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
use tokio::sync::RwLock;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserId};

/// In-memory user repository
///
/// Clones share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an account with a caller-chosen id, replacing any existing one
    pub async fn insert(&self, user: User) {
        self.next_id.fetch_max(user.id.value(), Ordering::SeqCst);
        self.users.write().await.insert(user.id, user);
    }

    /// Remove an account; later lookups report `UserNotFound`
    pub async fn remove(&self, id: UserId) -> Option<User> {
        self.users.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn collides(existing: &User, email: &Email, mobile: &str) -> bool {
    existing.email == *email || existing.mobile == mobile
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|existing| collides(existing, &user.email, &user.mobile))
        {
            return Err(AppError::repo(ErrorKind::UserAlreadyExists));
        }

        let id = UserId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let user = user.into_user(id, Utc::now());
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<User> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::repo(ErrorKind::UserNotFound))
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<User> {
        self.users
            .read()
            .await
            .values()
            .find(|user| user.email == *email)
            .cloned()
            .ok_or_else(|| AppError::repo(ErrorKind::UserNotFound))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(AppError::repo(ErrorKind::UserNotFound));
        }

        if users
            .values()
            .any(|existing| existing.id != user.id && collides(existing, &user.email, &user.mobile))
        {
            return Err(AppError::repo(ErrorKind::UserAlreadyExists));
        }

        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}
