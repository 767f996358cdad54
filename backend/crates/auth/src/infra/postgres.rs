//! PostgreSQL Repository Implementation
//!
//! Expects the `users` table:
//!
//! ```sql
//! CREATE TABLE users (
//!     id          BIGSERIAL PRIMARY KEY,
//!     email       TEXT        NOT NULL UNIQUE,
//!     mobile      TEXT        NOT NULL UNIQUE,
//!     password    TEXT        NOT NULL,
//!     first_name  TEXT        NOT NULL,
//!     last_name   TEXT        NOT NULL,
//!     image_url   TEXT        NOT NULL DEFAULT '',
//!     address     TEXT        NOT NULL DEFAULT '',
//!     role        SMALLINT    NOT NULL DEFAULT 0,
//!     active      BOOLEAN     NOT NULL DEFAULT FALSE,
//!     created_at  TIMESTAMPTZ NOT NULL,
//!     updated_at  TIMESTAMPTZ NOT NULL,
//!     deleted_at  TIMESTAMPTZ
//! );
//! ```
//!
//! Soft-deleted rows (`deleted_at IS NOT NULL`) are invisible to lookups.

use chrono::{DateTime, Utc};
use kernel::error::{
    app_error::{AppError, AppResult, OptionExt},
    kind::{ErrorKind, Layer},
};
use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, UserId, UserPassword, UserRole};

const USER_COLUMNS: &str = "id, email, mobile, password, first_name, last_name, image_url, \
                            address, role, active, created_at, updated_at";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, filter: &str, bind: FilterValue<'_>) -> AppResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {filter} AND deleted_at IS NULL");
        let query = sqlx::query_as::<_, UserRow>(&sql);
        let query = match bind {
            FilterValue::Id(id) => query.bind(id),
            FilterValue::Text(text) => query.bind(text),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(repo_error)?
            .ok_or_app_err(Layer::Repo, ErrorKind::UserNotFound)?
            .into_user()
    }
}

enum FilterValue<'a> {
    Id(i64),
    Text(&'a str),
}

/// Lift a driver error to the repository layer, keeping its kind
fn repo_error(e: sqlx::Error) -> AppError {
    let err = AppError::from(e).into_layer(Layer::Repo);
    if err.is_server_error() {
        tracing::error!(error = %err, "User query failed");
    }
    err
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (
                email,
                mobile,
                password,
                first_name,
                last_name,
                image_url,
                address,
                role,
                active,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING id
            "#,
        )
        .bind(user.email.as_str())
        .bind(&user.mobile)
        .bind(user.password.as_phc_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.image_url)
        .bind(&user.address)
        .bind(user.role.id())
        .bind(user.active)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(repo_error)?;

        Ok(user.into_user(UserId::new(id), now))
    }

    async fn find_by_id(&self, id: UserId) -> AppResult<User> {
        self.find_one("id = $1", FilterValue::Id(id.value())).await
    }

    async fn find_by_email(&self, email: &Email) -> AppResult<User> {
        self.find_one("email = $1", FilterValue::Text(email.as_str()))
            .await
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                email = $2,
                mobile = $3,
                password = $4,
                first_name = $5,
                last_name = $6,
                image_url = $7,
                address = $8,
                role = $9,
                active = $10,
                updated_at = $11
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id.value())
        .bind(user.email.as_str())
        .bind(&user.mobile)
        .bind(user.password.as_phc_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.image_url)
        .bind(&user.address)
        .bind(user.role.id())
        .bind(user.active)
        .bind(user.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(repo_error)?
        .ok_or_app_err(Layer::Repo, ErrorKind::UserNotFound)?;

        row.into_user()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    mobile: String,
    password: String,
    first_name: String,
    last_name: String,
    image_url: String,
    address: String,
    role: i16,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AppResult<User> {
        let role = UserRole::from_id(self.role)
            .ok_or_app_err(Layer::Repo, ErrorKind::InternalService)?;

        Ok(User {
            id: UserId::new(self.id),
            email: Email::from_db(self.email),
            mobile: self.mobile,
            password: UserPassword::from_phc_string(self.password)?,
            first_name: self.first_name,
            last_name: self.last_name,
            image_url: self.image_url,
            address: self.address,
            role,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
