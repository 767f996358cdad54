//! Auth Router
//!
//! Mounted by the API under `/api/v1/user`.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::config::AuthConfig;
use crate::domain::mailer::Mailer;
use crate::domain::repository::UserRepository;
use crate::infra::{log_mailer::LogMailer, postgres::PgUserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the Auth router with the PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, mailer: LogMailer, config: AuthConfig) -> Router {
    auth_router_generic(repo, mailer, config)
}

/// Create a generic Auth router for any repository and mailer
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let state = AuthAppState::new(repo, mailer, config);

    let protected = Router::new()
        .route(
            "/profile",
            get(handlers::get_profile::<R, M>).put(handlers::update_profile::<R, M>),
        )
        .route("/activate", post(handlers::activate::<R, M>))
        .route("/password/reset", post(handlers::reset_password::<R, M>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth::<R, M>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/login", post(handlers::login::<R, M>))
        .route("/password/forgot", post(handlers::forgot_password::<R, M>))
        .merge(protected)
        .with_state(state)
}
