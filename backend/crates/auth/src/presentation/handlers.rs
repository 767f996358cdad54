//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    ActivateUseCase, LoginInput, LoginUseCase, PasswordResetUseCase, ProfileUseCase,
    RegisterInput, RegisterUseCase, UpdateProfileInput,
};
use crate::domain::entity::principal::AuthenticatedUser;
use crate::domain::mailer::Mailer;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::ClaimType;
use crate::presentation::dto::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ProfileResponse,
    RegisterRequest, ResetPasswordRequest, UpdateProfileRequest,
};

/// Shared state for auth handlers and the request gate
pub struct AuthAppState<R, M> {
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

impl<R, M> AuthAppState<R, M> {
    pub fn new(repo: R, mailer: M, config: AuthConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            mailer: Arc::new(mailer),
            config: Arc::new(config),
        }
    }
}

impl<R, M> Clone for AuthAppState<R, M> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

/// Unwrap a JSON body, answering malformed payloads with `BadRequest`
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Malformed request body");
        AppError::transport(ErrorKind::BadRequest).with_inner(rejection)
    })
}

// ============================================================================
// Public
// ============================================================================

/// POST /api/v1/user/register
pub async fn register<R, M>(
    State(state): State<AuthAppState<R, M>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse>)>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = json_body(payload)?;

    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );

    use_case
        .execute(RegisterInput {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            mobile: req.mobile,
            address: req.address,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("user registered")),
    ))
}

/// POST /api/v1/user/login
pub async fn login<R, M>(
    State(state): State<AuthAppState<R, M>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = json_body(payload)?;

    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(LoginResponse {
        token: output.token,
        first_name: output.user.first_name,
        last_name: output.user.last_name,
    }))
}

/// POST /api/v1/user/password/forgot
pub async fn forgot_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    let req = json_body(payload)?;

    let use_case = PasswordResetUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );
    use_case.request(&req.email).await?;

    Ok(Json(MessageResponse::new("password reset link sent")))
}

// ============================================================================
// Protected (behind `require_auth`)
// ============================================================================

/// GET /api/v1/user/profile
pub async fn get_profile<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthenticatedUser,
) -> AppResult<Json<ProfileResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    user.require(ClaimType::Normal)?;

    let profile = ProfileUseCase::new(state.repo.clone())
        .get(user.user_id)
        .await?;

    Ok(Json(profile.into()))
}

/// PUT /api/v1/user/profile
pub async fn update_profile<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthenticatedUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> AppResult<Json<ProfileResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    user.require(ClaimType::Normal)?;
    let req = json_body(payload)?;

    let profile = ProfileUseCase::new(state.repo.clone())
        .update(
            user.user_id,
            UpdateProfileInput {
                email: req.email,
                mobile: req.mobile,
                first_name: req.first_name,
                last_name: req.last_name,
                image_url: req.image_url,
                address: req.address,
            },
        )
        .await?;

    Ok(Json(profile.into()))
}

/// POST /api/v1/user/activate
pub async fn activate<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthenticatedUser,
) -> AppResult<Json<MessageResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    user.require(ClaimType::Activation)?;

    ActivateUseCase::new(state.repo.clone())
        .execute(user.user_id)
        .await?;

    Ok(Json(MessageResponse::new("account activated")))
}

/// POST /api/v1/user/password/reset
pub async fn reset_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    user: AuthenticatedUser,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    M: Mailer + Send + Sync + 'static,
{
    user.require(ClaimType::PasswordReset)?;
    let req = json_body(payload)?;

    let use_case = PasswordResetUseCase::new(
        state.repo.clone(),
        state.mailer.clone(),
        state.config.clone(),
    );
    use_case.reset(user.user_id, req.password).await?;

    Ok(Json(MessageResponse::new("password updated")))
}
