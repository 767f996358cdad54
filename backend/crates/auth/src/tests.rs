//! Crate-level tests for the auth crate
//! Token issuance/validation against the in-memory store, and the HTTP
//! surface driven through the router.

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use chrono::Utc;
    use kernel::error::app_error::AppResult;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::user::{NewUser, User};
    use crate::domain::mailer::Mailer;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{Email, RawPassword, UserId, UserPassword, UserRole};
    use crate::infra::memory::InMemoryUserRepository;

    pub const SECRET: &str = "auth-crate-test-secret";
    pub const PASSWORD: &str = "Correct#Horse7";

    pub fn config() -> AuthConfig {
        AuthConfig::with_secret(SECRET)
    }

    pub fn user(id: i64, email: &str, active: bool) -> User {
        let raw = RawPassword::for_comparison(PASSWORD.to_string());
        NewUser {
            email: Email::new(email).unwrap(),
            mobile: format!("07{id:08}"),
            password: UserPassword::from_raw(&raw, None).unwrap(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            image_url: String::new(),
            address: "London".to_string(),
            role: UserRole::User,
            active,
        }
        .into_user(UserId::new(id), Utc::now())
    }

    pub async fn seeded_repo(id: i64, active: bool) -> InMemoryUserRepository {
        let repo = InMemoryUserRepository::new();
        repo.insert(user(id, &format!("user{id}@example.com"), active))
            .await;
        repo
    }

    /// Mailer that keeps every link it was asked to send
    #[derive(Clone, Default)]
    pub struct RecordingMailer {
        pub sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    impl RecordingMailer {
        pub fn last_token(&self) -> String {
            let sent = self.sent.lock().unwrap();
            let (_, link) = sent.last().expect("no mail sent");
            link.split("token=").nth(1).unwrap().to_string()
        }

        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl Mailer for RecordingMailer {
        async fn send_welcome_mail(&self, to: &Email, activation_link: &str) -> AppResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), activation_link.to_string()));
            Ok(())
        }

        async fn send_password_reset_link(&self, to: &Email, reset_link: &str) -> AppResult<()> {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), reset_link.to_string()));
            Ok(())
        }
    }

    /// Store whose every call takes `delay` before delegating
    #[derive(Clone)]
    pub struct SlowRepository {
        pub inner: InMemoryUserRepository,
        pub delay: Duration,
    }

    impl UserRepository for SlowRepository {
        async fn create(&self, user: NewUser) -> AppResult<User> {
            tokio::time::sleep(self.delay).await;
            self.inner.create(user).await
        }

        async fn find_by_id(&self, id: UserId) -> AppResult<User> {
            tokio::time::sleep(self.delay).await;
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, email: &Email) -> AppResult<User> {
            tokio::time::sleep(self.delay).await;
            self.inner.find_by_email(email).await
        }

        async fn update(&self, user: &User) -> AppResult<User> {
            tokio::time::sleep(self.delay).await;
            self.inner.update(user).await
        }
    }
}

#[cfg(test)]
mod token_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::Utc;
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    use kernel::error::{app_error::AppError, kind::ErrorKind};

    use super::support::*;
    use crate::application::config::AuthConfig;
    use crate::application::issue_token::TokenIssuer;
    use crate::application::validate_token::TokenValidator;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{ClaimType, UserId, UserRole};
    use crate::infra::memory::InMemoryUserRepository;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(Arc::new(config()))
    }

    fn validator(repo: &InMemoryUserRepository) -> TokenValidator<InMemoryUserRepository> {
        TokenValidator::new(Arc::new(repo.clone()), Arc::new(config()))
    }

    #[tokio::test]
    async fn test_round_trip_every_claim_type() {
        let repo = seeded_repo(42, true).await;
        let subject = repo.find_by_id(UserId::new(42)).await.unwrap();

        for claim_type in [
            ClaimType::Normal,
            ClaimType::Activation,
            ClaimType::PasswordReset,
        ] {
            let token = issuer().issue(&subject, claim_type).unwrap();
            let claims = validator(&repo)
                .parse_token_with_claims(&token)
                .await
                .unwrap();

            assert_eq!(claims.user_id, UserId::new(42));
            assert_eq!(claims.role, UserRole::User);
            assert_eq!(claims.claim_type, claim_type);
            assert_eq!(claims.first_name, "Ada");
        }
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid() {
        let repo = seeded_repo(42, true).await;
        let subject = repo.find_by_id(UserId::new(42)).await.unwrap();

        let long_ago = Utc::now() - chrono::Duration::days(366);
        let token = issuer()
            .issue_at(&subject, ClaimType::Normal, long_ago)
            .unwrap();
        let err = validator(&repo)
            .parse_token_with_claims(&token)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidToken));

        let yesterday = Utc::now() - chrono::Duration::hours(25);
        let token = issuer()
            .issue_at(&subject, ClaimType::Activation, yesterday)
            .unwrap();
        let err = validator(&repo)
            .parse_token_with_claims(&token)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidToken));
    }

    #[tokio::test]
    async fn test_wrong_key_is_invalid() {
        let repo = seeded_repo(42, true).await;
        let subject = repo.find_by_id(UserId::new(42)).await.unwrap();

        let other = TokenIssuer::new(Arc::new(AuthConfig::with_secret("some-other-secret")));
        let token = other.issue(&subject, ClaimType::Normal).unwrap();

        let err = validator(&repo)
            .parse_token_with_claims(&token)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InvalidToken));
    }

    #[tokio::test]
    async fn test_other_algorithms_are_rejected() {
        let repo = seeded_repo(42, true).await;
        let subject = repo.find_by_id(UserId::new(42)).await.unwrap();
        let token = issuer().issue(&subject, ClaimType::Normal).unwrap();
        let claims = validator(&repo).decode(&token).unwrap();

        // Same secret, different HMAC variant
        let hs384 = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = validator(&repo).decode(&hs384).unwrap_err();
        assert!(err.is(ErrorKind::InvalidToken));

        // Unsigned token
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap());
        let unsigned = format!("{header}.{payload}.");
        let err = validator(&repo).decode(&unsigned).unwrap_err();
        assert!(err.is(ErrorKind::InvalidToken));
    }

    #[tokio::test]
    async fn test_garbage_is_invalid() {
        let repo = seeded_repo(42, true).await;
        for token in ["", "not-a-token", "a.b.c"] {
            let err = validator(&repo)
                .parse_token_with_claims(token)
                .await
                .unwrap_err();
            assert!(err.is(ErrorKind::InvalidToken), "{token:?}");
        }
    }

    #[tokio::test]
    async fn test_deactivated_account_is_rejected() {
        let repo = seeded_repo(42, true).await;
        let mut subject = repo.find_by_id(UserId::new(42)).await.unwrap();
        let token = issuer().issue(&subject, ClaimType::Normal).unwrap();

        subject.active = false;
        repo.update(&subject).await.unwrap();

        let err = validator(&repo)
            .parse_token_with_claims(&token)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::UserNotActive));
    }

    #[tokio::test]
    async fn test_deleted_account_is_rejected() {
        let repo = seeded_repo(42, true).await;
        let subject = repo.find_by_id(UserId::new(42)).await.unwrap();
        let token = issuer().issue(&subject, ClaimType::Normal).unwrap();

        repo.remove(UserId::new(42)).await;

        let err = validator(&repo)
            .parse_token_with_claims(&token)
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::UserNotFound));
        assert!(err.is_same_kind(&AppError::repo(ErrorKind::UserNotFound)));
    }

    #[tokio::test]
    async fn test_principal_uses_live_account() {
        let repo = seeded_repo(42, true).await;
        let mut subject = repo.find_by_id(UserId::new(42)).await.unwrap();
        let token = issuer().issue(&subject, ClaimType::Normal).unwrap();

        subject.role = UserRole::Admin;
        subject.first_name = "Augusta".to_string();
        repo.update(&subject).await.unwrap();

        let principal = validator(&repo).authenticate(&token, None).await.unwrap();
        assert_eq!(principal.user_id, UserId::new(42));
        assert_eq!(principal.role, UserRole::Admin);
        assert_eq!(principal.first_name, "Augusta");
        assert_eq!(principal.claim_type, ClaimType::Normal);

        let claims = validator(&repo).decode(&token).unwrap();
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(principal.expires_at, claims.expires_at());
    }

    #[tokio::test]
    async fn test_lookup_respects_deadline() {
        let inner = seeded_repo(42, true).await;
        let subject = inner.find_by_id(UserId::new(42)).await.unwrap();
        let token = issuer().issue(&subject, ClaimType::Normal).unwrap();

        let slow = SlowRepository {
            inner,
            delay: Duration::from_millis(500),
        };
        let validator = TokenValidator::new(Arc::new(slow), Arc::new(config()));

        let deadline = tokio::time::Instant::now() + Duration::from_millis(20);
        let err = validator
            .authenticate(&token, Some(deadline))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::InternalService));
    }

    #[tokio::test]
    async fn test_empty_secret_refuses_to_verify() {
        let repo = seeded_repo(42, true).await;
        let subject = repo.find_by_id(UserId::new(42)).await.unwrap();
        let token = issuer().issue(&subject, ClaimType::Normal).unwrap();

        let validator = TokenValidator::new(Arc::new(repo), Arc::new(AuthConfig::with_secret("")));
        let err = validator.parse_token_with_claims(&token).await.unwrap_err();
        assert!(err.is(ErrorKind::InternalService));
    }

    #[test]
    fn test_same_kind_ignores_inner() {
        let db_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "db timeout");
        let not_found = AppError::service(ErrorKind::UserNotFound);

        assert!(not_found.is_same_kind(&not_found.clone_with_inner(db_err)));
        assert!(!not_found.is_same_kind(&AppError::service(ErrorKind::InternalService)));
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::routing::get;
    use axum::{Router, middleware};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::issue_token::TokenIssuer;
    use crate::domain::entity::principal::AuthenticatedUser;
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{ClaimType, UserId};
    use crate::infra::memory::InMemoryUserRepository;
    use crate::presentation::handlers::AuthAppState;
    use crate::presentation::middleware::{RequestDeadline, request_deadline, require_auth};
    use crate::presentation::router::auth_router_generic;

    fn app(repo: &InMemoryUserRepository, mailer: &RecordingMailer) -> Router {
        auth_router_generic(repo.clone(), mailer.clone(), config())
    }

    async fn token_for(repo: &InMemoryUserRepository, id: i64, claim_type: ClaimType) -> String {
        let subject = repo.find_by_id(UserId::new(id)).await.unwrap();
        TokenIssuer::new(Arc::new(config()))
            .issue(&subject, claim_type)
            .unwrap()
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Router exposing the gate's context directly
    fn whoami_app(repo: &InMemoryUserRepository) -> Router {
        let state = AuthAppState::new(repo.clone(), RecordingMailer::default(), config());
        Router::new()
            .route(
                "/whoami",
                get(|user: AuthenticatedUser| async move { user.user_id.value().to_string() }),
            )
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_auth::<InMemoryUserRepository, RecordingMailer>,
            ))
            .with_state(state)
    }

    // ------------------------------------------------------------------------
    // Gate
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_gate_attaches_authenticated_user() {
        let repo = seeded_repo(42, true).await;
        let token = token_for(&repo, 42, ClaimType::Normal).await;

        let response = whoami_app(&repo)
            .oneshot(request(Method::GET, "/whoami", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"42");
    }

    #[tokio::test]
    async fn test_gate_missing_header() {
        let repo = seeded_repo(42, true).await;
        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(Method::GET, "/profile", None, None),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "missing or malformed jwt");
        assert_eq!(body["error"], "[transport error: (missing or malformed jwt)]");
    }

    #[tokio::test]
    async fn test_gate_wrong_scheme() {
        let repo = seeded_repo(42, true).await;
        let token = token_for(&repo, 42, ClaimType::Normal).await;
        let req = Request::builder()
            .uri("/profile")
            .header(header::AUTHORIZATION, format!("Token {token}"))
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(app(&repo, &RecordingMailer::default()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "missing or malformed jwt");
    }

    #[tokio::test]
    async fn test_gate_invalid_token() {
        let repo = seeded_repo(42, true).await;
        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(Method::GET, "/profile", Some("abc.def.ghi"), None),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "invalid or expired jwt");
    }

    #[tokio::test]
    async fn test_gate_expired_token() {
        let repo = seeded_repo(42, true).await;
        let subject = repo.find_by_id(UserId::new(42)).await.unwrap();
        let token = TokenIssuer::new(Arc::new(config()))
            .issue_at(
                &subject,
                ClaimType::Normal,
                chrono::Utc::now() - chrono::Duration::days(400),
            )
            .unwrap();

        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(Method::GET, "/profile", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "invalid or expired jwt");
    }

    #[tokio::test]
    async fn test_gate_inactive_account() {
        let repo = seeded_repo(42, false).await;
        let token = token_for(&repo, 42, ClaimType::Normal).await;

        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(Method::GET, "/profile", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "user not active");
        assert_eq!(body["error"], "[transport error: (user not active)]");
    }

    #[tokio::test]
    async fn test_gate_unknown_account() {
        let repo = seeded_repo(42, true).await;
        let token = token_for(&repo, 42, ClaimType::Normal).await;
        repo.remove(UserId::new(42)).await;

        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(Method::GET, "/profile", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "user not found");
    }

    #[tokio::test]
    async fn test_activation_token_rejected_by_normal_endpoint() {
        let repo = seeded_repo(42, true).await;
        let token = token_for(&repo, 42, ClaimType::Activation).await;

        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(Method::GET, "/profile", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "invalid token type");
    }

    #[tokio::test]
    async fn test_normal_token_rejected_by_reset_endpoint() {
        let repo = seeded_repo(42, true).await;
        let token = token_for(&repo, 42, ClaimType::Normal).await;

        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(
                Method::POST,
                "/password/reset",
                Some(&token),
                Some(json!({ "password": "Brand#NewPass9" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "invalid token type");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_gated() {
        let repo = seeded_repo(42, true).await;
        let (status, _) = send(
            app(&repo, &RecordingMailer::default()),
            request(Method::GET, "/does-not-exist", None, None),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ------------------------------------------------------------------------
    // Account flows
    // ------------------------------------------------------------------------

    fn registration() -> Value {
        json!({
            "email": "Grace@Example.com",
            "password": "Compiler#1952",
            "first_name": "Grace",
            "last_name": "Hopper",
            "mobile": "0799999999",
            "address": "Arlington"
        })
    }

    #[tokio::test]
    async fn test_register_activate_login_profile() {
        let repo = InMemoryUserRepository::new();
        let mailer = RecordingMailer::default();

        let (status, body) = send(
            app(&repo, &mailer),
            request(Method::POST, "/register", None, Some(registration())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "user registered");
        assert_eq!(mailer.count(), 1);

        let (recipient, link) = mailer.sent.lock().unwrap()[0].clone();
        assert_eq!(recipient, "grace@example.com");
        assert!(link.starts_with("http://localhost:8080/api/v1/user/activate?token="));

        let activation = mailer.last_token();
        let (status, body) = send(
            app(&repo, &mailer),
            request(Method::POST, "/activate", Some(&activation), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "account activated");

        let (status, body) = send(
            app(&repo, &mailer),
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": "grace@example.com", "password": "Compiler#1952" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Grace");
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(
            app(&repo, &mailer),
            request(Method::GET, "/profile", Some(&token), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "grace@example.com");
        assert_eq!(body["mobile"], "0799999999");
        assert_eq!(body["address"], "Arlington");
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let repo = InMemoryUserRepository::new();
        let mailer = RecordingMailer::default();

        let (status, _) = send(
            app(&repo, &mailer),
            request(Method::POST, "/register", None, Some(registration())),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            app(&repo, &mailer),
            request(Method::POST, "/register", None, Some(registration())),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "user already exists");
        assert_eq!(body["error"], "[service error: (user already exists)]");
        assert_eq!(mailer.count(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password_and_bad_email() {
        let repo = InMemoryUserRepository::new();
        let mailer = RecordingMailer::default();

        let mut weak = registration();
        weak["password"] = json!("password123");
        let (status, body) = send(
            app(&repo, &mailer),
            request(Method::POST, "/register", None, Some(weak)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid password");

        let mut bad_email = registration();
        bad_email["email"] = json!("not-an-email");
        let (status, body) = send(
            app(&repo, &mailer),
            request(Method::POST, "/register", None, Some(bad_email)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request");

        assert!(repo.is_empty().await);
        assert_eq!(mailer.count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let repo = InMemoryUserRepository::new();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(app(&repo, &RecordingMailer::default()), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "bad request");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let repo = seeded_repo(7, true).await;
        let mailer = RecordingMailer::default();

        let (status, body) = send(
            app(&repo, &mailer),
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": "user7@example.com", "password": "Wrong#Horse7" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "wrong credentials");

        let (status, body) = send(
            app(&repo, &mailer),
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": "nobody@example.com", "password": PASSWORD })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "user not found");
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let repo = seeded_repo(7, false).await;
        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": "user7@example.com", "password": PASSWORD })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "user not active");
    }

    #[tokio::test]
    async fn test_update_profile() {
        let repo = seeded_repo(42, true).await;
        let mailer = RecordingMailer::default();
        let token = token_for(&repo, 42, ClaimType::Normal).await;

        let (status, body) = send(
            app(&repo, &mailer),
            request(
                Method::PUT,
                "/profile",
                Some(&token),
                Some(json!({ "first_name": " Augusta ", "image_url": "https://img/1.png" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Augusta");
        assert_eq!(body["last_name"], "Lovelace");
        assert_eq!(body["image_url"], "https://img/1.png");

        let stored = repo.find_by_id(UserId::new(42)).await.unwrap();
        assert_eq!(stored.first_name, "Augusta");
    }

    #[tokio::test]
    async fn test_update_profile_email_collision() {
        let repo = seeded_repo(42, true).await;
        repo.insert(user(43, "taken@example.com", true)).await;
        let token = token_for(&repo, 42, ClaimType::Normal).await;

        let (status, body) = send(
            app(&repo, &RecordingMailer::default()),
            request(
                Method::PUT,
                "/profile",
                Some(&token),
                Some(json!({ "email": "taken@example.com" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "user already exists");
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let repo = seeded_repo(42, true).await;
        let mailer = RecordingMailer::default();

        let (status, body) = send(
            app(&repo, &mailer),
            request(
                Method::POST,
                "/password/forgot",
                None,
                Some(json!({ "email": "user42@example.com" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "password reset link sent");
        let reset = mailer.last_token();

        // A reset token cannot activate an account
        let (status, _) = send(
            app(&repo, &mailer),
            request(Method::POST, "/activate", Some(&reset), None),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            app(&repo, &mailer),
            request(
                Method::POST,
                "/password/reset",
                Some(&reset),
                Some(json!({ "password": "Brand#NewPass9" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "password updated");

        let login = |password: &str| {
            request(
                Method::POST,
                "/login",
                None,
                Some(json!({ "email": "user42@example.com", "password": password })),
            )
        };
        let (status, _) = send(app(&repo, &mailer), login(PASSWORD)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        let (status, _) = send(app(&repo, &mailer), login("Brand#NewPass9")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forgot_password_unknown_email() {
        let repo = InMemoryUserRepository::new();
        let mailer = RecordingMailer::default();
        let (status, body) = send(
            app(&repo, &mailer),
            request(
                Method::POST,
                "/password/forgot",
                None,
                Some(json!({ "email": "ghost@example.com" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "user not found");
        assert_eq!(mailer.count(), 0);
    }

    // ------------------------------------------------------------------------
    // Request deadline
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_request_deadline_is_stamped() {
        let app = Router::new()
            .route(
                "/deadline",
                get(|axum::Extension(deadline): axum::Extension<RequestDeadline>| async move {
                    let left = deadline.0 - tokio::time::Instant::now();
                    (left <= Duration::from_secs(5)).to_string()
                }),
            )
            .layer(middleware::from_fn_with_state(
                Duration::from_secs(5),
                request_deadline,
            ));

        let response = app
            .oneshot(request(Method::GET, "/deadline", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"true");
    }

    #[tokio::test]
    async fn test_request_deadline_out_of_range_is_not_enforced() {
        let app = Router::new()
            .route(
                "/deadline",
                get(|req: axum::extract::Request| async move {
                    req.extensions().get::<RequestDeadline>().is_none().to_string()
                }),
            )
            .layer(middleware::from_fn_with_state(
                Duration::from_secs(u64::MAX),
                request_deadline,
            ));

        let response = app
            .oneshot(request(Method::GET, "/deadline", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"true");
    }

    #[tokio::test]
    async fn test_request_deadline_exceeded() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "done"
                }),
            )
            .layer(middleware::from_fn_with_state(
                Duration::from_millis(20),
                request_deadline,
            ));

        let (status, body) = send(app, request(Method::GET, "/slow", None, None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "internal service error");
    }

    #[tokio::test]
    async fn test_gate_lookup_bounded_by_request_deadline() {
        let inner = seeded_repo(42, true).await;
        let token = token_for(&inner, 42, ClaimType::Normal).await;
        let slow = SlowRepository {
            inner,
            delay: Duration::from_millis(500),
        };

        let state = AuthAppState::new(slow, RecordingMailer::default(), config());
        let app = Router::new()
            .route("/whoami", get(|user: AuthenticatedUser| async move { user.user_id.to_string() }))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_auth::<SlowRepository, RecordingMailer>,
            ))
            .with_state(state);

        let mut req = request(Method::GET, "/whoami", Some(&token), None);
        req.extensions_mut().insert(RequestDeadline(
            tokio::time::Instant::now() + Duration::from_millis(20),
        ));

        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "internal service error");
    }
}
