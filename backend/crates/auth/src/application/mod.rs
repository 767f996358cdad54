//! Application Layer
//!
//! Use cases and application services.

pub mod activate;
pub mod config;
mod find_user;
pub mod issue_token;
pub mod login;
mod mail_link;
pub mod password_reset;
pub mod profile;
pub mod register;
pub mod validate_token;

// Re-exports
pub use activate::ActivateUseCase;
pub use config::AuthConfig;
pub use issue_token::TokenIssuer;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use password_reset::PasswordResetUseCase;
pub use profile::{ProfileUseCase, UpdateProfileInput};
pub use register::{RegisterInput, RegisterUseCase};
pub use validate_token::TokenValidator;
