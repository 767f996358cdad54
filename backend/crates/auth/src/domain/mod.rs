//! Domain Layer
//!
//! Contains entities, value objects, and the ports the application layer
//! depends on (user store, mail delivery).

pub mod entity;
pub mod mailer;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{AuthenticatedUser, Claims, NewUser, ProfileUpdate, User};
pub use mailer::Mailer;
pub use repository::UserRepository;
