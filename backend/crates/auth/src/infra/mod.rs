//! Infrastructure Layer
//!
//! User store implementations and the mail stand-in.

pub mod log_mailer;
pub mod memory;
pub mod postgres;

pub use log_mailer::LogMailer;
pub use memory::InMemoryUserRepository;
pub use postgres::PgUserRepository;
