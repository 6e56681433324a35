//! User and role management domain service.
//!
//! The [`UserService`](domain::user::service::UserService) holds the business
//! rules: uniqueness checks at registration, default-role bootstrapping,
//! credential verification, password-change rules and admin derivation.
//! Persistence and credentials are reached through the traits in
//! [`domain::user::ports`]; `outbound` provides in-memory, PostgreSQL,
//! Argon2 and JWT implementations of them.

pub mod config;
pub mod domain;
pub mod outbound;

pub use domain::context;
pub use domain::user;
pub use outbound::credentials;
pub use outbound::repositories;
