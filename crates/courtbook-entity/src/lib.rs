//! # courtbook-entity
//!
//! Domain entities for Courtbook: user records and refresh-token records,
//! plus the token fingerprint helper shared by every store implementation.

pub mod token;
pub mod user;

pub use token::RefreshTokenRecord;
pub use user::{NewUser, User};
