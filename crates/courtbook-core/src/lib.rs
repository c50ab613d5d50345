//! # courtbook-core
//!
//! Core crate for Courtbook. Contains configuration schemas, the unified
//! error system, and the capability traits implemented by the database
//! crate.
//!
//! This crate has **no** internal dependencies except `courtbook-entity`.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
