//! # courtbook-database
//!
//! Storage layer for Courtbook. Provides the PostgreSQL connection pool,
//! embedded migrations, and two implementations of the core store traits:
//! sqlx-backed repositories for production and deterministic in-memory
//! stores for the test suites.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::{MemoryRefreshTokenStore, MemoryUserStore};
pub use repositories::{PgRefreshTokenStore, PgUserStore};
