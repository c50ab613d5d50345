//! Session lifecycle: register, login, refresh, logout, purge.

pub mod purge;
pub mod service;

pub use purge::TokenPurge;
pub use service::{AccessGrant, AuthSession, NewRegistration, SessionService};
