//! Integration tests for the Courtbook HTTP API.

mod auth_test;
mod helpers;
