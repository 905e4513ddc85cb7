//! Request guards.
//!
//! - [`auth::AuthUser`] -- Resolves a Bearer token through the identity provider.

pub mod auth;
