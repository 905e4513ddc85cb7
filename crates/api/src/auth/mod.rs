//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing for the local user record.
//! - [`bridge`] -- Register and login flows reconciling local users with the
//!   external identity provider.

pub mod bridge;
pub mod password;
