//! Client side of the external identity provider.
//!
//! The provider is the source of truth for credentials and session tokens.
//! [`IdentityProvider`] is the contract the rest of the service depends on;
//! [`hosted::HostedIdentityClient`] talks to the real hosted auth API over
//! HTTP and [`memory::InMemoryIdentityProvider`] keeps accounts in process
//! for tests and local development.

pub mod hosted;
pub mod memory;
pub mod provider;

pub use hosted::HostedIdentityClient;
pub use memory::InMemoryIdentityProvider;
pub use provider::{
    AuthOutcome, IdentityError, IdentityProvider, ProviderUser, Session, SignUpMetadata,
};
