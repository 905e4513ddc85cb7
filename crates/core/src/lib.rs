//! Domain primitives shared by every incidentdesk crate.
//!
//! Nothing in here touches the database or the network.

pub mod error;
pub mod types;
pub mod validation;
