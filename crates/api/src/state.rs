use std::sync::Arc;

use incidentdesk_identity::IdentityProvider;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and every other member are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: incidentdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Client for the external identity provider.
    pub identity: Arc<dyn IdentityProvider>,
}
