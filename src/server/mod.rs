//! HTTP server components for login-gate
//!
//! This module provides the HTTP server infrastructure including:
//! - Router configuration and route handlers
//! - Session middleware construction
//! - Server lifecycle management

pub mod router;
pub mod views;

pub use router::{build_router, AppState, HealthResponse};

use std::future::Future;
use std::net::SocketAddr;

use time::Duration;
use tokio::net::TcpListener;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::{AuthConfig, ServerConfig};
use crate::database::CredentialStore;

/// Build the signed-cookie session middleware
///
/// Sessions live in an in-memory store scoped to this process; the cookie
/// carries only a signed session id. The signing key comes from
/// `auth.secret_key` and must be at least 64 bytes (validated again here
/// because the key type enforces it).
pub fn session_layer(
    config: &AuthConfig,
) -> Result<SessionManagerLayer<MemoryStore, SignedCookie>, ServerError> {
    let key = Key::try_from(config.secret_key.as_bytes())
        .map_err(|e| ServerError::Config(format!("Invalid session signing key: {}", e)))?;

    Ok(SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            config.session_ttl_secs as i64,
        )))
        .with_signed(key))
}

/// HTTP server for login-gate
///
/// Manages the axum server lifecycle, including:
/// - Binding to the configured address
/// - Applying middleware layers
/// - Graceful shutdown handling
pub struct Server<S: CredentialStore + 'static> {
    config: ServerConfig,
    state: AppState<S>,
    sessions: SessionManagerLayer<MemoryStore, SignedCookie>,
}

impl<S: CredentialStore + 'static> Server<S> {
    /// Create a new server instance
    pub fn new(
        config: ServerConfig,
        state: AppState<S>,
        sessions: SessionManagerLayer<MemoryStore, SignedCookie>,
    ) -> Self {
        Self {
            config,
            state,
            sessions,
        }
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.config.host.parse().unwrap_or([127, 0, 0, 1].into()),
            self.config.port,
        )
    }

    /// Run the server until the shutdown future resolves
    pub async fn run(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let addr = self.bind_addr();

        let app = build_router(self.state)
            .layer(self.sessions)
            .layer(tower_http::trace::TraceLayer::new_for_http());

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(e.to_string()))?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Serve(e.to_string()))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to address
    #[error("Failed to bind to address: {0}")]
    Bind(String),

    /// Failed to serve requests
    #[error("Server error: {0}")]
    Serve(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthFlow, CredentialHasher};
    use crate::database::MockCredentialStore;
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    fn create_test_state() -> AppState<MockCredentialStore> {
        let store = Arc::new(MockCredentialStore::new());
        let auth = Arc::new(AuthFlow::new(
            Arc::clone(&store),
            CredentialHasher::with_defaults(),
        ));
        AppState { auth, store }
    }

    // Test 1: server bind address calculation
    #[test]
    fn test_server_bind_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 9090,
        };
        let sessions = session_layer(&AuthConfig::default()).unwrap();
        let server = Server::new(config, create_test_state(), sessions);
        assert_eq!(server.bind_addr().to_string(), "127.0.0.1:9090");
    }

    // Test 2: a short signing key is refused
    #[test]
    fn test_session_layer_rejects_short_key() {
        let config = AuthConfig {
            secret_key: "short".to_string(),
            ..AuthConfig::default()
        };
        assert!(matches!(
            session_layer(&config),
            Err(ServerError::Config(_))
        ));
    }

    // Test 3: server starts and shuts down gracefully
    #[tokio::test]
    async fn test_server_graceful_shutdown() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Let the OS assign a port
        };
        let sessions = session_layer(&AuthConfig::default()).unwrap();
        let server = Server::new(config, create_test_state(), sessions);

        let shutdown = async {
            tokio::time::sleep(StdDuration::from_millis(100)).await;
        };

        let handle = tokio::spawn(async move { server.run(shutdown).await });
        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }

    // Test 4: ServerError display messages
    #[test]
    fn test_server_error_display() {
        assert_eq!(
            ServerError::Bind("address in use".to_string()).to_string(),
            "Failed to bind to address: address in use"
        );
        assert_eq!(
            ServerError::Serve("connection reset".to_string()).to_string(),
            "Server error: connection reset"
        );
    }
}
