//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use login_gate::auth::{AuthFlow, CredentialHasher};
use login_gate::config::AuthConfig;
use login_gate::database::{CredentialStore, SqliteStore};
use login_gate::models::NewUser;
use login_gate::server::{build_router, session_layer, AppState};

/// Auth configuration with low hash cost so the suite stays fast
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        hash_memory_kib: 8,
        hash_iterations: 1,
        hash_parallelism: 1,
        ..AuthConfig::default()
    }
}

/// Create a low-cost hasher matching [`test_auth_config`]
pub fn test_hasher() -> CredentialHasher {
    CredentialHasher::new(&test_auth_config()).expect("Failed to build test hasher")
}

/// Create an in-memory credential store
pub async fn create_test_store() -> Arc<SqliteStore> {
    Arc::new(
        SqliteStore::in_memory()
            .await
            .expect("Failed to create test store"),
    )
}

/// Insert a user with a properly hashed password
pub async fn seed_user(store: &SqliteStore, username: &str, email: &str, password: &str) -> i64 {
    let hash = test_hasher().hash(password).expect("Failed to hash password");
    let user = store
        .insert_user(&NewUser::new(username, email, hash))
        .await
        .expect("Failed to seed user");
    user.id
}

/// Create a test application state over an in-memory store
pub async fn create_test_state() -> AppState<SqliteStore> {
    let store = create_test_store().await;
    let auth = Arc::new(AuthFlow::new(Arc::clone(&store), test_hasher()));
    AppState { auth, store }
}

/// Run a test server in the background and return its address
///
/// The server shuts down when the returned sender is used or dropped.
pub async fn run_test_server(
    state: AppState<SqliteStore>,
) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let sessions = session_layer(&test_auth_config()).expect("Failed to build session layer");
    let app = build_router(state).layer(sessions);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    // Give the server a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}

/// HTTP client with a cookie store and redirect following disabled
///
/// Redirects stay visible to assertions; the cookie store carries the
/// session across requests like a browser would.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build test client")
}

/// Location header of a redirect response
pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .expect("Missing Location header")
        .to_str()
        .expect("Invalid Location header")
        .to_string()
}
