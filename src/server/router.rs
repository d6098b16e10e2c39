//! HTTP router for login-gate
//!
//! This module defines the axum router and request handlers for the
//! authentication state machine: home, the gated secret view, register,
//! login, logout, and a health probe.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;
use url::Url;

use super::views;
use crate::auth::{self, redirect::safe_redirect_target, AuthFlow};
use crate::database::CredentialStore;
use crate::error::AuthError;
use crate::models::{Identity, UserView};

/// Shared application state
pub struct AppState<S: CredentialStore> {
    /// Registration and credential-verification service
    pub auth: Arc<AuthFlow<S>>,

    /// Credential store
    pub store: Arc<S>,
}

impl<S: CredentialStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            auth: Arc::clone(&self.auth),
            store: Arc::clone(&self.store),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Optional `next` redirect target, carried in the query string
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Registration form fields
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Build the main application router
pub fn build_router<S: CredentialStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(home_handler::<S>))
        .route("/secret", get(secret_handler::<S>))
        .route(
            "/register",
            get(register_form_handler::<S>).post(register_handler::<S>),
        )
        .route(
            "/login",
            get(login_form_handler::<S>).post(login_handler::<S>),
        )
        .route("/logout", get(logout_handler::<S>))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// HTTP mapping for errors that escape a handler
///
/// Every body here is fixed text: no internal detail, no echoed input, and
/// no distinction between unknown-user and wrong-password.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AuthError::LoginFailed | AuthError::CorruptCredential => {
                (StatusCode::UNAUTHORIZED, views::login_failed())
            }
            AuthError::UnsafeRedirect => (
                StatusCode::BAD_REQUEST,
                "Unsafe redirect target".to_string(),
            ),
            AuthError::AlreadyAuthenticated => {
                (StatusCode::OK, views::already_logged_in())
            }
            AuthError::DuplicateIdentity => (
                StatusCode::CONFLICT,
                "Username or email already in use.".to_string(),
            ),
            AuthError::Validation { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Invalid form submission".to_string(),
            ),
            AuthError::Session(_) | AuthError::Store(_) | AuthError::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Html(body)).into_response()
    }
}

/// Access-control gate
///
/// Anonymous callers are redirected to the login view with the requested
/// path captured as `next`, enabling post-login return-to-origin.
fn gate(identity: &Identity, requested_path: &str) -> Result<UserView, Response> {
    match identity.user() {
        Some(user) => Ok(user.clone()),
        None => {
            let target = format!("/login?next={}", urlencoding::encode(requested_path));
            Err(Redirect::to(&target).into_response())
        }
    }
}

/// Reconstruct the request origin from the Host header
///
/// Needed only when a `next` target must be sanitized; a request without a
/// usable Host header cannot prove any target same-origin.
fn request_origin(headers: &HeaderMap) -> Result<Url, AuthError> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::UnsafeRedirect)?;
    Url::parse(&format!("http://{host}/")).map_err(|_| AuthError::UnsafeRedirect)
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn home_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    session: Session,
) -> Result<Response, AuthError> {
    let identity = auth::current_identity(&session, &*state.store).await?;
    let messages = auth::take_messages(&session).await?;
    Ok(Html(views::home(&identity, &messages)).into_response())
}

async fn secret_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    session: Session,
) -> Result<Response, AuthError> {
    let identity = auth::current_identity(&session, &*state.store).await?;
    let user = match gate(&identity, "/secret") {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };
    Ok(Html(views::secret(&user)).into_response())
}

async fn register_form_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    session: Session,
) -> Result<Response, AuthError> {
    let identity = auth::current_identity(&session, &*state.store).await?;
    if !identity.is_anonymous() {
        // An authenticated principal cannot re-register a session
        return Ok(Redirect::to("/").into_response());
    }
    Ok(Html(views::register_form(None)).into_response())
}

async fn register_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AuthError> {
    let identity = auth::current_identity(&session, &*state.store).await?;
    if !identity.is_anonymous() {
        return Ok(Redirect::to("/").into_response());
    }

    match state
        .auth
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(AuthError::DuplicateIdentity) => Ok((
            StatusCode::CONFLICT,
            Html(views::register_form(Some(
                "Username or email already in use.",
            ))),
        )
            .into_response()),
        Err(AuthError::Validation { field }) => Ok((
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(views::register_form(Some(&format!("{field} is required")))),
        )
            .into_response()),
        Err(e) => Err(e),
    }
}

async fn login_form_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    session: Session,
    Query(query): Query<NextQuery>,
) -> Result<Response, AuthError> {
    let identity = auth::current_identity(&session, &*state.store).await?;
    if !identity.is_anonymous() {
        return Ok(Html(views::already_logged_in()).into_response());
    }
    Ok(Html(views::login_form(query.next.as_deref(), None)).into_response())
}

async fn login_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    session: Session,
    Query(query): Query<NextQuery>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> Result<Response, AuthError> {
    let identity = auth::current_identity(&session, &*state.store).await?;
    if !identity.is_anonymous() {
        // Short-circuit without touching the session
        return Ok(Html(views::already_logged_in()).into_response());
    }

    let user = match state
        .auth
        .verify_credentials(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::LoginFailed) | Err(AuthError::CorruptCredential) => {
            return Ok((
                StatusCode::UNAUTHORIZED,
                Html(views::login_failed()),
            )
                .into_response());
        }
        Err(AuthError::Validation { field }) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::login_form(
                    query.next.as_deref(),
                    Some(&format!("{field} is required")),
                )),
            )
                .into_response());
        }
        Err(e) => return Err(e),
    };

    auth::establish(&session, user.id).await?;
    auth::push_message(&session, "You were successfully logged in").await?;
    tracing::info!(username = %user.username, user_id = user.id, "login succeeded");

    // The next target is validated after the session is established; a
    // rejected target fails the request with 400 but the login stands.
    let next = query.next.as_deref().filter(|n| !n.is_empty());
    let target = match next {
        None => None,
        Some(_) => {
            let origin = request_origin(&headers)?;
            safe_redirect_target(next, &origin)?
        }
    };

    Ok(Redirect::to(target.unwrap_or("/")).into_response())
}

async fn logout_handler<S: CredentialStore + 'static>(
    State(state): State<AppState<S>>,
    session: Session,
) -> Result<Response, AuthError> {
    let identity = auth::current_identity(&session, &*state.store).await?;
    let user = match gate(&identity, "/logout") {
        Ok(user) => user,
        Err(redirect) => return Ok(redirect),
    };

    auth::terminate(&session).await?;
    tracing::info!(username = %user.username, user_id = user.id, "logout");
    Ok(Redirect::to("/").into_response())
}
