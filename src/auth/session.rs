//! Session identity lifecycle
//!
//! A session is the per-connection record of which identity, if any, is
//! currently authenticated. It lives in a signed `tower-sessions` cookie
//! session and holds nothing but the authenticated user's id plus any
//! pending one-shot messages; the full user view is re-resolved against the
//! credential store on every request, so there is no implicit global and no
//! stale identity after logout.

use tower_sessions::Session;

use crate::database::CredentialStore;
use crate::error::AuthError;
use crate::models::{Identity, UserView};

/// Session key holding the authenticated user's id
const USER_ID_KEY: &str = "user_id";

/// Session key holding pending flash messages
const MESSAGES_KEY: &str = "messages";

fn session_err(err: tower_sessions::session::Error) -> AuthError {
    AuthError::Session(err.to_string())
}

/// Promote the session from Anonymous to Authenticated(user_id)
///
/// Fails with [`AuthError::AlreadyAuthenticated`] if a user is already bound
/// to this session. The session id is cycled on success so a pre-login
/// cookie cannot be fixed onto the authenticated session.
pub async fn establish(session: &Session, user_id: i64) -> Result<(), AuthError> {
    let existing: Option<i64> = session.get(USER_ID_KEY).await.map_err(session_err)?;
    if existing.is_some() {
        return Err(AuthError::AlreadyAuthenticated);
    }

    session
        .insert(USER_ID_KEY, user_id)
        .await
        .map_err(session_err)?;
    session.cycle_id().await.map_err(session_err)?;
    Ok(())
}

/// Revert the session to Anonymous
///
/// Deletes the session record entirely; a no-op on an anonymous session.
pub async fn terminate(session: &Session) -> Result<(), AuthError> {
    session.flush().await.map_err(session_err)
}

/// Resolve the session's current identity against the credential store
///
/// If the session carries a user id that the store no longer knows, the
/// session is invalid: it is reset and reported as Anonymous.
pub async fn current_identity<S>(session: &Session, store: &S) -> Result<Identity, AuthError>
where
    S: CredentialStore + ?Sized,
{
    let user_id: Option<i64> = session.get(USER_ID_KEY).await.map_err(session_err)?;
    let Some(user_id) = user_id else {
        return Ok(Identity::Anonymous);
    };

    match store.find_by_id(user_id).await? {
        Some(user) => Ok(Identity::Authenticated(UserView::from(&user))),
        None => {
            tracing::warn!(user_id, "session references a missing user, resetting");
            session.flush().await.map_err(session_err)?;
            Ok(Identity::Anonymous)
        }
    }
}

/// Queue a one-shot message for the next rendered page
pub async fn push_message(session: &Session, message: &str) -> Result<(), AuthError> {
    let mut messages: Vec<String> = session
        .get(MESSAGES_KEY)
        .await
        .map_err(session_err)?
        .unwrap_or_default();
    messages.push(message.to_string());
    session
        .insert(MESSAGES_KEY, messages)
        .await
        .map_err(session_err)
}

/// Drain queued one-shot messages
pub async fn take_messages(session: &Session) -> Result<Vec<String>, AuthError> {
    Ok(session
        .remove::<Vec<String>>(MESSAGES_KEY)
        .await
        .map_err(session_err)?
        .unwrap_or_default())
}
