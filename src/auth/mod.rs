//! Authentication core for login-gate
//!
//! This module provides the credential-verification and session machinery:
//! - Password hashing and verification (Argon2id)
//! - Redirect target sanitization (open-redirect prevention)
//! - Session identity lifecycle
//! - Request-level orchestration of register/login/logout

pub mod password;
pub mod redirect;
pub mod service;
pub mod session;

pub use password::{CredentialHasher, HashError};
pub use redirect::{is_safe_target, safe_redirect_target};
pub use service::AuthFlow;
pub use session::{current_identity, establish, push_message, take_messages, terminate};
