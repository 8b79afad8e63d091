use thiserror::Error;

use crate::storage::DatabaseError;
use crate::tokens::SignerError;

/// Failure kinds of the session manager, translated to HTTP once at the API boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Bad credentials")]
    BadCredentials,
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),
    /// Internal fault. The detail is for logs only and never sent to clients.
    #[error("Internal error: {0}")]
    Internal(String),
    /// Malformed email at registration, or no account for the email at login.
    #[error("Invalid email: {}", .0.as_deref().unwrap_or("<missing>"))]
    InvalidEmail(Option<String>),
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("{0}")]
    Validation(String),
}

impl From<DatabaseError> for AuthError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::DuplicateEmail(email) => AuthError::EmailAlreadyExists(email),
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl From<SignerError> for AuthError {
    fn from(e: SignerError) -> Self {
        match e {
            SignerError::Expired | SignerError::Invalid(_) => AuthError::InvalidToken,
            SignerError::Signing(_) | SignerError::WeakKey => AuthError::Internal(e.to_string()),
        }
    }
}
