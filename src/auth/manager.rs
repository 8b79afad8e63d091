use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::password::PasswordHasher;
use super::validation::{validate_email, validate_name, validate_password};
use super::AuthError;
use crate::storage::models::{NewUser, Role, User};
use crate::storage::{CredentialStore, TokenStore};
use crate::tokens::{strip_scheme, TokenSigner, TOKEN_TYPE};

/// Public view of an account. Never carries the password or its hash.
#[derive(Debug, Clone, PartialEq)]
pub struct UserView {
    pub email: String,
    pub id: u64,
    pub name: String,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            id: user.id,
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub expires_in: u64,
    pub token: String,
    pub token_type: &'static str,
    pub user: UserView,
}

/// A token that passed signature, expiry and revocation checks
#[derive(Debug, Clone)]
pub struct ValidatedSession {
    pub expires_at: DateTime<Utc>,
    pub subject: String,
    pub token_id: u64,
    pub user_id: u64,
}

/// Owns the account and session lifecycle.
///
/// Invariant: each user has at most one token with `revoked == false` and
/// `expired == false`. Login enforces it through
/// [`TokenStore::rotate_user_token`], which revokes and issues in one
/// transaction.
pub struct SessionManager {
    credentials: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    signer: Arc<dyn TokenSigner>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionManager {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<dyn TokenStore>,
        hasher: Arc<dyn PasswordHasher>,
        signer: Arc<dyn TokenSigner>,
    ) -> Self {
        Self {
            credentials,
            hasher,
            signer,
            tokens,
        }
    }

    /// Create an account with the default role.
    pub fn register(
        &self,
        name: &str,
        email: Option<&str>,
        password: &str,
    ) -> Result<UserView, AuthError> {
        validate_name(name)?;
        validate_password(password)?;
        let email = validate_email(email)?;

        if self.credentials.exists_email(email)? {
            return Err(AuthError::EmailAlreadyExists(email.to_string()));
        }

        let password_hash = self
            .hasher
            .hash(password)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // The store re-checks uniqueness atomically; a lost race surfaces
        // as EmailAlreadyExists through the DatabaseError conversion.
        let user = self.credentials.save_user(NewUser {
            email: email.to_string(),
            name: name.to_string(),
            password_hash,
            role: Role::default(),
        })?;

        tracing::info!(user_id = user.id, "Registered user");
        Ok(UserView::from(&user))
    }

    /// Verify credentials, revoke the user's valid tokens and issue a new one.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        // Unknown accounts report InvalidEmail, a wrong password reports BadCredentials
        let user = self
            .credentials
            .find_user_by_email(email)?
            .ok_or_else(|| AuthError::InvalidEmail(Some(email.to_string())))?;

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !matches {
            tracing::debug!(user_id = user.id, "Rejected login: bad credentials");
            return Err(AuthError::BadCredentials);
        }

        let token = self.signer.sign(&user.email)?;
        let rotation = self.tokens.rotate_user_token(user.id, &token)?;

        tracing::info!(
            user_id = user.id,
            token_id = rotation.issued.id,
            revoked = rotation.revoked_ids.len(),
            "Issued session token"
        );

        Ok(LoginOutcome {
            expires_in: self.signer.expiration_seconds(),
            token,
            token_type: TOKEN_TYPE,
            user: UserView::from(&user),
        })
    }

    /// Revoke the token named in a raw `Authorization` value.
    ///
    /// Existence-based: a known token that is already revoked succeeds again.
    /// Signature and expiry are not checked here.
    pub fn logout(&self, raw_authorization: &str) -> Result<(), AuthError> {
        let token = strip_scheme(raw_authorization);
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let revoked = self
            .tokens
            .revoke_token(token)?
            .ok_or(AuthError::InvalidToken)?;

        tracing::info!(
            user_id = revoked.user_id,
            token_id = revoked.id,
            "Revoked session token"
        );
        Ok(())
    }

    /// Full check of a presented token: signature, expiry and store state.
    pub fn validate(&self, raw_authorization: &str) -> Result<ValidatedSession, AuthError> {
        let token = strip_scheme(raw_authorization);
        let verified = self.signer.verify(token)?;

        let record = self
            .tokens
            .find_token(token)?
            .filter(|t| t.is_active())
            .ok_or(AuthError::InvalidToken)?;

        Ok(ValidatedSession {
            expires_at: verified.expires_at,
            subject: verified.subject,
            token_id: record.id,
            user_id: record.user_id,
        })
    }
}
