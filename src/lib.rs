//! storefront-auth - account registration and bearer session lifecycle
//!
//! This crate provides:
//! - Registration with Argon2id password hashing
//! - Login that revokes the previous session and issues a signed HS256 token
//! - Logout by revocation, keeping every issued token as an audit record
//! - A bearer verifier for the edge of downstream services
//! - redb embedded database (ACID, serialized writers)
//! - REST API

pub mod api;
pub mod auth;
pub mod config;
pub mod storage;
#[cfg(test)]
pub mod testutil;
pub mod tokens;

use std::sync::Arc;

use auth::{Argon2Hasher, EdgeVerifier, PasswordHasher, SessionManager};
use config::Config;
use storage::Database;
use tokens::{JwtSigner, SignerError, TokenSigner};

/// Shared application state
pub struct AppState {
    pub edge: EdgeVerifier,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Wire the session manager and edge verifier over one database.
    pub fn new(config: Config, db: Database) -> Result<Self, SignerError> {
        Self::with_hasher(config, db, Arc::new(Argon2Hasher::new()))
    }

    pub fn with_hasher(
        config: Config,
        db: Database,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Result<Self, SignerError> {
        let signer: Arc<dyn TokenSigner> = Arc::new(JwtSigner::from_config(&config.jwt)?);
        let store = Arc::new(db);

        let sessions = SessionManager::new(
            store.clone(),
            store.clone(),
            hasher,
            Arc::clone(&signer),
        );

        let edge = if config.edge.check_revocation {
            EdgeVerifier::stateful(signer, store)
        } else {
            EdgeVerifier::stateless(signer)
        };

        Ok(Self {
            edge,
            sessions: Arc::new(sessions),
        })
    }
}
