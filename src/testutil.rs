//! Shared test helpers available to all `#[cfg(test)]` modules in the crate.

use std::sync::Arc;

use tempfile::TempDir;

use crate::auth::{Argon2Hasher, SessionManager};
use crate::config::{Config, EdgeConfig, JwtConfig, ServerConfig};
use crate::storage::models::{NewUser, Role};
use crate::storage::Database;
use crate::tokens::JwtSigner;
use crate::AppState;

pub const TEST_SECRET: &str = "test-secret-key-for-unit-tests-only-0123456789";

/// Open a fresh database in a temporary directory.
///
/// Returns both the `Database` and the `TempDir` guard. The caller must
/// keep the `TempDir` alive for the duration of the test.
pub fn setup_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(temp_dir.path()).unwrap();
    (db, temp_dir)
}

/// A minimal `Config` suitable for unit tests (stateless edge, 1h tokens).
pub fn test_config() -> Config {
    Config {
        edge: EdgeConfig::default(),
        jwt: JwtConfig {
            expiration_seconds: 3600,
            secret: TEST_SECRET.to_string(),
        },
        server: ServerConfig {
            bind_address: "127.0.0.1:8080".to_string(),
            data_dir: "/tmp/test".to_string(),
        },
    }
}

pub fn test_signer() -> JwtSigner {
    JwtSigner::new(TEST_SECRET, 3600).unwrap()
}

/// Argon2id with minimal cost so tests stay fast.
pub fn fast_hasher() -> Argon2Hasher {
    Argon2Hasher::with_params(1024, 1, 1).unwrap()
}

/// A `SessionManager` wired to the given database.
pub fn test_manager(db: &Database) -> SessionManager {
    let store = Arc::new(db.clone());
    SessionManager::new(
        store.clone(),
        store,
        Arc::new(fast_hasher()),
        Arc::new(test_signer()),
    )
}

/// Build a full `Arc<AppState>` around the given database.
pub fn test_state(db: Database) -> Arc<AppState> {
    Arc::new(AppState::with_hasher(test_config(), db, Arc::new(fast_hasher())).unwrap())
}

/// A `NewUser` with a placeholder hash.
pub fn make_new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        name: "Test User".to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        role: Role::User,
    }
}
