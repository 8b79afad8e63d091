pub mod db;
pub mod models;
mod tables;
mod tokens;
mod users;

pub use db::{Database, DatabaseError};
pub use tables::*;
pub use tokens::Rotation;

use models::{NewUser, Token, User};

/// Persistence of account identities and password hashes.
pub trait CredentialStore: Send + Sync {
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    fn find_user_by_id(&self, id: u64) -> Result<Option<User>, DatabaseError>;

    fn exists_email(&self, email: &str) -> Result<bool, DatabaseError>;

    /// Persist a new user. Must fail with [`DatabaseError::DuplicateEmail`]
    /// when the email is already taken, even under concurrent inserts.
    fn save_user(&self, user: NewUser) -> Result<User, DatabaseError>;
}

/// Persistence of issued tokens and their revocation state.
pub trait TokenStore: Send + Sync {
    fn find_token(&self, token: &str) -> Result<Option<Token>, DatabaseError>;

    fn find_valid_tokens_for_user(&self, user_id: u64) -> Result<Vec<Token>, DatabaseError>;

    /// Overwrite an existing token record.
    fn save_token(&self, token: &Token) -> Result<(), DatabaseError> {
        self.save_tokens(std::slice::from_ref(token))
    }

    fn save_tokens(&self, tokens: &[Token]) -> Result<(), DatabaseError>;

    /// Atomically invalidate all of the user's valid tokens and issue `token`.
    fn rotate_user_token(&self, user_id: u64, token: &str) -> Result<Rotation, DatabaseError>;

    /// Invalidate a single token. `None` when the token string is unknown.
    fn revoke_token(&self, token: &str) -> Result<Option<Token>, DatabaseError>;
}

impl CredentialStore for Database {
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.get_user_by_email(email)
    }

    fn find_user_by_id(&self, id: u64) -> Result<Option<User>, DatabaseError> {
        self.get_user(id)
    }

    fn exists_email(&self, email: &str) -> Result<bool, DatabaseError> {
        self.email_exists(email)
    }

    fn save_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        self.insert_user(user)
    }
}

impl TokenStore for Database {
    fn find_token(&self, token: &str) -> Result<Option<Token>, DatabaseError> {
        self.get_token(token)
    }

    fn find_valid_tokens_for_user(&self, user_id: u64) -> Result<Vec<Token>, DatabaseError> {
        self.get_active_tokens_by_user(user_id)
    }

    fn save_tokens(&self, tokens: &[Token]) -> Result<(), DatabaseError> {
        self.put_tokens(tokens)
    }

    fn rotate_user_token(&self, user_id: u64, token: &str) -> Result<Rotation, DatabaseError> {
        self.replace_active_tokens(user_id, token)
    }

    fn revoke_token(&self, token: &str) -> Result<Option<Token>, DatabaseError> {
        self.invalidate_token(token)
    }
}
