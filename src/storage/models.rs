use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role granted to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// When the account was created
    pub created_at: DateTime<Utc>,
    /// Unique, stored exactly as registered
    pub email: String,
    /// Surrogate identifier, allocated by the store on insert
    pub id: u64,
    pub name: String,
    /// Argon2 PHC string; the plaintext password is never stored
    pub password_hash: String,
    pub role: Role,
}

/// An account that has not been persisted yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

/// An issued session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// When the token was issued
    pub created_at: DateTime<Utc>,
    /// Set together with `revoked`; see [`Token::invalidate`]
    pub expired: bool,
    /// Surrogate identifier, allocated by the store on insert
    pub id: u64,
    pub revoked: bool,
    /// The signed bearer string (unique)
    pub token: String,
    /// Owning account
    pub user_id: u64,
}

impl Token {
    /// Neither revoked nor expired.
    pub fn is_active(&self) -> bool {
        !self.revoked && !self.expired
    }

    /// Mark the token permanently unusable. Both flags always move together.
    pub fn invalidate(&mut self) {
        self.revoked = true;
        self.expired = true;
    }
}
