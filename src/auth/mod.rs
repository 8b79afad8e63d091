pub mod edge;
mod error;
pub mod manager;
pub mod password;
pub mod validation;

pub use edge::{EdgeRejection, EdgeVerifier, Principal};
pub use error::AuthError;
pub use manager::{LoginOutcome, SessionManager, UserView, ValidatedSession};
pub use password::{Argon2Hasher, HashError, PasswordHasher};
