mod admin;
mod auth;

use crate::api::response::ApiError;
use crate::auth::AuthError;

pub use admin::health;
pub use auth::{
    login, logout, me, register, verify, LoginRequest, LoginResponse, PrincipalResponse,
    RegisterRequest, UserResponse, VerifyTokenResponse,
};

/// Run password hashing and storage work off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("Blocking task failed: {e}")))?
        .map_err(ApiError::from)
}
