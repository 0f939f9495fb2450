pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use crate::models::Role;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::{AuthGate, RequireRole};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Payload for `POST /login`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Payload for `POST /register`. `role` defaults to `user` when omitted.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Returned by both register and login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    /// Signed bearer token, valid for 24 hours.
    pub token: String,
}
