use crate::api::middleware::error::{ApiError, ApiResult};

/// Verify an admin credential against the configured bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|_| ApiError::Internal("Invalid admin password hash format".to_string()))
}

/// Hash a password for ADMIN_PASSWORD_HASH provisioning.
pub fn hash_password(password: &str) -> ApiResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}

/// Generate secure random token for sessions (32 bytes = 64 hex characters)
pub fn generate_session_token() -> String {
    use rand::Rng;
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}
