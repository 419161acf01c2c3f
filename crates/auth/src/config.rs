//! Authentication configuration

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    pub fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            token_ttl_secs: Self::DEFAULT_TTL_SECS,
        }
    }

    /// 24 hours
    pub const DEFAULT_TTL_SECS: u64 = 60 * 60 * 24;
}
