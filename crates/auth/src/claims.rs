//! JWT claims types

use serde::{Deserialize, Serialize};

/// Claims carried by Lingua bearer tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Username at issuance time
    pub username: String,
    /// Issued at
    pub iat: u64,
    /// Expires at
    pub exp: u64,
}
