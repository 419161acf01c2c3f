//! Catalog domain state and auth backend integration

use crate::CatalogRepositories;
use axum::extract::FromRef;
use lingua_auth::AuthBackend;

/// Application state for the Catalog domain
#[derive(Clone)]
pub struct CatalogState {
    pub repos: CatalogRepositories,
    pub auth: AuthBackend,
}

impl FromRef<CatalogState> for AuthBackend {
    fn from_ref(state: &CatalogState) -> Self {
        state.auth.clone()
    }
}
