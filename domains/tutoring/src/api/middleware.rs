//! Tutoring domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use lingua_auth::AuthBackend;

use crate::domain::service::TutorService;
use crate::repository::{PgTurnStore, TutoringRepositories};

/// Application state for the Tutoring domain
#[derive(Clone)]
pub struct TutoringState {
    pub repos: TutoringRepositories,
    pub auth: AuthBackend,
    pub tutor: Arc<TutorService<PgTurnStore>>,
}

impl FromRef<TutoringState> for AuthBackend {
    fn from_ref(state: &TutoringState) -> Self {
        state.auth.clone()
    }
}
