//! Lingua application composition root
//!
//! Composes the domain routers into a single application, wiring the
//! shared pool, the auth backend, and the generation provider.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use lingua_accounts::{AccountsRepositories, AccountsState};
use lingua_auth::{AuthBackend, AuthConfig};
use lingua_catalog::{CatalogRepositories, CatalogState};
use lingua_common::Config;
use lingua_llm::{GenerationService, LlmConfig, LlmServiceFactory};
use lingua_tutoring::{PgTurnStore, TutorService, TutoringRepositories, TutoringState};

/// Create the main application router with all routes and middleware
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    // Shared auth backend
    let auth = AuthBackend::new(pool.clone(), AuthConfig::new(config.jwt_secret.clone()));

    // Generation provider: credential and model are read once here and
    // injected; nothing else touches the environment
    let llm_config = LlmConfig::from_env()?;
    let llm: Arc<dyn GenerationService> = Arc::from(LlmServiceFactory::create(llm_config)?);

    // Accounts domain
    let accounts_state = AccountsState {
        repos: AccountsRepositories::new(pool.clone()),
        auth: auth.clone(),
    };

    // Catalog domain
    let catalog_state = CatalogState {
        repos: CatalogRepositories::new(pool.clone()),
        auth: auth.clone(),
    };

    // Tutoring domain
    let tutoring_repos = TutoringRepositories::new(pool);
    let tutor = Arc::new(TutorService::new(
        PgTurnStore::new(tutoring_repos.clone()),
        llm,
    ));
    let tutoring_state = TutoringState {
        repos: tutoring_repos,
        auth,
        tutor,
    };

    // Build router — compose domain routers with shared infrastructure routes
    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route("/", axum::routing::get(|| async { "Lingua API v0.1.0" }))
        .merge(lingua_accounts::routes().with_state(accounts_state))
        .merge(lingua_catalog::routes().with_state(catalog_state))
        .merge(lingua_tutoring::routes().with_state(tutoring_state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
