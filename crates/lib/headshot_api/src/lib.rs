//! # headshot_api
//!
//! HTTP API library for Headshot.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use headshot_core::credits::CreditLedger;
use headshot_core::generation::Orchestrator;
use headshot_core::generation::gemini::GeminiClient;
use headshot_core::generation::retry::RetryPolicy;
use headshot_core::generation::{GenerationSettings, model::ImageModel};
use headshot_core::headshots::HeadshotGateway;
use headshot_core::storage::{LocalObjectStore, ObjectStore};
use headshot_core::store::memory::MemoryStore;
use headshot_core::store::postgres::PgStore;
use headshot_core::store::{AccountStore, HeadshotStore, SubscriptionStore};
use headshot_core::tier::resolver::TierResolver;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::handlers::{credits, generate, headshots, health, model_status, styles, subscription};

/// Store backends behind the service layer.
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
    pub headshots: Arc<dyn HeadshotStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            accounts: store.clone(),
            subscriptions: store.clone(),
            headshots: store,
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            accounts: store.clone(),
            subscriptions: store.clone(),
            headshots: store,
        }
    }
}

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL pool; `None` when running on the in-memory store.
    pub pool: Option<PgPool>,
    pub config: ApiConfig,
    pub resolver: TierResolver,
    pub ledger: CreditLedger,
    pub orchestrator: Orchestrator,
    pub headshots: HeadshotGateway,
    pub objects: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(
        config: ApiConfig,
        stores: Stores,
        pool: Option<PgPool>,
        orchestrator: Orchestrator,
    ) -> Self {
        Self {
            pool,
            resolver: TierResolver::new(
                stores.accounts.clone(),
                stores.subscriptions,
                config.price_tiers.clone(),
            ),
            ledger: CreditLedger::new(stores.accounts),
            orchestrator,
            headshots: HeadshotGateway::new(stores.headshots),
            objects: Arc::new(LocalObjectStore::new(config.storage_dir.clone())),
            config,
        }
    }
}

/// Build the orchestrator from configuration. A missing or unusable API key
/// leaves the model disabled so requests are served from sample images.
pub fn orchestrator_from_config(config: &ApiConfig) -> Orchestrator {
    let settings = GenerationSettings {
        retry: RetryPolicy {
            call_timeout: config.call_timeout,
            ..RetryPolicy::default()
        },
        max_image_bytes: config.max_upload_bytes,
        ..GenerationSettings::default()
    };
    let model: Option<Arc<dyn ImageModel>> = match &config.gemini {
        Some(gemini) => match GeminiClient::new(gemini.clone()) {
            Ok(client) => {
                info!(model = %gemini.model, key = %gemini.key_hint(), "image model enabled");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "image model unavailable, serving sample images");
                None
            }
        },
        None => {
            info!("GEMINI_API_KEY not set, serving sample images");
            None
        }
    };
    Orchestrator::new(model, settings)
}

/// Run embedded database migrations.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    headshot_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public = Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/model/status", get(model_status::model_status_handler))
        .route(
            "/api/subscription/update",
            post(subscription::update_subscription_handler),
        );

    // Guests allowed; a valid bearer token upgrades the caller.
    let optional = Router::new()
        .route("/api/generate", post(generate::generate_handler))
        .route("/api/credits", get(credits::credits_handler))
        .route("/api/styles", get(styles::styles_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::optional_auth,
        ));

    let protected = Router::new()
        .route(
            "/api/subscription/status",
            get(subscription::subscription_status_handler),
        )
        .route("/api/headshots/save", post(headshots::save_headshot_handler))
        .route("/api/headshots/list", get(headshots::list_headshots_handler))
        .route(
            "/api/headshots/delete",
            delete(headshots::delete_headshot_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Applied by the body extractors, not as a service layer.
    let body_limit = state.config.max_request_bytes;
    Router::new()
        .merge(public)
        .merge(optional)
        .merge(protected)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
