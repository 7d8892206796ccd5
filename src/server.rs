use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, Method};
use axum::routing::{get, post, put};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::handler;
use crate::config::AppConfig;
use crate::generator::claude::{ClaudeClient, ClaudeGenerator};
use crate::generator::DescriptionGenerator;
use crate::registry::SessionRegistry;

/// Every listing is attributed to this seller until real accounts exist.
pub const MOCK_SELLER_ID: &str = "seller-demo";

pub struct AppState {
    pub config: AppConfig,
    pub generator: Arc<dyn DescriptionGenerator>,
    pub sessions: RwLock<SessionRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let generator = Arc::new(ClaudeGenerator::new(ClaudeClient::new(&config.claude)));
        Self::with_generator(config, generator)
    }

    pub fn with_generator(config: AppConfig, generator: Arc<dyn DescriptionGenerator>) -> Self {
        Self {
            config,
            generator,
            sessions: RwLock::new(SessionRegistry::new()),
        }
    }

    pub fn enhancement_timeout(&self) -> Duration {
        self.config.enhancement.timeout()
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(health_check))
        .route("/categories", get(handler::list_categories))
        .route("/sessions", post(handler::open_session))
        .route(
            "/sessions/:id",
            get(handler::get_session).delete(handler::close_session),
        )
        .route("/sessions/:id/draft", put(handler::update_draft))
        .route("/sessions/:id/enhance", post(handler::request_enhancement))
        .route("/sessions/:id/apply", post(handler::apply_result))
        .route("/sessions/:id/dismiss", post(handler::dismiss))
        .route("/sessions/:id/submit", post(handler::submit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "ok"
}
