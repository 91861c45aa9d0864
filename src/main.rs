use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use pawpal_algo::config::Settings;
use pawpal_algo::core::Matcher;
use pawpal_algo::models::ScoringWeights;
use pawpal_algo::precheck::{PrecheckEngine, SessionStore};
use pawpal_algo::providers::{EmbeddingClient, GenerationClient};
use pawpal_algo::routes::{self, matches::AppState};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting PawPal Algo matching service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize provider clients
    if settings.embedding.api_key.is_none() {
        info!("No embedding API key configured; using deterministic fallback vectors");
    }
    let embeddings = Arc::new(EmbeddingClient::new(
        settings.embedding.endpoint,
        settings.embedding.api_key,
        settings.embedding.model,
        settings.embedding.dimension,
        settings.embedding.cache_size,
        settings.embedding.cache_ttl_secs,
    ));

    if settings.generation.api_key.is_none() {
        info!("No generation API key configured; using deterministic mock responses");
    }
    let generation = Arc::new(GenerationClient::new(
        settings.generation.endpoint,
        settings.generation.api_key,
        settings.generation.model,
    ));

    // Initialize matcher with configured weights
    let weights = ScoringWeights {
        hard_constraints: settings.scoring.weights.hard_constraints,
        soft_preferences: settings.scoring.weights.soft_preferences,
        historical: settings.scoring.weights.historical,
    };

    let matcher = Matcher::new(embeddings, weights);

    info!("Matcher initialized with weights: {:?}", weights);

    // Initialize precheck engine with a TTL-evicting session store
    let store = SessionStore::new(
        settings.precheck.session_capacity,
        settings.precheck.session_ttl_secs,
    );
    let precheck = Arc::new(PrecheckEngine::new(store, generation));

    info!(
        "Precheck engine initialized (capacity: {}, session TTL: {}s)",
        settings.precheck.session_capacity, settings.precheck.session_ttl_secs
    );

    // Build application state
    let app_state = AppState { matcher, precheck };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
