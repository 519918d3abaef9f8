use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tidechat_api::{
    config::Config,
    handlers::chat,
    routes::{chats, health},
    session::HeaderSessions,
    state::AppState,
};
use tidechat_llm::OpenAIClient;
use tidechat_store::StoreClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Tidechat API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize LLM client
    tracing::info!("Initializing LLM client");
    let llm_client: Arc<dyn tidechat_llm::ChatClient> =
        Arc::new(OpenAIClient::new(config.openai_api_key.clone())?);

    // Initialize transcript store
    tracing::info!("Connecting to MongoDB");
    let store = StoreClient::builder()
        .mongodb_uri(&config.mongodb_uri)
        .database(&config.mongodb.database)
        .build()
        .await?;

    tracing::info!("MongoDB connected");

    // Session capability: trust the auth proxy's subject header
    let sessions = Arc::new(HeaderSessions::new(config.session.subject_header.clone()));

    // Create application state
    let state = AppState::new(config.clone(), store, llm_client, sessions);

    // Build router
    let app = build_router(state.clone());

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Chat turn (streaming)
        .route("/api/chat", post(chat::chat_turn))
        // Chats
        .route("/api/chats", post(chats::create_chat))
        .route("/api/chats", get(chats::list_chats))
        .route("/api/chats/:chat_id", delete(chats::delete_chat))
        .route("/api/chats/:chat_id/messages", get(chats::list_messages));

    Router::new()
        .merge(api_routes)
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(300))) // 5 min for streaming
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let mut cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors = cors.allow_origin(Any);
        } else {
            for origin in &config.cors.origins {
                if let Ok(parsed_origin) = origin.parse::<axum::http::HeaderValue>() {
                    cors = cors.allow_origin(parsed_origin);
                }
            }
        }

        cors
    } else {
        CorsLayer::permissive()
    }
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
