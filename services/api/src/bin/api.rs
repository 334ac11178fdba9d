//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        db::DbAdapter,
        enrichment_llm::{GroqEnrichmentAdapter, GROQ_API_BASE},
        upload::CloudinaryAdapter,
    },
    config::{Config, ConfigError},
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, signup_handler},
        entries::{
            create_entry_handler, delete_entry_handler, get_entry_handler, list_entries_handler,
            update_entry_handler,
        },
        middleware::require_auth,
        projects::{
            create_project_handler, delete_project_handler, get_project_handler,
            list_projects_handler,
        },
        rest::ApiDoc,
        search::search_handler,
        state::AppState,
        upload::upload_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use bugvault_core::service::VaultService;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool.clone()));
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Initialize Service Adapters ---
    let groq_config = OpenAIConfig::new()
        .with_api_base(GROQ_API_BASE)
        .with_api_key(
            config
                .groq_api_key
                .as_ref()
                .ok_or_else(|| ApiError::Internal("GROQ_API_KEY is required".to_string()))?,
        );
    let groq_client = Client::with_config(groq_config);
    let enrichment_adapter = Arc::new(GroqEnrichmentAdapter::new(
        groq_client,
        config.enrichment_model.clone(),
    ));

    let uploader = Arc::new(CloudinaryAdapter::new(
        config
            .cloudinary_cloud_name
            .clone()
            .ok_or_else(|| ApiError::Internal("CLOUDINARY_CLOUD_NAME is required".to_string()))?,
        config
            .cloudinary_api_key
            .clone()
            .ok_or_else(|| ApiError::Internal("CLOUDINARY_API_KEY is required".to_string()))?,
        config
            .cloudinary_api_secret
            .clone()
            .ok_or_else(|| ApiError::Internal("CLOUDINARY_API_SECRET is required".to_string()))?,
    ));

    // --- 4. Build the Shared AppState ---
    let service = VaultService::new(db_adapter.clone(), enrichment_adapter);
    let app_state = Arc::new(AppState {
        db: db_adapter,
        service,
        uploader,
        config: config.clone(),
    });

    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string()))?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route(
            "/projects",
            post(create_project_handler).get(list_projects_handler),
        )
        .route(
            "/projects/{id}",
            get(get_project_handler).delete(delete_project_handler),
        )
        .route(
            "/projects/{id}/entries",
            post(create_entry_handler).get(list_entries_handler),
        )
        .route(
            "/entries/{id}",
            get(get_entry_handler)
                .put(update_entry_handler)
                .delete(delete_entry_handler),
        )
        .route("/search", get(search_handler))
        .route("/upload", post(upload_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
