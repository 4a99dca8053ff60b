use std::sync::Arc;

use axum::Router;
use clap::Args;
use popups_core::openapi::combine_api_docs;
use popups_core::DatabaseConfig;
use popups_database::DbConnection;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "POPUPS_ADDRESS")]
    pub address: String,

    /// Database connection URL
    #[arg(long, env = "POPUPS_DATABASE_URL")]
    pub database_url: String,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = 20, env = "POPUPS_DB_MAX_CONNECTIONS")]
    pub max_connections: u32,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        let mut db_config = DatabaseConfig::new(&self.database_url);
        db_config.max_connections = self.max_connections;

        debug!("Initializing database connection...");
        let db = popups_database::establish_connection_with_config(&db_config).await?;

        let app = build_application(db);

        let listener = TcpListener::bind(&self.address).await?;
        info!("Popups API listening on {}", self.address);
        info!("Swagger UI available at http://{}/swagger-ui", self.address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Popups API server exited");
        Ok(())
    }
}

/// Single OpenAPI document covering both API crates
pub fn create_openapi() -> utoipa::openapi::OpenApi {
    let mut openapi = combine_api_docs(
        "Popups",
        env!("CARGO_PKG_VERSION"),
        vec![
            popups_management::ManagementApiDoc::openapi(),
            popups_analytics::AnalyticsApiDoc::openapi(),
        ],
    );
    openapi.servers = Some(vec![utoipa::openapi::server::Server::new("/api")]);
    openapi
}

/// Management and analytics routes under `/api`, plus Swagger UI
pub fn build_application(db: Arc<DbConnection>) -> Router {
    let management = popups_management::configure_routes()
        .with_state(popups_management::create_management_app_state(db.clone()));
    let analytics = popups_analytics::configure_routes()
        .with_state(popups_analytics::create_analytics_app_state(db));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_router = Router::new()
        .merge(management)
        .merge(analytics)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Router::new()
        .nest("/api", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", create_openapi()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
