use clap::Parser;
use formsync_core::registry::Registry;
use formsync_server::api::{self, AppState};
use formsync_server::models;
use formsync_server::store::UserStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "formsync-server", version, about = "User CRUD demo server with model validation")]
struct Cli {
    /// Where the HTTP API will listen, e.g. 127.0.0.1:3000
    #[arg(long, default_value = "127.0.0.1:3000")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Models are declared once here; the registry never changes afterwards.
    let mut registry = Registry::new();
    models::register_models(&mut registry)?;

    let state = AppState {
        registry: Arc::new(registry),
        store: Arc::new(UserStore::new()),
    };

    // The browser form is the intended consumer, so CORS stays wide open.
    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = cli.listen.parse()?;
    info!("listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("shutdown requested");
}
