//! Login Gate - Application Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use login_gate::{
    config::CONFIG,
    create_router, db,
    services::SqlAuthenticator,
    state::AppState,
    translator::{diagnostics, ExceptionTranslator},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| CONFIG.server.rust_log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Login Gate...");

    // Diagnostics are drained off the request path
    let (sink, drain) = diagnostics::channel(CONFIG.diagnostics.channel_capacity);
    tokio::spawn(drain.run());
    let translator = Arc::new(ExceptionTranslator::new(Arc::new(sink)));

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&CONFIG.database).await?;
    db::test_connection(&db_pool).await?;

    let authenticator = SqlAuthenticator::new(db_pool, &CONFIG.database.auth_procedure);
    tracing::info!(
        procedure = %CONFIG.database.auth_procedure,
        blocked_domains = ?CONFIG.intake.blocked_email_domains,
        "Login intake configured"
    );

    // Create application state
    let state = AppState::new(Arc::new(authenticator), translator, &CONFIG);

    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
