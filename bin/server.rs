// Expense Store - document store server for the expense tracker
//
// Reads the same secrets file as the client: the credential payload it
// accepts and the [server] section for bind address and database path.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use expense_tracker::config::Secrets;
use expense_tracker::db::open_database;
use expense_tracker::server::{serve, ServerState};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let secrets = Secrets::load().context("Failed to load secrets")?;
    secrets
        .credentials
        .validate()
        .context("Server credentials are invalid")?;

    let conn = open_database(&secrets.server.database_path)?;
    info!(path = %secrets.server.database_path.display(), "database opened");

    let state = ServerState::new(conn, secrets.credentials.fingerprint());

    let listener = tokio::net::TcpListener::bind(&secrets.server.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", secrets.server.bind))?;

    info!(
        addr = %secrets.server.bind,
        project = %secrets.credentials.project_id,
        "expense store listening"
    );

    serve(listener, state).await.context("Server stopped")?;
    Ok(())
}
