use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::{initialize_app_state, Settings};
use crate::router::create_router;

/// Run the rental site until the listener fails.
pub async fn serve(settings: Settings) -> Result<()> {
    debug!(?settings, "Preparing the rental site");
    let bind_address = settings.bind_address.clone();

    let state = initialize_app_state(settings)
        .await
        .inspect_err(|e| error!("Database is not usable: {:#}", e))?;
    let app = create_router(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("cannot listen on {}", bind_address))
        .inspect_err(|e| error!("{:#}", e))?;

    info!("Showroom open at http://{}/", bind_address);
    info!("API description at http://{}/api-docs/openapi.json", bind_address);

    axum::serve(listener, app)
        .await
        .context("web server stopped")
        .inspect_err(|e| error!("{:#}", e))?;

    info!("Showroom closed");
    Ok(())
}
