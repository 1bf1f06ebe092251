use anyhow::Result;
use tracing::{debug, info, trace};

use crate::config::{connect_database, Settings};

pub async fn init_database(settings: &Settings) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");

    // Connecting creates any missing table
    let db = connect_database(&settings.database_url).await?;
    debug!("Schema ready");
    db.close().await?;

    info!("Database initialization completed successfully!");
    Ok(())
}
