use anyhow::Result;
use tracing::{error, info, trace};

use crate::config::{connect_database, Settings};

pub async fn seed_cars(settings: &Settings) -> Result<()> {
    trace!("Entering seed_cars function");
    let db = connect_database(&settings.database_url).await?;

    match services::catalog::seed_cars(&db).await {
        Ok(inserted) => info!("Catalog seeded, {} cars added", inserted),
        Err(e) => {
            error!("Failed to seed catalog: {}", e);
            return Err(e.into());
        }
    }
    Ok(())
}
