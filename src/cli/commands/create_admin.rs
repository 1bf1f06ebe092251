use anyhow::Result;
use services::account::{self, Registration};
use tracing::{error, info, trace};

use crate::config::{connect_database, Settings};

pub async fn create_admin(
    settings: &Settings,
    username: String,
    email: String,
    password: String,
) -> Result<()> {
    trace!("Entering create_admin function");
    let db = connect_database(&settings.database_url).await?;

    let registration = Registration {
        username,
        email,
        password,
        full_name: None,
    };
    match account::create_admin(&db, registration).await {
        Ok(admin) => info!("Administrator '{}' created with ID {}", admin.username, admin.id),
        Err(e) => {
            error!("Failed to create administrator: {}", e);
            return Err(e.into());
        }
    }
    Ok(())
}
