use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use config::{Config, Environment, File};
use model::schema::create_tables;
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use tracing::{debug, error, info, trace};

use crate::schemas::AppState;

/// Application settings.
///
/// Layered from built-in defaults, an optional `carrental.toml` in the working
/// directory and `CARRENTAL_*` environment variables (e.g.
/// `CARRENTAL_UPLOAD_DIR`). Command line flags override the result.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SeaORM connection string
    pub database_url: String,
    /// Address the web server listens on, `IP:PORT`
    pub bind_address: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Directory receiving uploaded car and profile pictures
    pub upload_dir: PathBuf,
    /// Sessions expire after this many days without a request
    pub session_inactivity_days: i64,
}

impl Settings {
    /// Load settings from the defaults, the optional config file and the environment.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("database_url", "sqlite://carrental.db?mode=rwc")?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("static_dir", "static")?
            .set_default("upload_dir", "static/resimler")?
            .set_default("session_inactivity_days", 7)?
            .add_source(File::with_name("carrental").required(false))
            .add_source(Environment::with_prefix("CARRENTAL"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }

    pub fn with_bind_address(mut self, bind_address: Option<String>) -> Self {
        if let Some(address) = bind_address {
            self.bind_address = address;
        }
        self
    }
}

/// Connect to the database and make sure the schema exists.
pub async fn connect_database(database_url: &str) -> Result<DatabaseConnection> {
    trace!("Attempting to connect to database");
    debug!("Database URL: {}", database_url);
    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    create_tables(&db).await?;
    Ok(db)
}

/// Initialize application state from loaded settings
pub async fn initialize_app_state(settings: Settings) -> Result<AppState> {
    let db = connect_database(&settings.database_url).await?;

    // Make sure uploads have somewhere to go
    tokio::fs::create_dir_all(&settings.upload_dir).await?;
    debug!("Upload directory: {}", settings.upload_dir.display());

    Ok(AppState {
        db,
        settings: Arc::new(settings),
    })
}
