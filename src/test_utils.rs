use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::{TestServer, TestServerConfig};
use sea_orm::DatabaseConnection;
use services::account::{self, Registration};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use crate::config::{connect_database, Settings};
use crate::router::create_router;
use crate::schemas::AppState;

pub const USER_PASSWORD: &str = "alice-secret";
pub const ADMIN_PASSWORD: &str = "admin-secret";

/// A running test application with its own database and upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub db: DatabaseConnection,
    pub settings: Arc<Settings>,
    // Dropped last, removes the database file and uploads
    _dir: TempDir,
}

/// Route log output of a test through the test harness, filtered by RUST_LOG.
fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .finish();
    tracing::subscriber::set_default(subscriber)
}

/// Settings pointing at a fresh temporary directory
pub fn test_settings(dir: &TempDir) -> Settings {
    Settings {
        database_url: format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display()),
        bind_address: "127.0.0.1:0".to_string(),
        static_dir: dir.path().join("static"),
        upload_dir: dir.path().join("static").join("resimler"),
        session_inactivity_days: 7,
    }
}

/// Start the application on an empty database. The test server keeps cookies,
/// so requests behave like one browser.
pub async fn setup_test_app() -> TestApp {
    let _guard = init_test_tracing();

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let settings = test_settings(&dir);
    std::fs::create_dir_all(&settings.upload_dir).expect("Failed to create upload dir");

    let db = connect_database(&settings.database_url)
        .await
        .expect("Failed to set up test database");
    let settings = Arc::new(settings);
    let state = AppState {
        db: db.clone(),
        settings: settings.clone(),
    };

    let config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    let server =
        TestServer::new_with_config(create_router(state), config).expect("Failed to create test server");

    TestApp {
        server,
        db,
        settings,
        _dir: dir,
    }
}

impl TestApp {
    /// Register the customer `alice` directly through the account service.
    pub async fn create_user(&self) -> model::entities::user::Model {
        account::register(
            &self.db,
            Registration {
                username: "alice".to_string(),
                email: "a@x.io".to_string(),
                password: USER_PASSWORD.to_string(),
                full_name: Some("Alice".to_string()),
            },
        )
        .await
        .expect("Failed to create test user")
    }

    /// Provision the administrator `admin`.
    pub async fn create_admin(&self) -> model::entities::user::Model {
        account::create_admin(
            &self.db,
            Registration {
                username: "admin".to_string(),
                email: "admin@x.io".to_string(),
                password: ADMIN_PASSWORD.to_string(),
                full_name: None,
            },
        )
        .await
        .expect("Failed to create test admin")
    }

    pub async fn login_user(&self) {
        let response = self
            .server
            .post("/giris")
            .form(&[("email", "a@x.io"), ("password", USER_PASSWORD)])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    pub async fn login_admin(&self) {
        let response = self
            .server
            .post("/admin")
            .form(&[("username", "admin"), ("password", ADMIN_PASSWORD)])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }
}
