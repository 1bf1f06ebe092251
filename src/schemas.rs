use std::sync::Arc;

use axum::response::{IntoResponse, Json, Response};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::config::Settings;
use crate::forms::{AdminLoginForm, LoginForm, ProfileDetailsForm, RegisterForm};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Loaded settings
    pub settings: Arc<Settings>,
}

/// Severity of a flash message, used by templates for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Warning,
    Error,
}

/// One-shot user notice, shown on the next rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Flash {
    pub category: FlashCategory,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: FlashCategory::Error,
            message: message.into(),
        }
    }
}

/// A page handed to the template renderer
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageView {
    /// Template to render, e.g. `giris.html`
    pub template: String,
    /// Flash messages queued since the last rendered page
    pub flashes: Vec<Flash>,
    /// Template variables
    #[schema(value_type = Object)]
    pub context: serde_json::Value,
}

impl IntoResponse for PageView {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::pages::landing,
        crate::handlers::pages::index,
        crate::handlers::pages::contact,
        crate::handlers::auth::login_form,
        crate::handlers::auth::login,
        crate::handlers::auth::logout,
        crate::handlers::auth::admin_login_form,
        crate::handlers::auth::admin_login,
        crate::handlers::auth::register_form,
        crate::handlers::auth::register,
        crate::handlers::cars::list_cars,
        crate::handlers::cars::admin_panel,
        crate::handlers::cars::admin_list_cars,
        crate::handlers::cars::add_car_form,
        crate::handlers::cars::add_car,
        crate::handlers::reservations::my_reservations,
        crate::handlers::profile::profile,
        crate::handlers::profile::update_profile,
        crate::handlers::profile::profile_details,
        crate::handlers::profile::update_profile_details,
    ),
    components(
        schemas(
            PageView,
            Flash,
            FlashCategory,
            ErrorResponse,
            HealthResponse,
            LoginForm,
            AdminLoginForm,
            RegisterForm,
            ProfileDetailsForm,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "pages", description = "Public pages"),
        (name = "auth", description = "Login, logout and registration"),
        (name = "cars", description = "Car catalog and administration"),
        (name = "reservations", description = "Reservations of the logged-in user"),
        (name = "profile", description = "Profile of the logged-in user"),
    ),
    info(
        title = "Car Rental",
        description = "Car rental web application - browse the fleet, manage your profile and reservations",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
