use crate::handlers::{
    auth::{admin_login, admin_login_form, login, login_form, logout, register, register_form},
    cars::{add_car, add_car_form, admin_list_cars, admin_panel, list_cars},
    health::health_check,
    pages::{contact, index, landing},
    profile::{profile, profile_details, update_profile, update_profile_details},
    reservations::my_reservations,
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    extract::DefaultBodyLimit,
    response::Json,
    routing::get,
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use utoipa::OpenApi;

/// Upper bound for request bodies, sized for picture uploads
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            state.settings.session_inactivity_days,
        )));

    let static_files = ServeDir::new(&state.settings.static_dir);

    Router::new()
        // Public pages
        .route("/", get(landing))
        .route("/index", get(index))
        .route("/arabalarimiz", get(list_cars))
        .route("/iletisim", get(contact))
        // Customer session
        .route("/giris", get(login_form).post(login))
        .route("/cikis", get(logout))
        .route("/kayit", get(register_form).post(register))
        .route("/rezervasyonlarim", get(my_reservations))
        .route("/profil", get(profile).post(update_profile))
        .route("/profil_detay", get(profile_details).post(update_profile_details))
        // Administration
        .route("/admin", get(admin_login_form).post(admin_login))
        .route("/admin/panel", get(admin_panel))
        .route("/admin/araclar", get(admin_list_cars))
        .route("/admin/arac/ekle", get(add_car_form).post(add_car))
        // Health check and API description
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        // Pictures and other assets
        .nest_service("/static", static_files)
        // Add middleware
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(session_layer)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
