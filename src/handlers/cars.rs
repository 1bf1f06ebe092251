use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use serde_json::json;
use services::catalog::{self, NewCar};
use tracing::{debug, info, instrument, trace};

use crate::auth::AdminUser;
use crate::errors::{recover, AppError};
use crate::handlers::{read_multipart, redirect_with, render};
use crate::schemas::{AppState, Flash, PageView};
use crate::session::SessionContext;

/// Public car catalog
#[utoipa::path(
    get,
    path = "/arabalarimiz",
    tag = "cars",
    responses(
        (status = 200, description = "All cars, in insertion order", body = PageView),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, session))]
pub async fn list_cars(
    State(state): State<AppState>,
    session: SessionContext,
) -> Result<PageView, AppError> {
    let cars = catalog::list_cars(&state.db).await?;
    render(&session, "arabalarimiz.html", json!({ "arabalar": cars })).await
}

/// Administrator dashboard
#[utoipa::path(
    get,
    path = "/admin/panel",
    tag = "cars",
    responses(
        (status = 200, description = "Dashboard", body = PageView),
        (status = 303, description = "Not an administrator, redirected to /")
    )
)]
#[instrument(skip(session))]
pub async fn admin_panel(
    session: SessionContext,
    AdminUser(admin): AdminUser,
) -> Result<PageView, AppError> {
    render(&session, "admin_paneli.html", json!({ "username": admin.username })).await
}

/// Car list for administrators
#[utoipa::path(
    get,
    path = "/admin/araclar",
    tag = "cars",
    responses(
        (status = 200, description = "All cars", body = PageView),
        (status = 303, description = "Not an administrator, redirected to /")
    )
)]
#[instrument(skip(state, session))]
pub async fn admin_list_cars(
    State(state): State<AppState>,
    session: SessionContext,
    AdminUser(_admin): AdminUser,
) -> Result<PageView, AppError> {
    let cars = catalog::list_cars(&state.db).await?;
    render(&session, "admin_arac_listesi.html", json!({ "araclar": cars })).await
}

/// Form for adding a car
#[utoipa::path(
    get,
    path = "/admin/arac/ekle",
    tag = "cars",
    responses(
        (status = 200, description = "Add car form", body = PageView),
        (status = 303, description = "Not an administrator, redirected to /")
    )
)]
#[instrument(skip(session))]
pub async fn add_car_form(
    session: SessionContext,
    AdminUser(_admin): AdminUser,
) -> Result<PageView, AppError> {
    render(&session, "arac_ekle.html", json!({})).await
}

/// Add a car with an optional picture
///
/// Multipart fields: `marka`, `model`, `yil`, `fiyat_gunluk` and the file `resim`.
#[utoipa::path(
    post,
    path = "/admin/arac/ekle",
    tag = "cars",
    request_body(content = String, content_type = "multipart/form-data", description = "marka, model, yil, fiyat_gunluk, resim"),
    responses(
        (status = 303, description = "Redirected to /admin/araclar on success, back to the form otherwise"),
        (status = 400, description = "Malformed multipart body", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, session, multipart))]
pub async fn add_car(
    State(state): State<AppState>,
    session: SessionContext,
    AdminUser(admin): AdminUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    trace!("Entering add_car function");
    let (mut fields, image) = read_multipart(multipart, "resim").await?;
    let mut take = |name: &str| fields.remove(name).unwrap_or_default();

    let new_car = NewCar {
        brand: take("marka"),
        model_name: take("model"),
        year: take("yil"),
        daily_price: take("fiyat_gunluk"),
        image,
    };
    debug!("Add car request: {} {}", new_car.brand, new_car.model_name);

    match catalog::add_car(&state.db, admin.role, new_car, &state.settings.upload_dir).await {
        Ok(car) => {
            info!("Car {} added by {}", car.id, admin.username);
            Ok(redirect_with(&session, Flash::success("Araç başarıyla eklendi!"), "/admin/araclar")
                .await?
                .into_response())
        }
        Err(err) => {
            let flash = recover(err)?;
            Ok(redirect_with(&session, flash, "/admin/arac/ekle")
                .await?
                .into_response())
        }
    }
}
