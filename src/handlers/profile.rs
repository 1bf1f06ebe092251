use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde_json::json;
use services::account::{self, ProfileUpdate};
use tracing::{info, instrument, trace};

use crate::auth::CurrentUser;
use crate::errors::{recover, AppError};
use crate::forms::ProfileDetailsForm;
use crate::handlers::{read_multipart, redirect_with, render, session_user};
use crate::schemas::{AppState, Flash, PageView};
use crate::session::SessionContext;

/// Basic profile of the logged-in user
#[utoipa::path(
    get,
    path = "/profil",
    tag = "profile",
    responses(
        (status = 200, description = "Profile page", body = PageView),
        (status = 303, description = "Not logged in, redirected to /giris")
    )
)]
#[instrument(skip(state, session))]
pub async fn profile(
    State(state): State<AppState>,
    session: SessionContext,
    CurrentUser(identity): CurrentUser,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&state, &session, &identity).await? else {
        return Ok(Redirect::to("/giris").into_response());
    };
    Ok(render(&session, "profil.html", json!({ "user": user }))
        .await?
        .into_response())
}

/// Update the basic profile and optionally the profile picture
///
/// Multipart fields: `full_name`, `phone`, `city`, `district`, `address` and the
/// file `profile_image`.
#[utoipa::path(
    post,
    path = "/profil",
    tag = "profile",
    request_body(content = String, content_type = "multipart/form-data", description = "full_name, phone, city, district, address, profile_image"),
    responses(
        (status = 303, description = "Redirected to /profil with a notice"),
        (status = 400, description = "Malformed multipart body", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, session, multipart))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: SessionContext,
    CurrentUser(identity): CurrentUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    trace!("Entering update_profile function");
    let (mut fields, image) = read_multipart(multipart, "profile_image").await?;
    let update = ProfileUpdate {
        full_name: fields.remove("full_name"),
        phone: fields.remove("phone"),
        city: fields.remove("city"),
        district: fields.remove("district"),
        address: fields.remove("address"),
    };

    let result = account::update_profile(
        &state.db,
        identity.user_id,
        update,
        image.as_ref(),
        &state.settings.upload_dir,
    )
    .await;

    match result {
        Ok(user) => {
            info!("Profile of {} updated", user.username);
            Ok(redirect_with(&session, Flash::success("Profil güncellendi!"), "/profil")
                .await?
                .into_response())
        }
        Err(services::ServiceError::NotFound(_)) => {
            session.logout().await?;
            Ok(redirect_with(&session, Flash::warning("Lütfen giriş yapın."), "/giris")
                .await?
                .into_response())
        }
        Err(err) => {
            let flash = recover(err)?;
            Ok(redirect_with(&session, flash, "/profil").await?.into_response())
        }
    }
}

/// Extended profile of the logged-in user
#[utoipa::path(
    get,
    path = "/profil_detay",
    tag = "profile",
    responses(
        (status = 200, description = "Profile details page", body = PageView),
        (status = 303, description = "Not logged in, redirected to /giris")
    )
)]
#[instrument(skip(state, session))]
pub async fn profile_details(
    State(state): State<AppState>,
    session: SessionContext,
    CurrentUser(identity): CurrentUser,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&state, &session, &identity).await? else {
        return Ok(Redirect::to("/giris").into_response());
    };
    Ok(render(&session, "profil-detay.html", json!({ "user": user }))
        .await?
        .into_response())
}

/// Update the extended profile, including the login email
#[utoipa::path(
    post,
    path = "/profil_detay",
    tag = "profile",
    request_body(content = ProfileDetailsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirected to /profil_detay with a notice"),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, session, form))]
pub async fn update_profile_details(
    State(state): State<AppState>,
    session: SessionContext,
    CurrentUser(identity): CurrentUser,
    Form(form): Form<ProfileDetailsForm>,
) -> Result<Response, AppError> {
    trace!("Entering update_profile_details function");
    match account::update_profile_details(&state.db, identity.user_id, form.into()).await {
        Ok(user) => {
            // Keep the session in step with the new login email
            session.login(&services::Identity::from(&user)).await?;
            Ok(redirect_with(&session, Flash::success("Profiliniz güncellendi."), "/profil_detay")
                .await?
                .into_response())
        }
        Err(services::ServiceError::NotFound(_)) => {
            session.logout().await?;
            Ok(redirect_with(&session, Flash::warning("Lütfen giriş yapın."), "/giris")
                .await?
                .into_response())
        }
        Err(err) => {
            let flash = recover(err)?;
            Ok(redirect_with(&session, flash, "/profil_detay")
                .await?
                .into_response())
        }
    }
}
