use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use services::reservations;
use tracing::{debug, instrument};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::handlers::{render, session_user};
use crate::schemas::{AppState, PageView};
use crate::session::SessionContext;

/// Reservations of the logged-in user, each with its car
#[utoipa::path(
    get,
    path = "/rezervasyonlarim",
    tag = "reservations",
    responses(
        (status = 200, description = "Own reservations", body = PageView),
        (status = 303, description = "Not logged in, redirected to /giris"),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, session))]
pub async fn my_reservations(
    State(state): State<AppState>,
    session: SessionContext,
    CurrentUser(identity): CurrentUser,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&state, &session, &identity).await? else {
        return Ok(Redirect::to("/giris").into_response());
    };

    let list = reservations::list_for_user(&state.db, user.id).await?;
    debug!("User {} has {} reservations", user.id, list.len());

    Ok(render(&session, "rezervasyonlarim.html", json!({ "rezervasyonlar": list }))
        .await?
        .into_response())
}
