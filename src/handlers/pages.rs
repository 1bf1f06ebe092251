use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tracing::{debug, instrument};

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::handlers::{render, session_user};
use crate::schemas::{AppState, PageView};
use crate::session::SessionContext;

/// Public landing page
#[utoipa::path(
    get,
    path = "/",
    tag = "pages",
    responses((status = 200, description = "Landing page", body = PageView))
)]
#[instrument(skip(session))]
pub async fn landing(session: SessionContext) -> Result<PageView, AppError> {
    render(&session, "index.html", json!({})).await
}

/// Welcome page of the logged-in user
#[utoipa::path(
    get,
    path = "/index",
    tag = "pages",
    responses(
        (status = 200, description = "Welcome page", body = PageView),
        (status = 303, description = "Not logged in, redirected to /giris")
    )
)]
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: SessionContext,
    CurrentUser(identity): CurrentUser,
) -> Result<Response, AppError> {
    let Some(user) = session_user(&state, &session, &identity).await? else {
        return Ok(Redirect::to("/giris").into_response());
    };
    debug!("Welcoming user {}", user.username);

    Ok(render(&session, "karsilama.html", json!({ "username": user.username }))
        .await?
        .into_response())
}

/// Static contact page
#[utoipa::path(
    get,
    path = "/iletisim",
    tag = "pages",
    responses((status = 200, description = "Contact page", body = PageView))
)]
#[instrument(skip(session))]
pub async fn contact(session: SessionContext) -> Result<PageView, AppError> {
    render(&session, "iletisim.html", json!({})).await
}
