pub mod auth;
pub mod cars;
pub mod health;
pub mod pages;
pub mod profile;
pub mod reservations;

use std::collections::HashMap;

use axum::extract::Multipart;
use axum::response::Redirect;
use model::entities::user;
use serde::Serialize;
use services::images::ImageUpload;
use services::{Identity, ServiceError, account};
use tracing::{debug, trace, warn};

use crate::errors::AppError;
use crate::schemas::{AppState, Flash, PageView};
use crate::session::SessionContext;

/// Build the page for `template`, draining the session's pending flashes.
pub(crate) async fn render(
    session: &SessionContext,
    template: &str,
    context: impl Serialize,
) -> Result<PageView, AppError> {
    trace!("Rendering {}", template);
    Ok(PageView {
        template: template.to_string(),
        flashes: session.take_flashes().await?,
        context: serde_json::to_value(context)?,
    })
}

/// Queue `flash` and redirect to `to`.
pub(crate) async fn redirect_with(
    session: &SessionContext,
    flash: Flash,
    to: &str,
) -> Result<Redirect, AppError> {
    session.flash(flash).await?;
    Ok(Redirect::to(to))
}

/// Text fields of a multipart form plus the file sent in `file_field`, if any.
pub(crate) async fn read_multipart(
    mut multipart: Multipart,
    file_field: &str,
) -> Result<(HashMap<String, String>, Option<ImageUpload>), AppError> {
    let mut fields = HashMap::new();
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            debug!("Received file '{}' ({} bytes)", filename, bytes.len());
            upload = Some(ImageUpload::new(filename, bytes.to_vec()));
        } else {
            let value = field.text().await?;
            fields.insert(name, value);
        }
    }

    Ok((fields, upload))
}

/// Load the stored user behind the session.
///
/// A user deleted since logging in is treated as logged out: the session is
/// cleared, a login notice queued and `None` returned.
pub(crate) async fn session_user(
    state: &AppState,
    session: &SessionContext,
    identity: &Identity,
) -> Result<Option<user::Model>, AppError> {
    match account::current_user(&state.db, identity).await {
        Ok(user) => Ok(Some(user)),
        Err(ServiceError::NotFound(what)) => {
            warn!("Session refers to missing {}, logging out", what);
            session.logout().await?;
            session.flash(Flash::warning("Lütfen giriş yapın.")).await?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
