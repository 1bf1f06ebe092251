//! Route guards. Handlers declare their auth requirement by taking one of
//! these extractors.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use services::Identity;
use tracing::{debug, warn};

use crate::schemas::Flash;
use crate::session::SessionContext;

/// Any logged-in user. Anonymous requests are sent to the login page.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

/// A logged-in administrator. Everyone else is sent back to the landing page.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

async fn session_identity<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> Result<(SessionContext, Option<Identity>), Response> {
    let session = SessionContext::from_request_parts(parts, state)
        .await
        .map_err(IntoResponse::into_response)?;
    let identity = session
        .current_user()
        .await
        .map_err(IntoResponse::into_response)?;
    Ok((session, identity))
}

async fn bounce(session: &SessionContext, flash: Flash, to: &str) -> Response {
    match session.flash(flash).await {
        Ok(()) => Redirect::to(to).into_response(),
        Err(err) => err.into_response(),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match session_identity(parts, state).await? {
            (_, Some(identity)) => Ok(CurrentUser(identity)),
            (session, None) => {
                debug!("Anonymous request to {}", parts.uri.path());
                Err(bounce(&session, Flash::warning("Lütfen giriş yapın."), "/giris").await)
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match session_identity(parts, state).await? {
            (_, Some(identity)) if identity.is_admin() => Ok(AdminUser(identity)),
            (session, identity) => {
                warn!(
                    "Admin route {} refused for {:?}",
                    parts.uri.path(),
                    identity.map(|i| i.username)
                );
                Err(bounce(&session, Flash::error("Bu sayfaya erişim yetkiniz yok."), "/").await)
            }
        }
    }
}
