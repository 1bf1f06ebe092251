//! Per-browser session state: the logged-in identity and pending flash messages.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::StatusCode};
use services::Identity;
use tower_sessions::Session;
use tracing::{debug, trace};

use crate::errors::AppError;
use crate::schemas::Flash;

const IDENTITY_KEY: &str = "identity";
const FLASHES_KEY: &str = "_flashes";

/// Handle on the session of the current request.
///
/// Requires the `SessionManagerLayer` installed by the router.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session: Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self { session })
    }
}

impl SessionContext {
    /// Remember `identity` as the logged-in user.
    ///
    /// The session id is rotated so a pre-login cookie cannot be reused.
    pub async fn login(&self, identity: &Identity) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(IDENTITY_KEY, identity).await?;
        debug!("Session bound to user ID {}", identity.user_id);
        Ok(())
    }

    /// Forget everything held for this browser, including queued flashes.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.session.clear().await;
        self.session.cycle_id().await?;
        trace!("Session cleared");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<Option<Identity>, AppError> {
        Ok(self.session.get::<Identity>(IDENTITY_KEY).await?)
    }

    /// Queue a message for the next rendered page.
    pub async fn flash(&self, flash: Flash) -> Result<(), AppError> {
        let mut flashes: Vec<Flash> = self.session.get(FLASHES_KEY).await?.unwrap_or_default();
        flashes.push(flash);
        self.session.insert(FLASHES_KEY, flashes).await?;
        Ok(())
    }

    /// Drain the queued messages. Each message is returned exactly once.
    pub async fn take_flashes(&self) -> Result<Vec<Flash>, AppError> {
        Ok(self
            .session
            .remove::<Vec<Flash>>(FLASHES_KEY)
            .await?
            .unwrap_or_default())
    }
}
