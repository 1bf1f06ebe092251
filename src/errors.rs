use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use services::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::schemas::{ErrorResponse, Flash};

/// Failures a handler cannot turn into a flash message.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Failed to build page context: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::Service(ServiceError::Database(_)) => "DATABASE_ERROR",
            AppError::Service(ServiceError::Io(_)) => "STORAGE_ERROR",
            AppError::Service(_) => "INTERNAL_ERROR",
            AppError::Session(_) => "SESSION_ERROR",
            AppError::Render(_) => "RENDER_ERROR",
            AppError::Multipart(_) => "INVALID_UPLOAD",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Multipart(_) => {
                warn!("Rejecting request: {}", self);
                StatusCode::BAD_REQUEST
            }
            _ => {
                error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
            success: false,
        };
        (status, Json(body)).into_response()
    }
}

/// Turn a user-facing service error into the notice shown on the page.
///
/// Infrastructure errors are handed back for a 500 response.
pub fn recover(err: ServiceError) -> Result<Flash, AppError> {
    let flash = match err {
        ServiceError::MissingField(_) => Flash::error("Lütfen tüm zorunlu alanları doldurun."),
        ServiceError::DuplicateIdentity => {
            Flash::error("Bu kullanıcı adı veya e-posta zaten kayıtlı.")
        }
        ServiceError::InvalidCredentials => {
            Flash::error("Giriş başarısız. E-posta veya şifre hatalı.")
        }
        ServiceError::Forbidden => Flash::error("Bu sayfaya erişim yetkiniz yok."),
        ServiceError::InvalidNumericField(_) => {
            Flash::error("Yıl ve fiyat alanları sayısal olmalıdır.")
        }
        ServiceError::UnsupportedImageType(_) => Flash::error("Geçersiz dosya türü."),
        ServiceError::NotFound(_) => Flash::warning("Lütfen giriş yapın."),
        infrastructure => return Err(infrastructure.into()),
    };
    Ok(flash)
}
