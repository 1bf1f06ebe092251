use thiserror::Error;
use tracing::debug;
use validator::ValidationErrors;

/// Error types for the service layer
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A required input field was absent or blank
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Username or email already belongs to another user
    #[error("Username or email is already registered")]
    DuplicateIdentity,

    /// Unknown account, wrong password, or missing privileges at login
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The caller's role does not allow the operation
    #[error("Operation requires the admin role")]
    Forbidden,

    /// A field that must be numeric did not parse
    #[error("Field '{0}' must be numeric")]
    InvalidNumericField(String),

    /// Uploaded file extension is not an accepted image type
    #[error("Unsupported image type: {0}")]
    UnsupportedImageType(String),

    /// The referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error while writing uploaded files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the password hashing backend
    #[error("Password hash error: {0}")]
    PasswordHash(String),
}

impl ServiceError {
    /// Whether the error is a user mistake that can be reported back on the form,
    /// as opposed to an infrastructure failure.
    pub fn is_user_error(&self) -> bool {
        !matches!(
            self,
            ServiceError::Database(_) | ServiceError::Io(_) | ServiceError::PasswordHash(_)
        )
    }
}

// Validation failures on input structs only ever mean "required field left empty".
impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        let err = ServiceError::MissingField(fields.join(", "));
        debug!(?err, "Input validation failed");
        err
    }
}

/// Type alias for Result with ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;
