//! Business logic of the car rental application.
//!
//! Services take a database connection and typed input, and report failures
//! through [`error::ServiceError`]. User mistakes (missing fields, duplicate
//! accounts, bad credentials, ...) are ordinary error variants so the web
//! layer can turn them into flash messages.

pub mod account;
pub mod catalog;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod images;
pub mod reservations;

#[cfg(test)]
mod testing;

pub use error::{Result, ServiceError};
pub use identity::{Identity, Role};
