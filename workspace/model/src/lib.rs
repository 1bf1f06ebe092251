pub mod entities;
pub mod schema;
pub mod store;

// Re-export tracing for use in this crate
pub use tracing;
