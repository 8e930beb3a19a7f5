// Errors layer - Error type definitions
pub mod api;
pub mod service;

// Re-exports for convenience
pub use api::ApiError;
pub use service::ServiceError;
