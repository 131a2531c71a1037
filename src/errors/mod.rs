// Errors layer - Error type definitions
pub mod api;
pub mod store;

// Re-exports for convenience
pub use api::ApiError;
pub use store::StoreError;
