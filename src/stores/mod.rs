// Stores layer - Data access and repository pattern
pub mod activity_store;
pub mod credential_store;
pub mod directory_store;
pub mod session_store;

pub use activity_store::ActivityStore;
pub use credential_store::CredentialStore;
pub use directory_store::DirectoryStore;
pub use session_store::SessionStore;
