// Services layer - Business logic shared across API handlers
pub mod audit;
pub mod bootstrap;
pub mod crypto;
pub mod guard;

pub use audit::AuditLogger;
pub use guard::Guard;
