pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

// Re-export commonly used types
pub use domain::auth;
pub use domain::auth::service::AuthService;
pub use outbound::repositories;
