// Services layer - Business logic
pub mod auth_service;
pub mod graph_service;
pub mod identity_service;
pub mod session_service;

pub use auth_service::AuthService;
pub use graph_service::GraphService;
pub use identity_service::IdentityService;
pub use session_service::{SessionService, SESSION_COOKIE};
