pub mod auth_service;
pub mod record_service;
pub mod user_service;
pub mod wish_service;

pub use auth_service::*;
pub use record_service::*;
pub use user_service::*;
pub use wish_service::*;
