pub mod auth;
pub mod record;
pub mod upload;
pub mod user;
pub mod wish;

pub use auth::auth_config;
pub use record::record_config;
pub use upload::upload_config;
pub use user::user_config;
pub use wish::wish_config;

use crate::models::AuthenticatedUser;
use actix_web::{HttpMessage, HttpRequest};

/// 从请求扩展取出认证中间件写入的调用主体
pub fn current_user(req: &HttpRequest) -> Option<AuthenticatedUser> {
    req.extensions().get::<AuthenticatedUser>().copied()
}
