pub mod storage;
pub mod wechat;

pub use storage::*;
pub use wechat::*;
