use crate::entities::{wishes, Gender};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateWishRequest {
    #[schema(example = "小明")]
    pub child_name: String,
    pub gender: Gender,
    #[schema(example = "一套彩色画笔")]
    pub content: String,
    #[schema(example = "喜欢画画")]
    pub reason: String,
    pub grade: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateWishRequest {
    pub child_name: String,
    pub gender: Gender,
    pub content: String,
    pub reason: String,
    pub grade: Option<String>,
    pub photo_url: Option<String>,
    pub is_published: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchCreateWishItem {
    pub child_name: String,
    pub gender: Gender,
    pub content: String,
    pub reason: String,
    pub grade: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BatchCreateWishRequest {
    pub data: Vec<BatchCreateWishItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatchCreateWishResponse {
    pub imported: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WishQuery {
    /// 按心愿内容模糊搜索
    pub content: Option<String>,
    /// 已认领/可认领过滤，由 active_record_id 是否为空推导
    pub is_claimed: Option<bool>,
    /// 公开状态过滤，不传为全部
    pub is_published: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishResponse {
    pub id: i64,
    pub child_name: String,
    pub gender: Gender,
    pub content: String,
    pub reason: String,
    pub grade: Option<String>,
    pub photo_url: Option<String>,
    pub is_published: bool,
    pub is_claimed: bool,
    pub active_record_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<wishes::Model> for WishResponse {
    fn from(wish: wishes::Model) -> Self {
        Self {
            id: wish.id,
            child_name: wish.child_name,
            gender: wish.gender,
            content: wish.content,
            reason: wish.reason,
            grade: wish.grade,
            photo_url: wish.photo_url,
            is_published: wish.is_published,
            is_claimed: wish.active_record_id.is_some(),
            active_record_id: wish.active_record_id,
            created_at: wish.created_at,
            updated_at: wish.updated_at,
        }
    }
}
