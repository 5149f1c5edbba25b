use crate::entities::{wish_records, RecordStatus};
use crate::models::ProgressItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 认领时提交的收件信息，原样快照进记录
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimWishRequest {
    #[schema(example = "Ann")]
    pub donor_name: String,
    #[schema(example = "13800000000")]
    pub donor_mobile: String,
    #[schema(example = "X St")]
    pub donor_address: String,
    #[serde(default)]
    pub donor_comment: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateRecordStatusRequest {
    pub status: RecordStatus,
    pub shipping_number: Option<String>,
    pub confirmation_message: Option<String>,
    pub confirmation_photos: Option<String>,
    pub delivery_number: Option<String>,
    pub receipt_message: Option<String>,
    pub receipt_photos: Option<String>,
    pub platform_gift_message: Option<String>,
    pub platform_gift_photos: Option<String>,
    pub owner_gift_message: Option<String>,
    pub owner_gift_photos: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateShippingInfoRequest {
    pub donor_name: String,
    pub donor_mobile: String,
    pub donor_address: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordQuery {
    pub status: Option<RecordStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordResponse {
    pub id: i64,
    pub status: RecordStatus,
    pub wish_id: i64,
    pub donor_id: i64,
    pub donor_name: String,
    pub donor_mobile: String,
    pub donor_address: String,
    pub donor_comment: String,
    pub shipping_number: Option<String>,
    pub shipping_time: Option<DateTime<Utc>>,
    pub confirmation_message: Option<String>,
    pub confirmation_photos: Option<String>,
    pub confirmation_time: Option<DateTime<Utc>>,
    pub delivery_number: Option<String>,
    pub delivery_time: Option<DateTime<Utc>>,
    pub receipt_message: Option<String>,
    pub receipt_photos: Option<String>,
    pub receipt_time: Option<DateTime<Utc>>,
    pub platform_gift_message: Option<String>,
    pub platform_gift_photos: Option<String>,
    pub platform_gift_time: Option<DateTime<Utc>>,
    pub owner_gift_message: Option<String>,
    pub owner_gift_photos: Option<String>,
    pub owner_gift_time: Option<DateTime<Utc>>,
    pub cancellation_time: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<wish_records::Model> for RecordResponse {
    fn from(r: wish_records::Model) -> Self {
        Self {
            id: r.id,
            status: r.status,
            wish_id: r.wish_id,
            donor_id: r.donor_id,
            donor_name: r.donor_name,
            donor_mobile: r.donor_mobile,
            donor_address: r.donor_address,
            donor_comment: r.donor_comment,
            shipping_number: r.shipping_number,
            shipping_time: r.shipping_time,
            confirmation_message: r.confirmation_message,
            confirmation_photos: r.confirmation_photos,
            confirmation_time: r.confirmation_time,
            delivery_number: r.delivery_number,
            delivery_time: r.delivery_time,
            receipt_message: r.receipt_message,
            receipt_photos: r.receipt_photos,
            receipt_time: r.receipt_time,
            platform_gift_message: r.platform_gift_message,
            platform_gift_photos: r.platform_gift_photos,
            platform_gift_time: r.platform_gift_time,
            owner_gift_message: r.owner_gift_message,
            owner_gift_photos: r.owner_gift_photos,
            owner_gift_time: r.owner_gift_time,
            cancellation_time: r.cancellation_time,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// 记录详情：基本信息 + 心愿摘要 + 进度时间线
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordDetailResponse {
    pub id: i64,
    pub status: RecordStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    pub progress: Vec<ProgressItem>,

    pub child_name: String,
    pub wish_content: String,
    pub wish_reason: String,
    pub claimed_at: Option<DateTime<Utc>>,

    pub donor_name: String,
    pub donor_mobile: String,
    pub donor_address: String,
}
