//! 记录进度时间线：只读投影，完全由已落库的时间戳推导

use crate::entities::{wish_records, RecordStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProgressKind {
    Creation,
    Shipping,
    Confirmation,
    Delivery,
    Receipt,
    PlatformGift,
    OwnerGift,
    Cancellation,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProgressItem {
    pub kind: ProgressKind,
    /// 该进度对应的记录状态
    pub status: RecordStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

/// 由记录的各阶段时间戳拼装进度数组，时间降序；认领（创建）事件始终存在。
pub fn build_progress(record: &wish_records::Model) -> Vec<ProgressItem> {
    let mut items = Vec::new();

    if let Some(t) = record.cancellation_time {
        items.push(ProgressItem {
            kind: ProgressKind::Cancellation,
            status: RecordStatus::Cancelled,
            timestamp: t,
            message: None,
            photos: None,
            tracking_number: None,
        });
    }

    if let Some(t) = record.owner_gift_time {
        items.push(ProgressItem {
            kind: ProgressKind::OwnerGift,
            status: RecordStatus::GiftReturned,
            timestamp: t,
            message: record.owner_gift_message.clone(),
            photos: record.owner_gift_photos.clone(),
            tracking_number: None,
        });
    }

    if let Some(t) = record.platform_gift_time {
        items.push(ProgressItem {
            kind: ProgressKind::PlatformGift,
            status: RecordStatus::GiftReturned,
            timestamp: t,
            message: record.platform_gift_message.clone(),
            photos: record.platform_gift_photos.clone(),
            tracking_number: None,
        });
    }

    if let Some(t) = record.receipt_time {
        items.push(ProgressItem {
            kind: ProgressKind::Receipt,
            status: RecordStatus::Completed,
            timestamp: t,
            message: record.receipt_message.clone(),
            photos: record.receipt_photos.clone(),
            tracking_number: None,
        });
    }

    if let Some(t) = record.delivery_time {
        items.push(ProgressItem {
            kind: ProgressKind::Delivery,
            status: RecordStatus::AwaitingReceipt,
            timestamp: t,
            message: None,
            photos: None,
            tracking_number: record.delivery_number.clone(),
        });
    }

    if let Some(t) = record.confirmation_time {
        items.push(ProgressItem {
            kind: ProgressKind::Confirmation,
            status: RecordStatus::Confirmed,
            timestamp: t,
            message: record.confirmation_message.clone(),
            photos: record.confirmation_photos.clone(),
            tracking_number: None,
        });
    }

    if let Some(t) = record.shipping_time {
        items.push(ProgressItem {
            kind: ProgressKind::Shipping,
            status: RecordStatus::PendingConfirmation,
            timestamp: t,
            message: None,
            photos: None,
            tracking_number: record.shipping_number.clone(),
        });
    }

    items.push(ProgressItem {
        kind: ProgressKind::Creation,
        status: RecordStatus::PendingShipment,
        timestamp: record.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC),
        message: None,
        photos: None,
        tracking_number: None,
    });

    // 稳定排序，时间相同保持插入顺序
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn base_record() -> wish_records::Model {
        wish_records::Model {
            id: 1,
            status: RecordStatus::PendingShipment,
            wish_id: 1,
            donor_id: 1,
            donor_name: "Ann".to_string(),
            donor_mobile: "13800000000".to_string(),
            donor_address: "X St".to_string(),
            donor_comment: String::new(),
            shipping_number: None,
            shipping_time: None,
            confirmation_message: None,
            confirmation_photos: None,
            confirmation_time: None,
            delivery_number: None,
            delivery_time: None,
            receipt_message: None,
            receipt_photos: None,
            receipt_time: None,
            platform_gift_message: None,
            platform_gift_photos: None,
            platform_gift_time: None,
            owner_gift_message: None,
            owner_gift_photos: None,
            owner_gift_time: None,
            cancellation_time: None,
            created_at: Some(ts(1000)),
            updated_at: Some(ts(1000)),
            deleted_at: None,
        }
    }

    #[test]
    fn test_creation_event_always_present() {
        let items = build_progress(&base_record());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kind, ProgressKind::Creation);
        assert_eq!(items[0].status, RecordStatus::PendingShipment);
        assert_eq!(items[0].timestamp, ts(1000));
    }

    #[test]
    fn test_events_sorted_descending() {
        let mut record = base_record();
        record.shipping_number = Some("SF100".to_string());
        record.shipping_time = Some(ts(2000));
        record.confirmation_message = Some("收到".to_string());
        record.confirmation_time = Some(ts(3000));
        record.delivery_number = Some("SF200".to_string());
        record.delivery_time = Some(ts(4000));

        let items = build_progress(&record);
        let kinds: Vec<ProgressKind> = items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ProgressKind::Delivery,
                ProgressKind::Confirmation,
                ProgressKind::Shipping,
                ProgressKind::Creation,
            ]
        );
        assert_eq!(items[0].tracking_number.as_deref(), Some("SF200"));
        assert_eq!(items[1].message.as_deref(), Some("收到"));
        assert_eq!(items[2].tracking_number.as_deref(), Some("SF100"));
    }

    #[test]
    fn test_unset_stages_are_omitted() {
        let mut record = base_record();
        record.shipping_number = Some("SF100".to_string());
        record.shipping_time = Some(ts(2000));

        let items = build_progress(&record);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.kind != ProgressKind::Receipt));
    }

    #[test]
    fn test_gift_and_cancellation_events() {
        let mut record = base_record();
        record.platform_gift_message = Some("谢谢".to_string());
        record.platform_gift_time = Some(ts(5000));
        record.owner_gift_message = Some("回礼".to_string());
        record.owner_gift_time = Some(ts(6000));

        let items = build_progress(&record);
        assert_eq!(items[0].kind, ProgressKind::OwnerGift);
        assert_eq!(items[0].status, RecordStatus::GiftReturned);
        assert_eq!(items[1].kind, ProgressKind::PlatformGift);

        let mut cancelled = base_record();
        cancelled.cancellation_time = Some(ts(1500));
        let items = build_progress(&cancelled);
        assert_eq!(items[0].kind, ProgressKind::Cancellation);
        assert_eq!(items[0].status, RecordStatus::Cancelled);
        assert_eq!(items[1].kind, ProgressKind::Creation);
    }
}
