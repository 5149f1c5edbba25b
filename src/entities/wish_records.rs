use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 认领记录的生命周期状态
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[sea_orm(string_value = "pending_shipment")]
    PendingShipment,
    #[sea_orm(string_value = "pending_confirmation")]
    PendingConfirmation,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "awaiting_receipt")]
    AwaitingReceipt,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "gift_returned")]
    GiftReturned,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordStatus::PendingShipment => "pending_shipment",
            RecordStatus::PendingConfirmation => "pending_confirmation",
            RecordStatus::Confirmed => "confirmed",
            RecordStatus::AwaitingReceipt => "awaiting_receipt",
            RecordStatus::Completed => "completed",
            RecordStatus::GiftReturned => "gift_returned",
            RecordStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl RecordStatus {
    /// 从当前状态允许到达的目标状态
    pub fn allowed_transitions(&self) -> &'static [RecordStatus] {
        match self {
            RecordStatus::PendingShipment => {
                &[RecordStatus::PendingConfirmation, RecordStatus::Cancelled]
            }
            RecordStatus::PendingConfirmation => {
                &[RecordStatus::Confirmed, RecordStatus::Cancelled]
            }
            RecordStatus::Confirmed => &[RecordStatus::AwaitingReceipt, RecordStatus::Cancelled],
            RecordStatus::AwaitingReceipt => &[RecordStatus::Completed, RecordStatus::Cancelled],
            RecordStatus::Completed => &[RecordStatus::GiftReturned],
            // 回礼信息可多次补录，自环；时间戳落一次后不再覆盖
            RecordStatus::GiftReturned => &[RecordStatus::GiftReturned],
            RecordStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, target: RecordStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "wish_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub status: RecordStatus,
    pub wish_id: i64,
    pub donor_id: i64,
    // 认领时的收件快照，后续用户资料变更不回写
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
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(RecordStatus::PendingShipment.can_transition_to(RecordStatus::PendingConfirmation));
        assert!(RecordStatus::PendingConfirmation.can_transition_to(RecordStatus::Confirmed));
        assert!(RecordStatus::Confirmed.can_transition_to(RecordStatus::AwaitingReceipt));
        assert!(RecordStatus::AwaitingReceipt.can_transition_to(RecordStatus::Completed));
        assert!(RecordStatus::Completed.can_transition_to(RecordStatus::GiftReturned));
    }

    #[test]
    fn test_cancellation_reachable_from_non_terminal_states() {
        for status in [
            RecordStatus::PendingShipment,
            RecordStatus::PendingConfirmation,
            RecordStatus::Confirmed,
            RecordStatus::AwaitingReceipt,
        ] {
            assert!(status.can_transition_to(RecordStatus::Cancelled), "{status}");
        }
        assert!(!RecordStatus::Completed.can_transition_to(RecordStatus::Cancelled));
        assert!(!RecordStatus::GiftReturned.can_transition_to(RecordStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        // 回礼态只允许自环补录，取消态无任何出口
        assert_eq!(
            RecordStatus::GiftReturned.allowed_transitions(),
            &[RecordStatus::GiftReturned]
        );
        assert!(RecordStatus::Cancelled.allowed_transitions().is_empty());
        assert!(!RecordStatus::GiftReturned.can_transition_to(RecordStatus::Completed));
        assert!(!RecordStatus::Cancelled.can_transition_to(RecordStatus::PendingShipment));
    }

    // 状态对不在表中的一律拒绝
    #[test]
    fn test_transition_table_closure() {
        use sea_orm::Iterable;
        for current in RecordStatus::iter() {
            for target in RecordStatus::iter() {
                let allowed = current.allowed_transitions().contains(&target);
                assert_eq!(current.can_transition_to(target), allowed);
            }
        }
        // 不允许跳级
        assert!(!RecordStatus::PendingShipment.can_transition_to(RecordStatus::Completed));
        assert!(!RecordStatus::PendingShipment.can_transition_to(RecordStatus::Confirmed));
        assert!(!RecordStatus::Confirmed.can_transition_to(RecordStatus::Completed));
    }
}
