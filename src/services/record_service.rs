use crate::entities::{
    user_entity as users, wish_entity as wishes, wish_record_entity as records, RecordStatus,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct RecordService {
    pool: DatabaseConnection,
}

impl RecordService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 点亮心愿：在一个事务内创建认领记录并回写 wish.active_record_id。
    /// 写回带 `active_record_id IS NULL` 条件，并发认领只有一个会成功。
    pub async fn claim_wish(
        &self,
        wish_id: i64,
        donor_id: i64,
        req: ClaimWishRequest,
    ) -> AppResult<records::Model> {
        if req.donor_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Donor name is required".to_string(),
            ));
        }
        if req.donor_address.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Donor address is required".to_string(),
            ));
        }
        // 联系方式原样快照，不做格式校验
        if req.donor_mobile.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Donor mobile is required".to_string(),
            ));
        }

        let donor = users::Entity::find_by_id(donor_id)
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let txn = self.pool.begin().await?;

        let wish = wishes::Entity::find_by_id(wish_id)
            .filter(wishes::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Wish not found".to_string()))?;

        // 未公开的心愿对捐赠者不可见
        if !wish.is_published {
            return Err(AppError::NotFound("Wish not found".to_string()));
        }
        if wish.active_record_id.is_some() {
            return Err(AppError::AlreadyClaimed);
        }

        let now = Utc::now();
        let record = records::ActiveModel {
            status: Set(RecordStatus::PendingShipment),
            wish_id: Set(wish.id),
            donor_id: Set(donor.id),
            donor_name: Set(req.donor_name),
            donor_mobile: Set(req.donor_mobile),
            donor_address: Set(req.donor_address),
            donor_comment: Set(req.donor_comment),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let result = wishes::Entity::update_many()
            .col_expr(wishes::Column::ActiveRecordId, Expr::value(record.id))
            .col_expr(wishes::Column::UpdatedAt, Expr::value(now))
            .filter(wishes::Column::Id.eq(wish.id))
            .filter(wishes::Column::ActiveRecordId.is_null())
            .exec(&txn)
            .await?;

        // 读检查与写回之间被并发认领抢先，整个事务回滚
        if result.rows_affected == 0 {
            return Err(AppError::AlreadyClaimed);
        }

        txn.commit().await?;

        log::info!(
            "Wish {} claimed by user {} (record {})",
            wish.id,
            donor.id,
            record.id
        );

        Ok(record)
    }

    /// 推进记录状态。状态校验、阶段字段校验与写入在同一事务内完成，
    /// 任一校验失败记录保持原样。
    pub async fn update_record_status(
        &self,
        record_id: i64,
        caller: AuthenticatedUser,
        req: UpdateRecordStatusRequest,
    ) -> AppResult<records::Model> {
        let txn = self.pool.begin().await?;

        let record = records::Entity::find_by_id(record_id)
            .filter(records::Column::DeletedAt.is_null())
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

        if !caller.can_access_record(&record) {
            return Err(AppError::Forbidden);
        }

        let current = record.status;
        let target = req.status;

        if !current.can_transition_to(target) {
            return Err(AppError::InvalidTransition(format!(
                "cannot transition from {current} to {target}"
            )));
        }

        let now = Utc::now();
        let patch = stage_patch(&record, target, &req, now)?;

        let mut am = records::ActiveModel {
            status: Set(target),
            updated_at: Set(Some(now)),
            ..Default::default()
        };
        patch.apply(&mut am);

        // 以读取时的状态为提交条件，状态被并发修改则拒绝而非覆盖
        let result = records::Entity::update_many()
            .set(am)
            .filter(records::Column::Id.eq(record.id))
            .filter(records::Column::Status.eq(current))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::InvalidTransition(
                "record status changed concurrently".to_string(),
            ));
        }

        txn.commit().await?;

        log::info!("Record {record_id} transitioned {current} -> {target}");

        let updated = records::Entity::find_by_id(record_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

        Ok(updated)
    }

    /// 仅修正收件快照，不触碰状态与阶段字段
    pub async fn update_shipping_info(
        &self,
        record_id: i64,
        caller: AuthenticatedUser,
        req: UpdateShippingInfoRequest,
    ) -> AppResult<records::Model> {
        if req.donor_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Donor name is required".to_string(),
            ));
        }
        if req.donor_address.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Donor address is required".to_string(),
            ));
        }
        if req.donor_mobile.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Donor mobile is required".to_string(),
            ));
        }

        let record = records::Entity::find_by_id(record_id)
            .filter(records::Column::DeletedAt.is_null())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

        if !caller.can_access_record(&record) {
            return Err(AppError::Forbidden);
        }

        let mut am: records::ActiveModel = records::ActiveModel {
            id: Set(record.id),
            ..Default::default()
        };
        am.donor_name = Set(req.donor_name);
        am.donor_mobile = Set(req.donor_mobile);
        am.donor_address = Set(req.donor_address);
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        Ok(updated)
    }

    /// 记录详情与进度时间线，仅管理员或记录捐赠者本人可见
    pub async fn get_record_detail(
        &self,
        record_id: i64,
        caller: AuthenticatedUser,
    ) -> AppResult<RecordDetailResponse> {
        let record = records::Entity::find_by_id(record_id)
            .filter(records::Column::DeletedAt.is_null())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Record not found".to_string()))?;

        if !caller.can_access_record(&record) {
            return Err(AppError::Forbidden);
        }

        // 心愿即使之后被删除，历史记录详情仍可查看
        let wish = wishes::Entity::find_by_id(record.wish_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Wish not found".to_string()))?;

        let progress = build_progress(&record);

        Ok(RecordDetailResponse {
            id: record.id,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
            progress,
            child_name: wish.child_name,
            wish_content: wish.content,
            wish_reason: wish.reason,
            claimed_at: record.created_at,
            donor_name: record.donor_name,
            donor_mobile: record.donor_mobile,
            donor_address: record.donor_address,
        })
    }

    /// 后台：全部认领记录，支持状态过滤
    pub async fn get_all_records(
        &self,
        query: &RecordQuery,
    ) -> AppResult<PaginatedResponse<RecordResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut finder = records::Entity::find().filter(records::Column::DeletedAt.is_null());
        if let Some(status) = query.status {
            finder = finder.filter(records::Column::Status.eq(status));
        }

        let total = finder.clone().count(&self.pool).await?;

        let items = finder
            .order_by_desc(records::Column::CreatedAt)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?
            .into_iter()
            .map(RecordResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// 小程序：当前用户的认领记录
    pub async fn get_records_by_donor(
        &self,
        donor_id: i64,
        query: &RecordQuery,
    ) -> AppResult<PaginatedResponse<RecordResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut finder = records::Entity::find()
            .filter(records::Column::DeletedAt.is_null())
            .filter(records::Column::DonorId.eq(donor_id));
        if let Some(status) = query.status {
            finder = finder.filter(records::Column::Status.eq(status));
        }

        let total = finder.clone().count(&self.pool).await?;

        let items = finder
            .order_by_desc(records::Column::CreatedAt)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?
            .into_iter()
            .map(RecordResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }
}

/// 单个状态转换需要写入的阶段字段。先完整计算、后一次性落库，
/// 校验失败时不产生任何部分写入。
#[derive(Debug, Default, PartialEq)]
struct StagePatch {
    shipping_number: Option<String>,
    shipping_time: Option<DateTime<Utc>>,
    confirmation_message: Option<String>,
    confirmation_photos: Option<String>,
    confirmation_time: Option<DateTime<Utc>>,
    delivery_number: Option<String>,
    delivery_time: Option<DateTime<Utc>>,
    receipt_message: Option<String>,
    receipt_photos: Option<String>,
    receipt_time: Option<DateTime<Utc>>,
    platform_gift_message: Option<String>,
    platform_gift_photos: Option<String>,
    platform_gift_time: Option<DateTime<Utc>>,
    owner_gift_message: Option<String>,
    owner_gift_photos: Option<String>,
    owner_gift_time: Option<DateTime<Utc>>,
    cancellation_time: Option<DateTime<Utc>>,
}

impl StagePatch {
    fn apply(self, am: &mut records::ActiveModel) {
        if let Some(v) = self.shipping_number {
            am.shipping_number = Set(Some(v));
        }
        if let Some(v) = self.shipping_time {
            am.shipping_time = Set(Some(v));
        }
        if let Some(v) = self.confirmation_message {
            am.confirmation_message = Set(Some(v));
        }
        if let Some(v) = self.confirmation_photos {
            am.confirmation_photos = Set(Some(v));
        }
        if let Some(v) = self.confirmation_time {
            am.confirmation_time = Set(Some(v));
        }
        if let Some(v) = self.delivery_number {
            am.delivery_number = Set(Some(v));
        }
        if let Some(v) = self.delivery_time {
            am.delivery_time = Set(Some(v));
        }
        if let Some(v) = self.receipt_message {
            am.receipt_message = Set(Some(v));
        }
        if let Some(v) = self.receipt_photos {
            am.receipt_photos = Set(Some(v));
        }
        if let Some(v) = self.receipt_time {
            am.receipt_time = Set(Some(v));
        }
        if let Some(v) = self.platform_gift_message {
            am.platform_gift_message = Set(Some(v));
        }
        if let Some(v) = self.platform_gift_photos {
            am.platform_gift_photos = Set(Some(v));
        }
        if let Some(v) = self.platform_gift_time {
            am.platform_gift_time = Set(Some(v));
        }
        if let Some(v) = self.owner_gift_message {
            am.owner_gift_message = Set(Some(v));
        }
        if let Some(v) = self.owner_gift_photos {
            am.owner_gift_photos = Set(Some(v));
        }
        if let Some(v) = self.owner_gift_time {
            am.owner_gift_time = Set(Some(v));
        }
        if let Some(v) = self.cancellation_time {
            am.cancellation_time = Set(Some(v));
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 按目标状态计算阶段字段写入。必填项缺失返回 ValidationError。
fn stage_patch(
    record: &records::Model,
    target: RecordStatus,
    req: &UpdateRecordStatusRequest,
    now: DateTime<Utc>,
) -> AppResult<StagePatch> {
    let mut patch = StagePatch::default();

    match target {
        RecordStatus::PendingConfirmation => {
            let number = non_empty(&req.shipping_number).ok_or_else(|| {
                AppError::ValidationError(
                    "A shipping tracking number is required to enter pending_confirmation"
                        .to_string(),
                )
            })?;
            patch.shipping_number = Some(number);
            patch.shipping_time = Some(now);
        }
        RecordStatus::Confirmed => {
            patch.confirmation_message = non_empty(&req.confirmation_message);
            patch.confirmation_photos = non_empty(&req.confirmation_photos);
            patch.confirmation_time = Some(now);
        }
        RecordStatus::AwaitingReceipt => {
            let number = non_empty(&req.delivery_number).ok_or_else(|| {
                AppError::ValidationError(
                    "A delivery tracking number is required to enter awaiting_receipt".to_string(),
                )
            })?;
            patch.delivery_number = Some(number);
            patch.delivery_time = Some(now);
        }
        RecordStatus::Completed => {
            patch.receipt_message = non_empty(&req.receipt_message);
            patch.receipt_photos = non_empty(&req.receipt_photos);
            patch.receipt_time = Some(now);
        }
        RecordStatus::GiftReturned => {
            patch.platform_gift_message = non_empty(&req.platform_gift_message);
            patch.platform_gift_photos = non_empty(&req.platform_gift_photos);
            // 时间戳只在字段首次出现内容时落一次，后续更新不再覆盖
            if record.platform_gift_time.is_none()
                && (patch.platform_gift_message.is_some() || patch.platform_gift_photos.is_some())
            {
                patch.platform_gift_time = Some(now);
            }

            patch.owner_gift_message = non_empty(&req.owner_gift_message);
            patch.owner_gift_photos = non_empty(&req.owner_gift_photos);
            if record.owner_gift_time.is_none()
                && (patch.owner_gift_message.is_some() || patch.owner_gift_photos.is_some())
            {
                patch.owner_gift_time = Some(now);
            }
        }
        RecordStatus::Cancelled => {
            patch.cancellation_time = Some(now);
        }
        RecordStatus::PendingShipment => {
            // 初始状态只能由认领创建产生
            return Err(AppError::InvalidTransition(
                "pending_shipment is not a transition target".to_string(),
            ));
        }
    }

    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn record(status: RecordStatus) -> records::Model {
        records::Model {
            id: 1,
            status,
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

    fn request(status: RecordStatus) -> UpdateRecordStatusRequest {
        UpdateRecordStatusRequest {
            status,
            shipping_number: None,
            confirmation_message: None,
            confirmation_photos: None,
            delivery_number: None,
            receipt_message: None,
            receipt_photos: None,
            platform_gift_message: None,
            platform_gift_photos: None,
            owner_gift_message: None,
            owner_gift_photos: None,
        }
    }

    #[test]
    fn test_shipping_requires_tracking_number() {
        let r = record(RecordStatus::PendingShipment);
        let req = request(RecordStatus::PendingConfirmation);
        let err = stage_patch(&r, RecordStatus::PendingConfirmation, &req, ts(2000));
        assert!(matches!(err, Err(AppError::ValidationError(_))));

        // 空白单号同样拒绝
        let mut req = request(RecordStatus::PendingConfirmation);
        req.shipping_number = Some("   ".to_string());
        let err = stage_patch(&r, RecordStatus::PendingConfirmation, &req, ts(2000));
        assert!(matches!(err, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_shipping_patch_sets_number_and_time() {
        let r = record(RecordStatus::PendingShipment);
        let mut req = request(RecordStatus::PendingConfirmation);
        req.shipping_number = Some("SF100".to_string());

        let patch = stage_patch(&r, RecordStatus::PendingConfirmation, &req, ts(2000)).unwrap();
        assert_eq!(patch.shipping_number.as_deref(), Some("SF100"));
        assert_eq!(patch.shipping_time, Some(ts(2000)));
        // 其他阶段字段不受影响
        assert_eq!(patch.confirmation_time, None);
        assert_eq!(patch.cancellation_time, None);
    }

    #[test]
    fn test_confirmation_fields_optional_but_time_always_stamped() {
        let r = record(RecordStatus::PendingConfirmation);
        let req = request(RecordStatus::Confirmed);
        let patch = stage_patch(&r, RecordStatus::Confirmed, &req, ts(3000)).unwrap();
        assert_eq!(patch.confirmation_message, None);
        assert_eq!(patch.confirmation_photos, None);
        assert_eq!(patch.confirmation_time, Some(ts(3000)));

        let mut req = request(RecordStatus::Confirmed);
        req.confirmation_message = Some("已确认".to_string());
        let patch = stage_patch(&r, RecordStatus::Confirmed, &req, ts(3000)).unwrap();
        assert_eq!(patch.confirmation_message.as_deref(), Some("已确认"));
    }

    #[test]
    fn test_delivery_requires_tracking_number() {
        let r = record(RecordStatus::Confirmed);
        let req = request(RecordStatus::AwaitingReceipt);
        assert!(matches!(
            stage_patch(&r, RecordStatus::AwaitingReceipt, &req, ts(4000)),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_gift_return_stamps_each_side_once() {
        // 第一次：只有平台留言
        let r = record(RecordStatus::Completed);
        let mut req = request(RecordStatus::GiftReturned);
        req.platform_gift_message = Some("平台回礼".to_string());
        let patch = stage_patch(&r, RecordStatus::GiftReturned, &req, ts(5000)).unwrap();
        assert_eq!(patch.platform_gift_time, Some(ts(5000)));
        assert_eq!(patch.owner_gift_time, None);

        // 第二次：平台时间已落库，只补主人留言；平台时间不得重盖
        let mut r2 = record(RecordStatus::GiftReturned);
        r2.platform_gift_message = Some("平台回礼".to_string());
        r2.platform_gift_time = Some(ts(5000));
        let mut req2 = request(RecordStatus::GiftReturned);
        req2.owner_gift_message = Some("主人回礼".to_string());
        let patch2 = stage_patch(&r2, RecordStatus::GiftReturned, &req2, ts(6000)).unwrap();
        assert_eq!(patch2.platform_gift_time, None);
        assert_eq!(patch2.owner_gift_time, Some(ts(6000)));
    }

    #[test]
    fn test_gift_return_photos_alone_stamp_time() {
        let r = record(RecordStatus::Completed);
        let mut req = request(RecordStatus::GiftReturned);
        req.owner_gift_photos = Some("photos/a.jpg".to_string());
        let patch = stage_patch(&r, RecordStatus::GiftReturned, &req, ts(5000)).unwrap();
        assert_eq!(patch.owner_gift_time, Some(ts(5000)));
        assert_eq!(patch.platform_gift_time, None);
    }

    #[test]
    fn test_cancellation_only_stamps_cancellation_time() {
        let r = record(RecordStatus::PendingShipment);
        let req = request(RecordStatus::Cancelled);
        let patch = stage_patch(&r, RecordStatus::Cancelled, &req, ts(2000)).unwrap();
        assert_eq!(
            patch,
            StagePatch {
                cancellation_time: Some(ts(2000)),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_pending_shipment_is_not_a_target() {
        let r = record(RecordStatus::PendingShipment);
        let req = request(RecordStatus::PendingShipment);
        assert!(matches!(
            stage_patch(&r, RecordStatus::PendingShipment, &req, ts(2000)),
            Err(AppError::InvalidTransition(_))
        ));
    }
}
