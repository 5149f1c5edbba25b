use crate::entities::wish_entity as wishes;
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

#[derive(Clone)]
pub struct WishService {
    pool: DatabaseConnection,
}

impl WishService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 心愿列表：内容模糊搜索、认领状态（由 active_record_id 推导）、公开状态过滤
    pub async fn get_wishes(&self, query: &WishQuery) -> AppResult<PaginatedResponse<WishResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut finder = wishes::Entity::find().filter(wishes::Column::DeletedAt.is_null());

        if let Some(content) = query.content.as_deref().filter(|c| !c.is_empty()) {
            finder = finder.filter(wishes::Column::Content.contains(content));
        }
        if let Some(is_claimed) = query.is_claimed {
            finder = if is_claimed {
                finder.filter(wishes::Column::ActiveRecordId.is_not_null())
            } else {
                finder.filter(wishes::Column::ActiveRecordId.is_null())
            };
        }
        if let Some(is_published) = query.is_published {
            finder = finder.filter(wishes::Column::IsPublished.eq(is_published));
        }

        let total = finder.clone().count(&self.pool).await?;

        let items = finder
            .order_by_desc(wishes::Column::CreatedAt)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?
            .into_iter()
            .map(WishResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    pub async fn create_wish(&self, req: CreateWishRequest) -> AppResult<WishResponse> {
        if req.child_name.trim().is_empty() || req.content.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Child name and wish content are required".to_string(),
            ));
        }

        let now = Utc::now();
        let wish = wishes::ActiveModel {
            child_name: Set(req.child_name),
            gender: Set(req.gender),
            content: Set(req.content),
            reason: Set(req.reason),
            grade: Set(req.grade),
            photo_url: Set(req.photo_url),
            is_published: Set(req.is_published),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(WishResponse::from(wish))
    }

    pub async fn get_wish(&self, id: i64) -> AppResult<wishes::Model> {
        wishes::Entity::find_by_id(id)
            .filter(wishes::Column::DeletedAt.is_null())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Wish not found".to_string()))
    }

    pub async fn update_wish(&self, id: i64, req: UpdateWishRequest) -> AppResult<WishResponse> {
        let wish = self.get_wish(id).await?;

        let mut am = wish.into_active_model();
        am.child_name = Set(req.child_name);
        am.gender = Set(req.gender);
        am.content = Set(req.content);
        am.reason = Set(req.reason);
        am.grade = Set(req.grade);
        am.photo_url = Set(req.photo_url);
        am.is_published = Set(req.is_published);
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        Ok(WishResponse::from(updated))
    }

    /// 逻辑删除。删除与认领状态无关，已认领的心愿同样可删。
    pub async fn delete_wish(&self, id: i64) -> AppResult<()> {
        let wish = self.get_wish(id).await?;

        let mut am = wish.into_active_model();
        am.deleted_at = Set(Some(Utc::now()));
        am.update(&self.pool).await?;

        Ok(())
    }

    /// 批量导入，整批同一事务
    pub async fn batch_create_wishes(&self, items: Vec<BatchCreateWishItem>) -> AppResult<usize> {
        if items.is_empty() {
            return Err(AppError::ValidationError(
                "Import list must not be empty".to_string(),
            ));
        }

        let txn = self.pool.begin().await?;
        let now = Utc::now();
        let count = items.len();

        for item in items {
            wishes::ActiveModel {
                child_name: Set(item.child_name),
                gender: Set(item.gender),
                content: Set(item.content),
                reason: Set(item.reason),
                grade: Set(item.grade),
                photo_url: Set(item.photo_url),
                // 批量导入默认直接公开
                is_published: Set(true),
                created_at: Set(Some(now)),
                updated_at: Set(Some(now)),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        log::info!("Batch imported {count} wishes");
        Ok(count)
    }
}
