use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn get_user_by_id(&self, id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(id)
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// 后台：用户列表，可按管理员标记过滤
    pub async fn get_users(&self, query: &UserQuery) -> AppResult<PaginatedResponse<UserResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);

        let mut finder = users::Entity::find().filter(users::Column::DeletedAt.is_null());
        if let Some(is_admin) = query.is_admin {
            finder = finder.filter(users::Column::IsAdmin.eq(is_admin));
        }

        let total = finder.clone().count(&self.pool).await?;

        let items = finder
            .order_by_desc(users::Column::CreatedAt)
            .offset(params.get_offset())
            .limit(params.get_limit())
            .all(&self.pool)
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    /// 设置或取消用户的管理员标记
    pub async fn update_user_admin(&self, user_id: i64, is_admin: bool) -> AppResult<UserResponse> {
        let user = self.get_user_by_id(user_id).await?;

        let mut am = user.into_active_model();
        am.is_admin = Set(is_admin);
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        log::info!("User {user_id} admin flag set to {is_admin}");
        Ok(UserResponse::from(updated))
    }

    /// 更新微信昵称/头像
    pub async fn update_user_info(
        &self,
        user_id: i64,
        req: UpdateUserInfoRequest,
    ) -> AppResult<UserResponse> {
        let user = self.get_user_by_id(user_id).await?;

        let mut am = user.into_active_model();
        if let Some(nickname) = req.nickname {
            am.nickname = Set(Some(nickname));
        }
        if let Some(avatar_url) = req.avatar_url {
            am.avatar_url = Set(Some(avatar_url));
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        Ok(UserResponse::from(updated))
    }
}
