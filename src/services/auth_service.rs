use crate::entities::{admin_entity as admins, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::WechatService;
use crate::models::*;
use crate::utils::{hash_password, validate_password, verify_password, JwtService};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    wechat_service: WechatService,
}

impl AuthService {
    pub fn new(
        pool: DatabaseConnection,
        jwt_service: JwtService,
        wechat_service: WechatService,
    ) -> Self {
        Self {
            pool,
            jwt_service,
            wechat_service,
        }
    }

    /// 微信小程序登录：code 换 openid，按 openid 找用户，不存在则创建
    pub async fn wechat_login(&self, req: WechatLoginRequest) -> AppResult<WechatLoginResponse> {
        let session = self.wechat_service.code_to_session(&req.code).await?;

        let existing = users::Entity::find()
            .filter(users::Column::WechatOpenid.eq(session.openid.clone()))
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.pool)
            .await?;

        let user = match existing {
            Some(user) => user,
            None => {
                let now = Utc::now();
                let user = users::ActiveModel {
                    wechat_openid: Set(session.openid.clone()),
                    wechat_unionid: Set(session.unionid.clone()),
                    is_admin: Set(false),
                    created_at: Set(Some(now)),
                    updated_at: Set(Some(now)),
                    ..Default::default()
                }
                .insert(&self.pool)
                .await?;
                log::info!("Created user {} for new WeChat openid", user.id);
                user
            }
        };

        // 带管理员标记的用户签发 admin 角色令牌
        let role = if user.is_admin { Role::Admin } else { Role::User };
        let token = self.jwt_service.generate_token(user.id, role)?;

        Ok(WechatLoginResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    pub async fn admin_register(&self, req: AdminRegisterRequest) -> AppResult<AdminResponse> {
        if req.username.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Username is required".to_string(),
            ));
        }
        validate_password(&req.password)?;

        let existing = admins::Entity::find()
            .filter(admins::Column::Username.eq(req.username.clone()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Admin username already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let admin = admins::ActiveModel {
            username: Set(req.username),
            password_hash: Set(hash_password(&req.password)?),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Registered admin {} ({})", admin.username, admin.id);
        Ok(AdminResponse::from(admin))
    }

    pub async fn admin_login(&self, req: AdminLoginRequest) -> AppResult<AdminLoginResponse> {
        let admin = admins::Entity::find()
            .filter(admins::Column::Username.eq(req.username.clone()))
            .filter(admins::Column::DeletedAt.is_null())
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

        if !verify_password(&req.password, &admin.password_hash)? {
            return Err(AppError::AuthError(
                "Invalid username or password".to_string(),
            ));
        }

        let token = self.jwt_service.generate_token(admin.id, Role::Admin)?;

        Ok(AdminLoginResponse {
            token,
            admin: AdminResponse::from(admin),
        })
    }
}
