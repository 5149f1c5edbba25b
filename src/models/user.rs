use crate::entities::{admins, users, wish_records};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 调用方角色，来自 JWT claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// 已认证主体，由认证中间件写入请求扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub role: Role,
}

impl AuthenticatedUser {
    /// 记录访问权限的唯一判定：管理员放行，普通用户仅限本人的记录
    pub fn can_access_record(&self, record: &wish_records::Model) -> bool {
        match self.role {
            Role::Admin => true,
            Role::User => record.donor_id == self.id,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WechatLoginRequest {
    /// 小程序 wx.login 返回的临时凭证
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WechatLoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminRegisterRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: AdminResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserInfoRequest {
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserAdminRequest {
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UserQuery {
    /// 过滤管理员/普通用户，不传为全部
    pub is_admin: Option<bool>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub wechat_openid: String,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub is_admin: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            wechat_openid: user.wechat_openid,
            nickname: user.nickname,
            avatar_url: user.avatar_url,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminResponse {
    pub id: i64,
    pub username: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<admins::Model> for AdminResponse {
    fn from(admin: admins::Model) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            created_at: admin.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RecordStatus;

    fn record(donor_id: i64) -> wish_records::Model {
        wish_records::Model {
            id: 1,
            status: RecordStatus::PendingShipment,
            wish_id: 1,
            donor_id,
            donor_name: "Ann".to_string(),
            donor_mobile: "123".to_string(),
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
            created_at: None,
            updated_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn test_admin_can_access_any_record() {
        let admin = AuthenticatedUser {
            id: 99,
            role: Role::Admin,
        };
        assert!(admin.can_access_record(&record(1)));
        assert!(admin.can_access_record(&record(99)));
    }

    #[test]
    fn test_user_can_only_access_own_record() {
        let user = AuthenticatedUser {
            id: 5,
            role: Role::User,
        };
        assert!(user.can_access_record(&record(5)));
        assert!(!user.can_access_record(&record(6)));
    }

    #[test]
    fn test_role_parse_round_trip() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse(Role::Admin.as_str()), Some(Role::Admin));
    }
}
