use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{Gender, RecordStatus};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::wechat_login,
        handlers::auth::admin_register,
        handlers::auth::admin_login,
        handlers::user::update_profile,
        handlers::user::get_my_records,
        handlers::user::get_users,
        handlers::user::update_user_admin,
        handlers::wish::get_wishes,
        handlers::wish::create_wish,
        handlers::wish::update_wish,
        handlers::wish::delete_wish,
        handlers::wish::claim_wish,
        handlers::wish::batch_create_wishes,
        handlers::record::get_all_records,
        handlers::record::get_record_detail,
        handlers::record::update_record_status,
        handlers::record::update_shipping_info,
        handlers::upload::upload_image,
    ),
    components(
        schemas(
            Gender,
            RecordStatus,
            WechatLoginRequest,
            WechatLoginResponse,
            AdminRegisterRequest,
            AdminLoginRequest,
            AdminLoginResponse,
            UserResponse,
            AdminResponse,
            UpdateUserInfoRequest,
            UpdateUserAdminRequest,
            CreateWishRequest,
            UpdateWishRequest,
            BatchCreateWishRequest,
            BatchCreateWishItem,
            BatchCreateWishResponse,
            WishResponse,
            ClaimWishRequest,
            UpdateRecordStatusRequest,
            UpdateShippingInfoRequest,
            RecordResponse,
            RecordDetailResponse,
            ProgressItem,
            ProgressKind,
            PaginationInfo,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "登录与注册"),
        (name = "user", description = "用户"),
        (name = "wish", description = "心愿"),
        (name = "record", description = "认领记录"),
        (name = "upload", description = "文件上传")
    ),
    info(
        title = "心愿墙 API",
        description = "心愿墙公益项目API",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
