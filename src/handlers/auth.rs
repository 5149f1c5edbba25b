use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::models::*;
use crate::services::AuthService;

#[utoipa::path(
    post,
    path = "/auth/wechat/login",
    tag = "auth",
    request_body = WechatLoginRequest,
    responses(
        (status = 200, description = "登录成功", body = WechatLoginResponse),
        (status = 502, description = "微信登录失败")
    )
)]
pub async fn wechat_login(
    auth_service: web::Data<AuthService>,
    request: web::Json<WechatLoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.wechat_login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/admin/register",
    tag = "auth",
    request_body = AdminRegisterRequest,
    responses(
        (status = 200, description = "注册成功", body = AdminResponse),
        (status = 400, description = "请求参数错误")
    )
)]
pub async fn admin_register(
    auth_service: web::Data<AuthService>,
    request: web::Json<AdminRegisterRequest>,
) -> Result<HttpResponse> {
    match auth_service.admin_register(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/admin/login",
    tag = "auth",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "登录成功", body = AdminLoginResponse),
        (status = 401, description = "用户名或密码错误")
    )
)]
pub async fn admin_login(
    auth_service: web::Data<AuthService>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.admin_login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/wechat/login", web::post().to(wechat_login))
            .route("/admin/register", web::post().to(admin_register))
            .route("/admin/login", web::post().to(admin_login)),
    );
}
