use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::error::AppError;
use crate::handlers::current_user;
use crate::models::*;
use crate::services::{RecordService, UserService};

#[utoipa::path(
    put,
    path = "/user/profile",
    tag = "user",
    request_body = UpdateUserInfoRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新用户资料成功", body = UserResponse),
        (status = 401, description = "未授权")
    )
)]
pub async fn update_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<UpdateUserInfoRequest>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };

    match user_service
        .update_user_info(caller.id, request.into_inner())
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/user/records",
    tag = "user",
    params(
        ("status" = Option<String>, Query, description = "状态过滤"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回当前用户的认领记录"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_my_records(
    record_service: web::Data<RecordService>,
    req: HttpRequest,
    query: web::Query<RecordQuery>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };

    match record_service
        .get_records_by_donor(caller.id, &query.into_inner())
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "user",
    params(
        ("is_admin" = Option<bool>, Query, description = "过滤管理员/普通用户"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回用户列表"),
        (status = 403, description = "仅管理员可用")
    )
)]
pub async fn get_users(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    query: web::Query<UserQuery>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };
    if !caller.is_admin() {
        return Ok(AppError::Forbidden.error_response());
    }

    match user_service.get_users(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/users/{id}/admin",
    tag = "user",
    request_body = UpdateUserAdminRequest,
    params(("id" = i64, Path, description = "用户ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "更新用户权限成功", body = UserResponse),
        (status = 403, description = "仅管理员可用"),
        (status = 404, description = "用户不存在")
    )
)]
pub async fn update_user_admin(
    user_service: web::Data<UserService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateUserAdminRequest>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };
    if !caller.is_admin() {
        return Ok(AppError::Forbidden.error_response());
    }

    match user_service
        .update_user_admin(path.into_inner(), request.is_admin)
        .await
    {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/profile", web::put().to(update_profile))
            .route("/records", web::get().to(get_my_records)),
    )
    .service(
        web::scope("/users")
            .route("", web::get().to(get_users))
            .route("/{id}/admin", web::put().to(update_user_admin)),
    );
}
