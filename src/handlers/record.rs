use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;

use crate::error::AppError;
use crate::handlers::current_user;
use crate::models::*;
use crate::services::RecordService;

#[utoipa::path(
    get,
    path = "/records",
    tag = "record",
    params(
        ("status" = Option<String>, Query, description = "状态过滤"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回认领记录列表"),
        (status = 403, description = "仅管理员可用")
    )
)]
pub async fn get_all_records(
    record_service: web::Data<RecordService>,
    req: HttpRequest,
    query: web::Query<RecordQuery>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };
    if !caller.is_admin() {
        return Ok(AppError::Forbidden.error_response());
    }

    match record_service.get_all_records(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/records/{id}",
    tag = "record",
    params(("id" = i64, Path, description = "记录ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回记录详情与进度时间线", body = RecordDetailResponse),
        (status = 403, description = "无权查看此记录"),
        (status = 404, description = "记录不存在")
    )
)]
pub async fn get_record_detail(
    record_service: web::Data<RecordService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };

    match record_service
        .get_record_detail(path.into_inner(), caller)
        .await
    {
        Ok(detail) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": detail
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/records/{id}/status",
    tag = "record",
    request_body = UpdateRecordStatusRequest,
    params(("id" = i64, Path, description = "记录ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回更新后的记录", body = RecordResponse),
        (status = 400, description = "缺少该阶段必填信息"),
        (status = 403, description = "无权操作此记录"),
        (status = 404, description = "记录不存在"),
        (status = 409, description = "状态转换不允许")
    )
)]
pub async fn update_record_status(
    record_service: web::Data<RecordService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateRecordStatusRequest>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };

    match record_service
        .update_record_status(path.into_inner(), caller, request.into_inner())
        .await
    {
        Ok(record) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": RecordResponse::from(record)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/records/{id}/shipping-info",
    tag = "record",
    request_body = UpdateShippingInfoRequest,
    params(("id" = i64, Path, description = "记录ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回更新后的记录", body = RecordResponse),
        (status = 403, description = "无权操作此记录"),
        (status = 404, description = "记录不存在")
    )
)]
pub async fn update_shipping_info(
    record_service: web::Data<RecordService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateShippingInfoRequest>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };

    match record_service
        .update_shipping_info(path.into_inner(), caller, request.into_inner())
        .await
    {
        Ok(record) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": RecordResponse::from(record)
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn record_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/records")
            .route("", web::get().to(get_all_records))
            .route("/{id}", web::get().to(get_record_detail))
            .route("/{id}/status", web::put().to(update_record_status))
            .route("/{id}/shipping-info", web::put().to(update_shipping_info)),
    );
}
