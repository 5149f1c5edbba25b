use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde_json::json;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};

use crate::entities::Gender;
use crate::error::{AppError, AppResult};
use crate::handlers::current_user;
use crate::models::*;
use crate::services::{RecordService, WishService};

#[utoipa::path(
    get,
    path = "/wishes",
    tag = "wish",
    params(
        ("content" = Option<String>, Query, description = "按心愿内容模糊搜索"),
        ("is_claimed" = Option<bool>, Query, description = "按认领状态过滤"),
        ("is_published" = Option<bool>, Query, description = "按公开状态过滤，不传为全部"),
        ("page" = Option<u32>, Query, description = "页码"),
        ("page_size" = Option<u32>, Query, description = "每页数量")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回心愿列表和分页信息"),
        (status = 401, description = "未授权")
    )
)]
pub async fn get_wishes(
    wish_service: web::Data<WishService>,
    query: web::Query<WishQuery>,
) -> Result<HttpResponse> {
    match wish_service.get_wishes(&query.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": response
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wishes",
    tag = "wish",
    request_body = CreateWishRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回创建的心愿", body = WishResponse),
        (status = 403, description = "仅管理员可用")
    )
)]
pub async fn create_wish(
    wish_service: web::Data<WishService>,
    req: HttpRequest,
    request: web::Json<CreateWishRequest>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };
    if !caller.is_admin() {
        return Ok(AppError::Forbidden.error_response());
    }

    match wish_service.create_wish(request.into_inner()).await {
        Ok(wish) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": wish
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/wishes/{id}",
    tag = "wish",
    request_body = UpdateWishRequest,
    params(("id" = i64, Path, description = "心愿ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回更新后的心愿", body = WishResponse),
        (status = 403, description = "仅管理员可用"),
        (status = 404, description = "心愿不存在")
    )
)]
pub async fn update_wish(
    wish_service: web::Data<WishService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<UpdateWishRequest>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };
    if !caller.is_admin() {
        return Ok(AppError::Forbidden.error_response());
    }

    match wish_service
        .update_wish(path.into_inner(), request.into_inner())
        .await
    {
        Ok(wish) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": wish
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/wishes/{id}",
    tag = "wish",
    params(("id" = i64, Path, description = "心愿ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "删除成功"),
        (status = 403, description = "仅管理员可用"),
        (status = 404, description = "心愿不存在")
    )
)]
pub async fn delete_wish(
    wish_service: web::Data<WishService>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };
    if !caller.is_admin() {
        return Ok(AppError::Forbidden.error_response());
    }

    match wish_service.delete_wish(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Wish deleted"
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/wishes/{id}/claim",
    tag = "wish",
    request_body = ClaimWishRequest,
    params(("id" = i64, Path, description = "心愿ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回创建的认领记录", body = RecordResponse),
        (status = 404, description = "心愿不存在"),
        (status = 409, description = "心愿已被认领")
    )
)]
pub async fn claim_wish(
    record_service: web::Data<RecordService>,
    req: HttpRequest,
    path: web::Path<i64>,
    request: web::Json<ClaimWishRequest>,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };
    // 点亮心愿是小程序用户的操作
    if caller.role != Role::User {
        return Ok(AppError::Forbidden.error_response());
    }

    match record_service
        .claim_wish(path.into_inner(), caller.id, request.into_inner())
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
    post,
    path = "/wishes/batch",
    tag = "wish",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "返回导入数量", body = BatchCreateWishResponse),
        (status = 400, description = "请求数据无效"),
        (status = 403, description = "仅管理员可用")
    )
)]
pub async fn batch_create_wishes(
    wish_service: web::Data<WishService>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let Some(caller) = current_user(&req) else {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    };
    if !caller.is_admin() {
        return Ok(AppError::Forbidden.error_response());
    }

    let content_type = req
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let items = if content_type.contains("application/json") {
        match serde_json::from_slice::<BatchCreateWishRequest>(&body) {
            Ok(request) => request.data,
            Err(_) => {
                return Ok(
                    AppError::ValidationError("Invalid JSON import payload".to_string())
                        .error_response(),
                )
            }
        }
    } else if content_type.contains("spreadsheet")
        || content_type.contains("ms-excel")
        || content_type.contains("octet-stream")
    {
        match parse_wish_workbook(&body) {
            Ok(items) => items,
            Err(e) => return Ok(e.error_response()),
        }
    } else {
        return Ok(AppError::ValidationError(
            "Unsupported Content-Type, expected application/json or an Excel upload".to_string(),
        )
        .error_response());
    };

    match wish_service.batch_create_wishes(items).await {
        Ok(imported) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": BatchCreateWishResponse { imported }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderKind {
    Name,
    Gender,
    Content,
    Reason,
}

/// 识别表头列，中英文列名都接受
fn header_column(cell: &str) -> Option<HeaderKind> {
    match cell.trim().to_lowercase().as_str() {
        "姓名" | "name" | "学生姓名" | "儿童姓名" | "childname" => Some(HeaderKind::Name),
        "性别" | "gender" | "sex" => Some(HeaderKind::Gender),
        "心愿" | "wish" | "愿望" | "心愿内容" | "content" | "wishcontent" => {
            Some(HeaderKind::Content)
        }
        "理由" | "原因" | "reason" | "wish reason" | "心愿理由" => Some(HeaderKind::Reason),
        _ => None,
    }
}

fn parse_gender(cell: &str) -> Option<Gender> {
    match cell.trim().to_lowercase().as_str() {
        "男" | "male" => Some(Gender::Male),
        "女" | "female" => Some(Gender::Female),
        _ => None,
    }
}

/// 从 Excel 工作簿解析心愿导入行。每个 sheet 独立定位表头，空行跳过。
fn parse_wish_workbook(bytes: &[u8]) -> AppResult<Vec<BatchCreateWishItem>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::ValidationError(format!("Failed to open workbook: {e}")))?;

    let sheet_names = workbook.sheet_names().to_owned();
    let mut items = Vec::new();

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| AppError::ValidationError(format!("Failed to read sheet: {e}")))?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            continue;
        };

        let mut name_col = None;
        let mut gender_col = None;
        let mut content_col = None;
        let mut reason_col = None;

        for (i, cell) in header_row.iter().enumerate() {
            if let Some(text) = cell.as_string() {
                match header_column(&text) {
                    Some(HeaderKind::Name) => name_col = Some(i),
                    Some(HeaderKind::Gender) => gender_col = Some(i),
                    Some(HeaderKind::Content) => content_col = Some(i),
                    Some(HeaderKind::Reason) => reason_col = Some(i),
                    None => {}
                }
            }
        }

        let (Some(name_col), Some(gender_col), Some(content_col), Some(reason_col)) =
            (name_col, gender_col, content_col, reason_col)
        else {
            return Err(AppError::ValidationError(format!(
                "Sheet '{sheet_name}' is missing required columns (name, gender, wish, reason)"
            )));
        };

        for row in rows {
            let cell_text = |col: usize| -> String {
                row.get(col)
                    .and_then(Data::as_string)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default()
            };

            let child_name = cell_text(name_col);
            let gender_text = cell_text(gender_col);
            let content = cell_text(content_col);
            let reason = cell_text(reason_col);

            // 跳过空行和不完整的行
            if child_name.is_empty() || gender_text.is_empty() || content.is_empty() {
                continue;
            }

            let Some(gender) = parse_gender(&gender_text) else {
                continue;
            };

            items.push(BatchCreateWishItem {
                child_name,
                gender,
                content,
                reason,
                grade: None,
                photo_url: None,
            });
        }
    }

    if items.is_empty() {
        return Err(AppError::ValidationError(
            "No valid wish rows found in the workbook".to_string(),
        ));
    }

    Ok(items)
}

pub fn wish_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/wishes")
            .route("", web::get().to(get_wishes))
            .route("", web::post().to(create_wish))
            .route("/batch", web::post().to(batch_create_wishes))
            .route("/{id}", web::put().to(update_wish))
            .route("/{id}", web::delete().to(delete_wish))
            .route("/{id}/claim", web::post().to(claim_wish)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_column_synonyms() {
        assert_eq!(header_column("姓名"), Some(HeaderKind::Name));
        assert_eq!(header_column(" Name "), Some(HeaderKind::Name));
        assert_eq!(header_column("儿童姓名"), Some(HeaderKind::Name));
        assert_eq!(header_column("性别"), Some(HeaderKind::Gender));
        assert_eq!(header_column("SEX"), Some(HeaderKind::Gender));
        assert_eq!(header_column("心愿内容"), Some(HeaderKind::Content));
        assert_eq!(header_column("wish"), Some(HeaderKind::Content));
        assert_eq!(header_column("心愿理由"), Some(HeaderKind::Reason));
        assert_eq!(header_column("备注"), None);
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender("男"), Some(Gender::Male));
        assert_eq!(parse_gender("Male"), Some(Gender::Male));
        assert_eq!(parse_gender("女"), Some(Gender::Female));
        assert_eq!(parse_gender("female "), Some(Gender::Female));
        assert_eq!(parse_gender("未知"), None);
    }
}
