use actix_web::{web, HttpRequest, HttpResponse, ResponseError, Result};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::external::StorageService;
use crate::handlers::current_user;

const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadQuery {
    /// 存储目录，例如 images/avatar
    pub directory: Option<String>,
}

fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[utoipa::path(
    post,
    path = "/upload/image",
    tag = "upload",
    params(
        ("directory" = Option<String>, Query, description = "存储目录，默认 images")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "上传成功，返回图片URL"),
        (status = 400, description = "文件类型或大小不符合要求"),
        (status = 401, description = "未授权"),
        (status = 502, description = "对象存储上传失败")
    )
)]
pub async fn upload_image(
    storage_service: web::Data<StorageService>,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    if current_user(&req).is_none() {
        return Ok(AppError::AuthError("Not authenticated".to_string()).error_response());
    }

    let content_type = req
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let Some(extension) = image_extension(&content_type) else {
        return Ok(AppError::ValidationError(
            "Only JPG, PNG, GIF or WEBP images are supported".to_string(),
        )
        .error_response());
    };

    if body.is_empty() {
        return Ok(
            AppError::ValidationError("Image body must not be empty".to_string()).error_response(),
        );
    }
    if body.len() > MAX_IMAGE_SIZE {
        return Ok(
            AppError::ValidationError("Image must not exceed 5MB".to_string()).error_response(),
        );
    }

    let directory = query
        .into_inner()
        .directory
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| "images".to_string());

    match storage_service
        .upload_image(body.to_vec(), &content_type, &directory, extension)
        .await
    {
        Ok(url) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": { "url": url }
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn upload_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/upload").route("/image", web::post().to(upload_image)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/jpeg"), Some("jpg"));
        assert_eq!(image_extension("image/png"), Some("png"));
        assert_eq!(image_extension("image/webp"), Some("webp"));
        assert_eq!(image_extension("application/pdf"), None);
        assert_eq!(image_extension(""), None);
    }
}
