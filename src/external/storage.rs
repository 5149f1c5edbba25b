use crate::config::StorageConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use uuid::Uuid;

#[derive(Clone)]
pub struct StorageService {
    client: Client,
    config: StorageConfig,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// 上传图片字节流，返回对外访问 URL。
    /// 对象键为 `{directory}/{uuid}.{ext}`，业务侧只保存返回的 URL 字符串。
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        content_type: &str,
        directory: &str,
        extension: &str,
    ) -> AppResult<String> {
        let object_key = format!("{}/{}.{}", directory, Uuid::new_v4(), extension);
        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), object_key);

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.config.access_token)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Object storage upload failed: {error_text}");
            return Err(AppError::ExternalApiError(format!(
                "Upload failed: {error_text}"
            )));
        }

        let file_url = match &self.config.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), object_key),
            None => url,
        };

        Ok(file_url)
    }

    pub async fn delete_image(&self, object_key: &str) -> AppResult<()> {
        let url = format!("{}/{}", self.config.endpoint.trim_end_matches('/'), object_key);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Delete failed: {error_text}"
            )));
        }

        Ok(())
    }
}
