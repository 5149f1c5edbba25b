use crate::config::WechatConfig;
use crate::error::{AppError, AppResult};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Code2SessionResponse {
    #[serde(default)]
    pub openid: String,
    #[serde(default)]
    pub session_key: String,
    #[serde(default)]
    pub unionid: Option<String>,
    #[serde(default)]
    pub errcode: i32,
    #[serde(default)]
    pub errmsg: String,
}

#[derive(Clone)]
pub struct WechatService {
    client: Client,
    config: WechatConfig,
}

impl WechatService {
    pub fn new(config: WechatConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// 用小程序临时登录凭证换取 openid/session_key
    pub async fn code_to_session(&self, code: &str) -> AppResult<Code2SessionResponse> {
        let url = "https://api.weixin.qq.com/sns/jscode2session";

        let response = self
            .client
            .get(url)
            .query(&[
                ("appid", self.config.app_id.as_str()),
                ("secret", self.config.app_secret.as_str()),
                ("js_code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let session: Code2SessionResponse = response.json().await?;

        if session.errcode != 0 {
            log::warn!(
                "WeChat code2session failed: errcode={}, errmsg={}",
                session.errcode,
                session.errmsg
            );
            return Err(AppError::ExternalApiError(format!(
                "WeChat login failed: {}",
                session.errmsg
            )));
        }

        if session.openid.is_empty() {
            return Err(AppError::ExternalApiError(
                "WeChat login failed: empty openid".to_string(),
            ));
        }

        Ok(session)
    }
}
