use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::warn;

use crate::formatting::FormattedMessage;

/// Friends default-send endpoint (requires receiver UUIDs).
pub const DEFAULT_API_URL: &str = "https://kapi.kakao.com/v2/api/talk/message/default/send";
/// Self-memo endpoint; works without a business channel.
pub const DEFAULT_MEMO_API_URL: &str = "https://kapi.kakao.com/v2/api/talk/memo/default/send";

/// KakaoTalk REST API sender.
///
/// Returns Ok(true) on accepted delivery, Ok(false) when the API rejects the
/// request (non-2xx), Err only for transport-level failures.
pub struct KakaoSender {
    api_url: String,
    memo_api_url: String,
    access_token: String,
    timeout: Duration,
}

impl KakaoSender {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            memo_api_url: DEFAULT_MEMO_API_URL.to_string(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_endpoints(
        mut self,
        api_url: impl Into<String>,
        memo_api_url: impl Into<String>,
    ) -> Self {
        self.api_url = api_url.into();
        self.memo_api_url = memo_api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }

    /// Sends one message to the given receiver UUIDs via the template send API.
    pub async fn send_message(
        &self,
        message: &FormattedMessage,
        receiver_uuids: &[String],
    ) -> Result<bool> {
        let template_args = serde_json::to_string(&json!({
            "title": message.title,
            "content": message.content,
        }))
        .context("failed to encode template args")?;
        let receiver_uuids =
            serde_json::to_string(receiver_uuids).context("failed to encode receiver uuids")?;

        let form = [
            ("template_id", message.template_id.as_str()),
            ("template_args", template_args.as_str()),
            ("receiver_uuids", receiver_uuids.as_str()),
        ];
        self.post_form(&self.api_url, &form).await
    }

    /// Sends the message to the token owner's own chat (나에게 보내기).
    pub async fn send_to_me(&self, message: &FormattedMessage) -> Result<bool> {
        let template_object = serde_json::to_string(&json!({
            "object_type": "text",
            "text": message.content,
            "link": { "web_url": "https://developers.kakao.com" },
        }))
        .context("failed to encode template object")?;

        let form = [("template_object", template_object.as_str())];
        self.post_form(&self.memo_api_url, &form).await
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<bool> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("failed to build reqwest client")?;

        let response = client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .form(form)
            .send()
            .await
            .context("kakao send request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("kakao: delivery rejected with status {}: {}", status, body);
            return Ok(false);
        }
        Ok(true)
    }
}
