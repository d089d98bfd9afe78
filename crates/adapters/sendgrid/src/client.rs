//! SendGrid 客户端实现

use std::time::Duration;

use aviso_config::SendGridConfig;
use aviso_errors::{AppError, AppResult};
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use tracing::debug;

use crate::{EmailMessage, EmailProvider, ProviderError, ProviderResponse};

/// SendGrid 客户端
///
/// 持有自身的不可变配置，不依赖任何进程级全局状态。
pub struct SendGridClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Secret<String>,
}

impl SendGridClient {
    /// 创建新的客户端
    pub fn new(config: &SendGridConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait::async_trait]
impl EmailProvider for SendGridClient {
    async fn send(&self, message: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        let body = SendBody::from_message(message);

        let response = self
            .http
            .post(format!("{}/v3/mail/send", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Raw(e.to_string()))?;

        let status_code = response.status().as_u16();
        debug!(to = %message.to, status_code, "SendGrid responded");

        Ok(ProviderResponse { status_code })
    }
}

/// SendGrid v3 mail/send 请求体
#[derive(Debug, Serialize)]
struct SendBody<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    r#type: &'a str,
    value: &'a str,
}

impl<'a> SendBody<'a> {
    fn from_message(message: &'a EmailMessage) -> Self {
        Self {
            personalizations: [Personalization {
                to: [Address {
                    email: &message.to,
                    name: None,
                }],
            }],
            from: Address {
                email: &message.from.email,
                name: Some(&message.from.name),
            },
            subject: &message.subject,
            // 纯文本在前，HTML 在后，SendGrid 要求此顺序
            content: [
                Content {
                    r#type: "text/plain",
                    value: &message.text,
                },
                Content {
                    r#type: "text/html",
                    value: &message.html,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmailSender;

    fn test_message() -> EmailMessage {
        EmailMessage {
            to: "test@example.com".to_string(),
            from: EmailSender {
                email: "noreply@example.com".to_string(),
                name: "Aviso".to_string(),
            },
            subject: "Restablecer contraseña".to_string(),
            text: "token: abc".to_string(),
            html: "<h2>abc</h2>".to_string(),
        }
    }

    #[test]
    fn test_send_body_shape() {
        let message = test_message();
        let body = SendBody::from_message(&message);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["personalizations"][0]["to"][0]["email"], "test@example.com");
        assert_eq!(json["from"]["email"], "noreply@example.com");
        assert_eq!(json["from"]["name"], "Aviso");
        assert_eq!(json["subject"], "Restablecer contraseña");
        assert_eq!(json["content"][0]["type"], "text/plain");
        assert_eq!(json["content"][0]["value"], "token: abc");
        assert_eq!(json["content"][1]["type"], "text/html");
        assert_eq!(json["content"][1]["value"], "<h2>abc</h2>");
    }

    #[test]
    fn test_recipient_name_omitted() {
        let message = test_message();
        let body = SendBody::from_message(&message);
        let json = serde_json::to_value(&body).unwrap();

        assert!(json["personalizations"][0]["to"][0].get("name").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_provider_yields_raw_error() {
        let config = SendGridConfig {
            api_key: Secret::new("SG.test".to_string()),
            from_email: "noreply@example.com".to_string(),
            from_name: "Aviso".to_string(),
            // 不可路由的地址，连接立即失败
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        };
        let client = SendGridClient::new(&config).unwrap();

        let result = client.send(&test_message()).await;
        assert!(matches!(result, Err(ProviderError::Raw(_))));
    }
}
