//! 密码重置端点
//!
//! 传输边界：解析并校验入站负载，调用派发协调器，把结果编码为应答负载。

use std::sync::Arc;

use aviso_errors::AppResult;
use serde::Serialize;
use tracing::{info, warn};

use crate::application::{DispatchReceipt, Dispatcher};
use crate::domain::PasswordResetRequest;

/// 入站事件模式
pub const PASSWORD_RESET_PATTERN: &str = "email.password.reset";

/// 序列化失败时的兜底应答
const FALLBACK_REPLY: &str = r#"{"message":"Internal error","status":500}"#;

/// 密码重置端点
pub struct PasswordResetEndpoint {
    dispatcher: Arc<Dispatcher>,
}

impl PasswordResetEndpoint {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// 处理一条入站消息，返回应答负载
    ///
    /// 成功为 `{"message", "statusCode"}`，失败为归一化的 `{"message", "status"}`。
    pub async fn handle(&self, payload: &str) -> String {
        match self.process(payload).await {
            Ok(receipt) => {
                info!(status_code = receipt.status_code, "Password reset email dispatched");
                encode(&receipt)
            }
            Err(err) => {
                warn!(error = %err, "Password reset request failed");
                encode(&err.to_error_payload())
            }
        }
    }

    async fn process(&self, payload: &str) -> AppResult<DispatchReceipt> {
        let request = PasswordResetRequest::parse(payload)?;
        self.dispatcher.send_password_reset_email(&request).await
    }
}

fn encode<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        warn!("Failed to encode reply: {}", e);
        FALLBACK_REPLY.to_string()
    })
}
