//! 派发协调器
//!
//! 把一个已校验的密码重置请求变成一次供应商调用和一个归一化结果。
//! 供应商的原始错误只在这里翻译，不会以原始形态继续向外传播。

use std::sync::Arc;

use aviso_adapter_sendgrid::{EmailProvider, EmailSender, ProviderError};
use aviso_errors::{AppError, AppResult};
use metrics::counter;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{PasswordResetRequest, compose_password_reset};

/// 派发成功回执
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchReceipt {
    pub message: String,
    pub status_code: u16,
}

/// 派发协调器
///
/// 供应商以接口形式注入，测试可以替换为 mock，不触碰进程级状态。
/// 无内部可变状态，多个请求可并发派发。
pub struct Dispatcher {
    provider: Arc<dyn EmailProvider>,
    sender: EmailSender,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn EmailProvider>, sender: EmailSender) -> Self {
        Self { provider, sender }
    }

    /// 发送密码重置邮件
    ///
    /// 每次调用恰好触发一次供应商调用，不重试。同一请求调用两次会发出两封邮件。
    pub async fn send_password_reset_email(
        &self,
        request: &PasswordResetRequest,
    ) -> AppResult<DispatchReceipt> {
        let message = compose_password_reset(request, &self.sender);

        let outcome = match self.provider.send(&message).await {
            Ok(response) if (200..300).contains(&response.status_code) => {
                info!(to = %message.to, status_code = response.status_code, "Email sent");
                Ok(DispatchReceipt {
                    message: "Email sent successfully".to_string(),
                    status_code: response.status_code,
                })
            }
            Ok(response) => Err(AppError::UpstreamRejected(response.status_code)),
            // 嵌套调用传出的归一化失败原样上抛，不二次包装
            Err(ProviderError::Normalized(err)) => Err(err),
            Err(ProviderError::Raw(cause)) => Err(AppError::provider(cause)),
        };

        match &outcome {
            Ok(_) => counter!("notify_emails_sent_total").increment(1),
            Err(err) => {
                warn!(to = %message.to, error = %err, "Dispatch failed");
                counter!("notify_dispatch_failures_total").increment(1);
            }
        }

        outcome
    }
}
