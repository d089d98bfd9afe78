//! aviso-adapter-sendgrid - 邮件供应商适配器
//!
//! 封装 SendGrid v3 发送接口。适配器只负责把消息送出去并带回状态码，
//! 结果的成败分类属于派发协调器。

mod client;

pub use client::SendGridClient;

use aviso_errors::AppError;
use thiserror::Error;

/// 发件人身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSender {
    pub email: String,
    pub name: String,
}

/// 邮件消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub from: EmailSender,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// 供应商响应
#[derive(Debug, Clone, Copy)]
pub struct ProviderResponse {
    pub status_code: u16,
}

/// 供应商调用失败
#[derive(Debug, Error)]
pub enum ProviderError {
    /// 已归一化的失败，由嵌套调用传出，调用方原样传递，不得二次包装
    #[error(transparent)]
    Normalized(#[from] AppError),

    /// 供应商客户端的原始错误
    #[error("{0}")]
    Raw(String),
}

/// 邮件供应商接口
#[async_trait::async_trait]
pub trait EmailProvider: Send + Sync {
    /// 发送一封邮件，返回供应商的状态码或错误
    async fn send(&self, message: &EmailMessage) -> Result<ProviderResponse, ProviderError>;
}
