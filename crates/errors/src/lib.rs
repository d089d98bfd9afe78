//! aviso-errors - 统一错误处理
//!
//! 服务对外暴露的唯一归一化错误形状：人类可读的 message 加 HTTP 风格的状态码。

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
///
/// 变体即错误分类：校验失败在边界层产生，`UpstreamRejected` 与 `Provider`
/// 只能由派发协调器产生。
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// 供应商接受了调用但返回了非 2xx 状态码
    #[error("Unexpected status code: {0}")]
    UpstreamRejected(u16),

    /// 供应商客户端抛出的传输、认证等原始错误，原文保留在 message 中
    #[error("Failed to send email: {0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 转换为 HTTP 风格状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::UpstreamRejected(_) => 500,
            Self::Provider(_) => 500,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为响应给调用方的错误负载
    pub fn to_error_payload(&self) -> ErrorPayload {
        ErrorPayload {
            message: self.to_string(),
            status: self.status_code(),
        }
    }
}

/// 归一化错误负载，经传输层原样回给调用方
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub status: u16,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::validation("bad email").status_code(), 400);
        assert_eq!(AppError::UpstreamRejected(400).status_code(), 500);
        assert_eq!(AppError::provider("boom").status_code(), 500);
        assert_eq!(AppError::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_upstream_rejected_message() {
        let err = AppError::UpstreamRejected(400);
        assert_eq!(err.to_string(), "Unexpected status code: 400");
    }

    #[test]
    fn test_provider_message_preserves_cause() {
        let err = AppError::provider("SendGrid API error");
        assert_eq!(err.to_string(), "Failed to send email: SendGrid API error");
    }

    #[test]
    fn test_error_payload_shape() {
        let payload = AppError::UpstreamRejected(503).to_error_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["message"], "Unexpected status code: 503");
        assert_eq!(json["status"], 500);
    }
}
