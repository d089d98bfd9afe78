//! 密码重置请求
//!
//! 边界校验在此完成：不合法的请求不会到达派发协调器。

use std::str::FromStr;

use aviso_errors::{AppError, AppResult};
use email_address::EmailAddress;
use serde::Deserialize;

/// 密码重置请求
///
/// 由入站事件负载构造，一次性消费，不落盘。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
    #[serde(rename = "resetToken")]
    pub reset_token: String,
}

impl PasswordResetRequest {
    /// 从原始负载解析并校验
    pub fn parse(raw: &str) -> AppResult<Self> {
        let request: Self = serde_json::from_str(raw)
            .map_err(|e| AppError::validation(format!("Invalid password reset payload: {}", e)))?;
        request.validate()?;
        Ok(request)
    }

    fn validate(&self) -> AppResult<()> {
        if self.email.is_empty() {
            return Err(AppError::validation("email must not be empty"));
        }
        if EmailAddress::from_str(&self.email).is_err() {
            return Err(AppError::validation("email must be a valid email address"));
        }
        if self.reset_token.is_empty() {
            return Err(AppError::validation("resetToken must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload() {
        let request =
            PasswordResetRequest::parse(r#"{"email":"test@example.com","resetToken":"tok-1"}"#)
                .unwrap();
        assert_eq!(request.email, "test@example.com");
        assert_eq!(request.reset_token, "tok-1");
    }

    #[test]
    fn test_missing_field_rejected() {
        let result = PasswordResetRequest::parse(r#"{"email":"test@example.com"}"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_email_rejected() {
        let result = PasswordResetRequest::parse(r#"{"email":"","resetToken":"tok-1"}"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_malformed_email_rejected() {
        let result = PasswordResetRequest::parse(r#"{"email":"not-an-email","resetToken":"tok-1"}"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_empty_token_rejected() {
        let result = PasswordResetRequest::parse(r#"{"email":"test@example.com","resetToken":""}"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = PasswordResetRequest::parse("not json");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
