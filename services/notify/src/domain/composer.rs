//! 邮件内容构造
//!
//! 纯函数：相同输入产生字节级相同的邮件，无 I/O，无时间戳。

use aviso_adapter_sendgrid::{EmailMessage, EmailSender};

use crate::domain::PasswordResetRequest;

/// 密码重置邮件主题
pub const PASSWORD_RESET_SUBJECT: &str = "Restablecer contraseña";

/// 构造密码重置邮件
///
/// 重置令牌必须原样出现在纯文本和 HTML 两个正文中，收件人据此恢复令牌。
pub fn compose_password_reset(
    request: &PasswordResetRequest,
    sender: &EmailSender,
) -> EmailMessage {
    EmailMessage {
        to: request.email.clone(),
        from: sender.clone(),
        subject: PASSWORD_RESET_SUBJECT.to_string(),
        text: format!(
            "Usa este token para restablecer tu contraseña: {}",
            request.reset_token
        ),
        html: format!(
            "<p>Tu código de restablecimiento de contraseña es:</p>\n\
             <h2>{}</h2>\n\
             <p>Para restablecer tu contraseña:</p>\n\
             <p>Si no has solicitado un restablecimiento de contraseña, puedes ignorar este correo.</p>",
            request.reset_token
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PasswordResetRequest {
        PasswordResetRequest {
            email: "test@example.com".to_string(),
            reset_token: "mock-reset-token".to_string(),
        }
    }

    fn sender() -> EmailSender {
        EmailSender {
            email: "noreply@example.com".to_string(),
            name: "Aviso".to_string(),
        }
    }

    #[test]
    fn test_token_appears_verbatim_in_both_bodies() {
        let message = compose_password_reset(&request(), &sender());

        assert!(message.text.contains("mock-reset-token"));
        assert!(message.html.contains("mock-reset-token"));
    }

    #[test]
    fn test_fixed_subject() {
        let message = compose_password_reset(&request(), &sender());
        assert_eq!(message.subject, "Restablecer contraseña");
    }

    #[test]
    fn test_template_content() {
        let message = compose_password_reset(&request(), &sender());

        assert!(message.text.contains("Usa este token para restablecer tu contraseña:"));
        assert!(message.html.contains("Tu código de restablecimiento de contraseña es:"));
        assert!(message.html.contains("<h2>mock-reset-token</h2>"));
        assert!(message.html.contains("Para restablecer tu contraseña:"));
        assert!(message.html.contains("Si no has solicitado un restablecimiento de contraseña"));
    }

    #[test]
    fn test_addressing() {
        let message = compose_password_reset(&request(), &sender());

        assert_eq!(message.to, "test@example.com");
        assert_eq!(message.from.email, "noreply@example.com");
        assert_eq!(message.from.name, "Aviso");
    }

    #[test]
    fn test_deterministic() {
        let first = compose_password_reset(&request(), &sender());
        let second = compose_password_reset(&request(), &sender());
        assert_eq!(first, second);
    }
}
