//! Domain layer - 请求模型与邮件内容

mod composer;
mod request;

pub use composer::{PASSWORD_RESET_SUBJECT, compose_password_reset};
pub use request::PasswordResetRequest;
