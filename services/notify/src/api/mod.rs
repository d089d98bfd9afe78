//! API layer - 面向消息代理的端点

mod endpoint;

pub use endpoint::{PASSWORD_RESET_PATTERN, PasswordResetEndpoint};
