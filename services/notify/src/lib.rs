//! notify Service - 密码重置通知微服务
//!
//! 消费 `email.password.reset` 事件，通过 SendGrid 发送重置邮件，
//! 并把成功回执或归一化错误应答给调用方。

pub mod api;
pub mod application;
pub mod domain;
pub mod ops;
