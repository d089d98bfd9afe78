//! aviso-adapter-kafka - Kafka 适配器
//!
//! 服务的对外传输层：
//! - 消息消费（单次处理，手动提交，不做重试）
//! - 应答发布（reply-to / correlation-id 头）

mod config;
mod consumer;
mod producer;

pub use config::*;
pub use consumer::*;
pub use producer::*;
