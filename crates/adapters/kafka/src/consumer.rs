//! Kafka Consumer
//!
//! 每条消息交给处理器执行一次，处理结束后手动提交偏移量。
//! 核心契约是每个请求恰好触发一次对外派发，因此消费侧不做重试，
//! 处理失败只记录日志，偏移量照常提交。

use aviso_errors::{AppError, AppResult};
use futures::StreamExt;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::{Headers, Message};
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::ConsumerConfig;

/// 应答 topic 头
pub const REPLY_TO_HEADER: &str = "reply-to";
/// 关联 ID 头
pub const CORRELATION_ID_HEADER: &str = "correlation-id";

/// 消费的消息
#[derive(Debug, Clone)]
pub struct ConsumedMessage {
    /// Topic
    pub topic: String,
    /// 分区
    pub partition: i32,
    /// 偏移量
    pub offset: i64,
    /// 消息键
    pub key: Option<String>,
    /// 消息内容
    pub payload: String,
    /// 应答 topic（请求/应答模式下由调用方设置）
    pub reply_to: Option<String>,
    /// 关联 ID，应答时原样带回
    pub correlation_id: Option<String>,
}

impl ConsumedMessage {
    /// 解析 JSON 负载
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> AppResult<T> {
        serde_json::from_str(&self.payload)
            .map_err(|e| AppError::validation(format!("Failed to parse payload: {}", e)))
    }
}

/// Kafka Event Consumer
pub struct KafkaEventConsumer {
    consumer: StreamConsumer,
    config: ConsumerConfig,
}

impl KafkaEventConsumer {
    pub fn new(config: ConsumerConfig) -> AppResult<Self> {
        let mut client_config = ClientConfig::new();
        for (key, value) in config.to_client_config_entries() {
            client_config.set(&key, &value);
        }

        let consumer: StreamConsumer = client_config
            .create()
            .map_err(|e| AppError::internal(format!("Failed to create Kafka consumer: {}", e)))?;

        let topics: Vec<&str> = config.topics.iter().map(|s| s.as_str()).collect();
        consumer
            .subscribe(&topics)
            .map_err(|e| AppError::internal(format!("Failed to subscribe to topics: {}", e)))?;

        info!(
            group_id = %config.group_id,
            topics = ?config.topics,
            "Kafka consumer created"
        );

        Ok(Self { consumer, config })
    }

    /// 开始消费消息
    pub async fn start<F, Fut>(&self, handler: F) -> AppResult<()>
    where
        F: Fn(ConsumedMessage) -> Fut + Send + Sync,
        Fut: std::future::Future<Output = AppResult<()>> + Send,
    {
        let mut stream = self.consumer.stream();

        while let Some(result) = stream.next().await {
            match result {
                Ok(message) => {
                    let topic = message.topic().to_string();
                    let partition = message.partition();
                    let offset = message.offset();

                    let payload = match message.payload_view::<str>() {
                        Some(Ok(s)) => s.to_string(),
                        Some(Err(e)) => {
                            error!(topic = %topic, partition, offset, "Message payload is not valid UTF-8: {}", e);
                            self.commit(&message);
                            continue;
                        }
                        None => {
                            debug!(topic = %topic, partition, offset, "Empty message, skipping");
                            self.commit(&message);
                            continue;
                        }
                    };

                    let key = message
                        .key_view::<str>()
                        .and_then(|r| r.ok())
                        .map(|s| s.to_string());

                    let consumed_msg = ConsumedMessage {
                        topic: topic.clone(),
                        partition,
                        offset,
                        key,
                        payload,
                        reply_to: header_value(&message, REPLY_TO_HEADER),
                        correlation_id: header_value(&message, CORRELATION_ID_HEADER),
                    };

                    if let Err(e) = handler(consumed_msg).await {
                        error!(
                            topic = %topic,
                            partition,
                            offset,
                            error = %e,
                            "Failed to process message"
                        );
                    }

                    self.commit(&message);
                }
                Err(e) => {
                    error!("Kafka error: {}", e);
                }
            }
        }

        info!("Kafka consumer stopped");
        Ok(())
    }

    fn commit(&self, message: &rdkafka::message::BorrowedMessage<'_>) {
        if let Err(e) = self.consumer.commit_message(message, CommitMode::Async) {
            error!("Failed to commit offset: {}", e);
        }
    }

    /// 获取消费者组 ID
    pub fn group_id(&self) -> &str {
        &self.config.group_id
    }

    /// 获取订阅的 topics
    pub fn topics(&self) -> &[String] {
        &self.config.topics
    }
}

/// 读取字符串类型的消息头
fn header_value(message: &rdkafka::message::BorrowedMessage<'_>, name: &str) -> Option<String> {
    message.headers().and_then(|headers| {
        headers
            .iter()
            .find(|h| h.key == name)
            .and_then(|h| h.value)
            .and_then(|v| std::str::from_utf8(v).ok())
            .map(|s| s.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct TestPayload {
        email: String,
    }

    fn message_with_payload(payload: &str) -> ConsumedMessage {
        ConsumedMessage {
            topic: "email.password.reset".to_string(),
            partition: 0,
            offset: 42,
            key: None,
            payload: payload.to_string(),
            reply_to: Some("email.password.reset.reply".to_string()),
            correlation_id: Some("abc-123".to_string()),
        }
    }

    #[test]
    fn test_parse_payload() {
        let msg = message_with_payload(r#"{"email":"test@example.com"}"#);
        let parsed: TestPayload = msg.parse_payload().unwrap();
        assert_eq!(parsed.email, "test@example.com");
    }

    #[test]
    fn test_parse_payload_rejects_invalid_json() {
        let msg = message_with_payload("not json");
        let result: AppResult<TestPayload> = msg.parse_payload();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    #[ignore] // 需要 Kafka 实例
    async fn test_consumer() {
        let config = ConsumerConfig::new("localhost:9092", "test-group").with_topic("test-topic");

        let consumer = KafkaEventConsumer::new(config).unwrap();
        assert_eq!(consumer.group_id(), "test-group");
    }
}
