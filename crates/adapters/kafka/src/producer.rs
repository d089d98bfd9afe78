//! Kafka Producer
//!
//! 提供应答发布功能

use std::time::Duration;

use aviso_errors::{AppError, AppResult};
use rdkafka::config::ClientConfig;
use rdkafka::message::{Header, OwnedHeaders};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use tracing::debug;

use crate::config::ProducerConfig;
use crate::consumer::CORRELATION_ID_HEADER;

/// Kafka Event Publisher
pub struct KafkaEventPublisher {
    producer: FutureProducer,
    timeout: Duration,
}

impl KafkaEventPublisher {
    pub fn new(config: &ProducerConfig) -> AppResult<Self> {
        let mut client_config = ClientConfig::new();
        for (key, value) in config.to_client_config_entries() {
            client_config.set(&key, &value);
        }

        let producer: FutureProducer = client_config
            .create()
            .map_err(|e| AppError::internal(format!("Failed to create Kafka producer: {}", e)))?;

        Ok(Self {
            producer,
            timeout: config.request_timeout,
        })
    }

    /// 从 broker 地址创建
    pub fn from_brokers(brokers: &str) -> AppResult<Self> {
        Self::new(&ProducerConfig::new(brokers))
    }

    /// 发布应答
    ///
    /// 关联 ID 存在时作为消息头原样带回，调用方据此匹配请求。
    pub async fn publish_reply(
        &self,
        topic: &str,
        correlation_id: Option<&str>,
        payload: &str,
    ) -> AppResult<()> {
        let mut record: FutureRecord<'_, str, str> = FutureRecord::to(topic).payload(payload);

        if let Some(correlation_id) = correlation_id {
            record = record.headers(OwnedHeaders::new().insert(Header {
                key: CORRELATION_ID_HEADER,
                value: Some(correlation_id),
            }));
        }

        let (partition, offset) = self
            .producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map_err(|(e, _)| AppError::internal(format!("Failed to publish reply: {}", e)))?;

        debug!(
            topic = topic,
            partition,
            offset,
            correlation_id = ?correlation_id,
            "Reply published"
        );

        Ok(())
    }
}
