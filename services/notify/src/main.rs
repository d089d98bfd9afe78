//! notify Service 入口
//!
//! 启动顺序：配置（失败即终止）→ 遥测 → 运维端点 → SendGrid 客户端 →
//! 派发协调器 → Kafka 消费循环，与关停信号竞争。

use std::sync::Arc;

use aviso_adapter_kafka::{ConsumedMessage, ConsumerConfig, KafkaEventConsumer, KafkaEventPublisher};
use aviso_adapter_sendgrid::{EmailSender, SendGridClient};
use aviso_config::AppConfig;
use tracing::{debug, error, info};

use svc_notify::api::{PASSWORD_RESET_PATTERN, PasswordResetEndpoint};
use svc_notify::application::Dispatcher;
use svc_notify::ops;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load("config")?;
    aviso_telemetry::init_for_env(&config.app_env, &config.telemetry.log_level);
    let metrics_handle = aviso_telemetry::init_metrics();

    info!(app = %config.app_name, env = %config.app_env, "Starting notify service");

    let ops_host = config.server.host.clone();
    let ops_port = config.server.port;
    tokio::spawn(async move {
        if let Err(e) = ops::serve(&ops_host, ops_port, metrics_handle).await {
            error!("Ops server failed: {}", e);
        }
    });

    let provider = Arc::new(SendGridClient::new(&config.sendgrid)?);
    let sender = EmailSender {
        email: config.sendgrid.from_email.clone(),
        name: config.sendgrid.from_name.clone(),
    };
    let dispatcher = Arc::new(Dispatcher::new(provider, sender));
    let endpoint = Arc::new(PasswordResetEndpoint::new(dispatcher));

    let replier = Arc::new(KafkaEventPublisher::from_brokers(&config.kafka.brokers)?);
    let consumer = KafkaEventConsumer::new(
        ConsumerConfig::new(config.kafka.brokers.as_str(), config.kafka.group_id.as_str())
            .with_client_id(config.app_name.as_str())
            .with_topic(PASSWORD_RESET_PATTERN),
    )?;

    let handler = move |msg: ConsumedMessage| {
        let endpoint = endpoint.clone();
        let replier = replier.clone();
        async move {
            let reply = endpoint.handle(&msg.payload).await;
            match msg.reply_to.as_deref() {
                Some(reply_topic) => {
                    replier
                        .publish_reply(reply_topic, msg.correlation_id.as_deref(), &reply)
                        .await
                }
                None => {
                    debug!(topic = %msg.topic, "Event carried no reply-to header");
                    Ok(())
                }
            }
        }
    };

    tokio::select! {
        result = consumer.start(handler) => result?,
        _ = shutdown_signal() => info!("Shutdown signal received, stopping"),
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
