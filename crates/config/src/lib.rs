//! aviso-config - 配置加载库
//!
//! 进程级配置：启动时加载一次，校验失败即终止进程，此后只读。

use std::str::FromStr;

use email_address::EmailAddress;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// SendGrid 配置
#[derive(Debug, Clone, Deserialize)]
pub struct SendGridConfig {
    pub api_key: Secret<String>,
    pub from_email: String,
    pub from_name: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Kafka 配置
#[derive(Debug, Clone, Deserialize)]
pub struct KafkaConfig {
    /// Broker 地址列表，逗号分隔
    pub brokers: String,
    #[serde(default = "default_group_id")]
    pub group_id: String,
}

fn default_group_id() -> String {
    "notify".to_string()
}

/// 运维端点配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    pub app_env: String,
    pub sendgrid: SendGridConfig,
    pub kafka: KafkaConfig,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 环境变量沿用原有的扁平命名（`SENDGRID_API_KEY`、`KAFKA_BROKERS` 等），
    /// 按前缀映射到对应的配置段。
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(section("SENDGRID_", "sendgrid"))
            .merge(section("KAFKA_", "kafka"))
            .merge(section("SERVER_", "server"))
            .merge(section("TELEMETRY_", "telemetry"))
            .merge(Env::raw().only(&["app_name", "app_env"]))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// 校验必填项非空且发件地址格式合法
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sendgrid.api_key.expose_secret().is_empty() {
            return Err(ConfigError::Invalid("sendgrid.api_key is required".into()));
        }
        if self.sendgrid.from_name.is_empty() {
            return Err(ConfigError::Invalid("sendgrid.from_name is required".into()));
        }
        if EmailAddress::from_str(&self.sendgrid.from_email).is_err() {
            return Err(ConfigError::Invalid(format!(
                "sendgrid.from_email is not a valid address: {}",
                self.sendgrid.from_email
            )));
        }
        if self.kafka.brokers.is_empty() {
            return Err(ConfigError::Invalid("kafka.brokers is required".into()));
        }
        Ok(())
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }

    /// 是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }
}

/// 将带前缀的环境变量映射到嵌套配置段
fn section(prefix: &str, name: &'static str) -> Env {
    Env::prefixed(prefix).map(move |key| format!("{}.{}", name, key.as_str().to_lowercase()).into())
}
