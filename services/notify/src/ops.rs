//! 运维端点
//!
//! 提供 /health/live、/health/ready 和 /metrics。

use aviso_errors::{AppError, AppResult};
use axum::{Json, Router, extract::State, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::info;

/// 健康检查状态
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub checks: Vec<ComponentHealth>,
}

/// 组件健康状态
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            checks: vec![],
        }
    }

    pub fn add_check(&mut self, check: ComponentHealth) {
        if check.status != "healthy" {
            self.status = "unhealthy".to_string();
        }
        self.checks.push(check);
    }
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "healthy".to_string(),
        }
    }
}

#[derive(Clone)]
struct OpsState {
    metrics: PrometheusHandle,
}

pub fn router(metrics: PrometheusHandle) -> Router {
    Router::new()
        .route("/health/live", get(liveness))
        .route("/health/ready", get(readiness))
        .route("/metrics", get(render_metrics))
        .with_state(OpsState { metrics })
}

/// 存活检查：进程在运行即为健康
async fn liveness() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}

/// 就绪检查
async fn readiness() -> Json<HealthStatus> {
    let mut status = HealthStatus::healthy();
    status.add_check(ComponentHealth::healthy("kafka"));
    status.add_check(ComponentHealth::healthy("sendgrid"));
    Json(status)
}

async fn render_metrics(State(state): State<OpsState>) -> String {
    state.metrics.render()
}

/// 启动运维 HTTP 服务
pub async fn serve(host: &str, port: u16, metrics: PrometheusHandle) -> AppResult<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind ops server: {}", e)))?;

    info!(addr = %addr, "Ops server listening");

    axum::serve(listener, router(metrics))
        .await
        .map_err(|e| AppError::internal(format!("Ops server error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unhealthy_check_flips_status() {
        let mut status = HealthStatus::healthy();
        status.add_check(ComponentHealth::healthy("kafka"));
        assert_eq!(status.status, "healthy");

        status.add_check(ComponentHealth {
            name: "sendgrid".to_string(),
            status: "unhealthy".to_string(),
        });
        assert_eq!(status.status, "unhealthy");
        assert_eq!(status.checks.len(), 2);
    }
}
