use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// State for the liveness endpoints. Knows nothing about the poller:
/// `/health` must answer 200 even while Telegram is unreachable.
#[derive(Clone)]
struct HealthState {
    started_at: Instant,
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(HealthState {
            started_at: Instant::now(),
        })
}

/// Some platform probes hit the root path, so answer there too.
async fn root() -> &'static str {
    "OK"
}

async fn health(State(state): State<HealthState>) -> Json<Value> {
    let uptime_sec = (state.started_at.elapsed().as_secs_f64() * 100.0).round() / 100.0;
    Json(json!({
        "ok": true,
        "uptime_sec": uptime_sec,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let state = HealthState {
            started_at: Instant::now(),
        };
        let Json(body) = health(State(state)).await;
        assert_eq!(body["ok"], true);
        assert!(body["uptime_sec"].is_number());
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_root_is_plain_ok() {
        assert_eq!(root().await, "OK");
    }
}
