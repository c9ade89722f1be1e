//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::{HealthCheckFuture, run_health_checks};
use database::postgres::{DatabaseConnection, check_health};
use serde_json::Value;

async fn ready(State(db): State<DatabaseConnection>) -> (StatusCode, Json<Value>) {
    let postgres: HealthCheckFuture<'_> =
        Box::pin(async { check_health(&db).await.map_err(|e| e.to_string()) });

    run_health_checks(vec![("database", postgres)]).await
}

/// `GET /ready`: 200 when PostgreSQL answers, 503 otherwise
pub fn router(db: DatabaseConnection) -> Router {
    Router::new().route("/ready", get(ready)).with_state(db)
}
