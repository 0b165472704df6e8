use axum::{response::IntoResponse, response::Response};
use serde::Serialize;

use crate::utils::response::success;

pub mod events;

const SERVICE_NAME: &str = "Events API";

#[derive(Serialize)]
struct RootPayload {
    message: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
}

pub async fn root() -> Response {
    let payload = RootPayload {
        message: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    };

    success(payload).into_response()
}

pub async fn health_check() -> Response {
    success(HealthPayload { status: "healthy" }).into_response()
}
