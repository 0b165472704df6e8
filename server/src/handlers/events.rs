use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};

use crate::services::EventService;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

// Bodies arrive as raw bytes; the service decides when payload problems are
// reported.

pub async fn create_event(
    State(events): State<EventService>,
    body: Bytes,
) -> Result<Response, AppError> {
    let event = events.create(&body).await?;
    Ok(created(event).into_response())
}

pub async fn list_events(State(events): State<EventService>) -> Result<Response, AppError> {
    let list = events.list().await?;
    Ok(success(list).into_response())
}

pub async fn get_event(
    State(events): State<EventService>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let event = events.get(&event_id).await?;
    Ok(success(event).into_response())
}

pub async fn update_event(
    State(events): State<EventService>,
    Path(event_id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let event = events.update(&event_id, &body).await?;
    Ok(success(event).into_response())
}

pub async fn delete_event(
    State(events): State<EventService>,
    Path(event_id): Path<String>,
) -> Result<Response, AppError> {
    let deleted = events.delete(&event_id).await?;
    Ok(success(deleted).into_response())
}
