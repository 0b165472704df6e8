use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::events::{create_event, delete_event, get_event, list_events, update_event};
use crate::handlers::{health_check, root};
use crate::services::EventService;

pub fn create_routes(events: EventService) -> Router {
    routes_with_cors(events, create_cors_layer())
}

pub fn routes_with_cors(events: EventService, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/:event_id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(events)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
