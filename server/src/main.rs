use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use events_api::config::Config;
use events_api::routes::create_routes;
use events_api::services::EventService;
use events_api::store;

#[tokio::main]
async fn main() {
    let config = Config::from_env().expect("Invalid configuration");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let events = EventService::new(store::open(&config).await);
    let app = create_routes(events);

    let addr = config.addr();
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
