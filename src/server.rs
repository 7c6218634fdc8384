//! HTTP API consumed by the dashboard frontend.

use std::net::SocketAddr;
use std::sync::Arc;

use aggregator::Dashboard;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use common::{Error, WeatherRecord, WeatherSource};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Build the API router.
pub fn router<S: WeatherSource>(dashboard: Arc<Dashboard<S>>) -> Router {
    Router::new()
        .route("/api/weather", get(current_weather::<S>))
        .route("/api/health", get(health::<S>))
        .route("/api/cities-original", get(cities_original::<S>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(dashboard)
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl+C.
pub async fn serve<S: WeatherSource>(dashboard: Arc<Dashboard<S>>, port: u16) -> Result<(), Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Backend server running on port {}", port);
    info!("Weather API: http://localhost:{}/api/weather", port);
    info!("Original cities data: http://localhost:{}/api/cities-original", port);

    axum::serve(listener, router(dashboard))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn current_weather<S: WeatherSource>(
    State(dashboard): State<Arc<Dashboard<S>>>,
) -> Json<Vec<WeatherRecord>> {
    Json(dashboard.current_weather().await)
}

async fn health<S: WeatherSource>(State(dashboard): State<Arc<Dashboard<S>>>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Weather API is running",
        "cachedEntries": dashboard.aggregator().cache().len(),
    }))
}

async fn cities_original<S: WeatherSource>(
    State(dashboard): State<Arc<Dashboard<S>>>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    dashboard.cities().load_raw().await.map(Json).map_err(|e| {
        warn!("Could not load {}: {}", dashboard.cities().path().display(), e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Could not load cities data" })),
        )
    })
}
