use std::sync::Arc;

use axum::http::{header, Method};
use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/availability",
            get(handlers::availability::month_availability),
        )
        .route(
            "/api/availability/takers",
            get(handlers::availability::takers_for_day),
        )
        .route(
            "/api/availability/takers/free",
            get(handlers::availability::free_takers),
        )
        .route(
            "/api/takers",
            get(handlers::takers::list_takers).post(handlers::takers::create_taker),
        )
        .route(
            "/api/takers/:id",
            patch(handlers::takers::update_taker_status),
        )
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/deliveries/upcoming",
            get(handlers::bookings::upcoming_deliveries),
        )
        .route("/api/events", get(handlers::events::events_stream))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
