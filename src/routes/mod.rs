pub mod auth;
pub mod destinations;
pub mod expenses;
pub mod flights;
pub mod trips;

use axum::{
    http::{header, HeaderName, Method},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    // The session cookie is SameSite=None, so the browser only sends it on
    // credentialed cross-origin requests.
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-session-id"),
        ])
        .allow_credentials(true);

    Router::new()
        .nest("/auth", auth::router())
        .nest("/trips", trips::router())
        .nest("/destinations", destinations::router())
        .nest("/flights", flights::router())
        .nest("/expenses", expenses::router())
        .layer(cors)
        .with_state(state)
}
