use axum::{Router, routing::get};

use crate::state::AppState;

pub mod doc;
pub mod health;
pub mod params;
pub mod products;

/// Routes served under `/api/{version}`. State is provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    let external = Router::new().nest("/product", products::router());
    let internal = Router::new().route("/health", get(health::health_check));

    Router::new()
        .nest("/external", external)
        .nest("/internal", internal)
}
