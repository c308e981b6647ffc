pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod store;
pub mod types;

use axum::Router;

/// All API routes, without the outer middleware layers.
pub fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::workouts::router())
        .merge(routes::map::router())
        .with_state(state)
}
