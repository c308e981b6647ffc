use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::types::view::Marker;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/map", get(map))
}

#[derive(Serialize, Deserialize)]
pub struct MapResponse {
    pub zoom: u8,
    pub markers: Vec<Marker>,
}

async fn map(State(state): State<AppState>) -> Json<MapResponse> {
    let workouts = state.list().await;
    Json(MapResponse {
        zoom: state.config.map_zoom_level,
        markers: workouts.iter().map(Marker::from).collect(),
    })
}
