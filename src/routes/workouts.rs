use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline;
use crate::state::AppState;
use crate::types::input::WorkoutInput;
use crate::types::view::WorkoutView;
use crate::types::workout::Coords;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/workouts",
            post(create_workout).get(list_workouts).delete(reset),
        )
        .route("/api/workouts/:id", get(get_workout))
        .route("/api/workouts/:id/click", post(click_workout))
        .route("/api/workouts/:id/locate", get(locate_workout))
}

#[derive(Serialize, Deserialize)]
pub struct LocateResponse {
    pub coords: Coords,
    pub zoom: u8,
}

async fn create_workout(
    State(state): State<AppState>,
    payload: Result<Json<WorkoutInput>, JsonRejection>,
) -> Result<Json<WorkoutView>, AppError> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let workout = pipeline::create(&input).map_err(|err| {
        tracing::info!("Rejected {} workout: {}", input.workout_type, err);
        err
    })?;

    tracing::info!(
        "Logged workout {} ({}, {:.2} km in {:.0} min)",
        workout.id(),
        workout.description(),
        workout.distance(),
        workout.duration()
    );

    let view = WorkoutView::from(&workout);
    state.add(workout).await?;
    Ok(Json(view))
}

async fn list_workouts(State(state): State<AppState>) -> Json<Vec<WorkoutView>> {
    let workouts = state.list().await;
    Json(workouts.iter().map(WorkoutView::from).collect())
}

async fn get_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutView>, AppError> {
    let id = parse_id(&id)?;
    let workout = state
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(Json(WorkoutView::from(&workout)))
}

async fn click_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkoutView>, AppError> {
    let id = parse_id(&id)?;
    let workout = state.register_click(id).await?;
    tracing::debug!("Workout {} clicked {} times", id, workout.clicks());
    Ok(Json(WorkoutView::from(&workout)))
}

async fn locate_workout(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LocateResponse>, AppError> {
    let id = parse_id(&id)?;
    let workout = state
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(id.to_string()))?;
    Ok(Json(LocateResponse {
        coords: workout.coords(),
        zoom: state.config.map_zoom_level,
    }))
}

async fn reset(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    let removed = state.reset().await?;
    tracing::info!("Reset removed {} workouts", removed);
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid workout id: {}", raw)))
}
