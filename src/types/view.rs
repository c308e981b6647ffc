use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::workout::{Coords, Workout, WorkoutKind, WorkoutType};

/// Everything the list and the map need to draw one workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutView {
    pub id: Uuid,
    pub description: String,
    /// Marker popup text, icon included.
    pub label: String,
    pub popup_class: String,
    pub distance: f64,
    pub duration: f64,
    pub coords: Coords,
    pub clicks: u32,
    pub metric_display: String,
    #[serde(flatten)]
    pub kind: WorkoutKind,
}

impl From<&Workout> for WorkoutView {
    fn from(workout: &Workout) -> Self {
        let workout_type = workout.workout_type();
        let metric = workout.derived_metric();
        Self {
            id: workout.id(),
            description: workout.description().to_string(),
            label: format!("{} {}", workout_type.icon(), workout.description()),
            popup_class: popup_class(workout_type),
            distance: workout.distance(),
            duration: workout.duration(),
            coords: workout.coords(),
            clicks: workout.clicks(),
            metric_display: format!("{:.1} {}", metric.value(), metric.unit()),
            kind: workout.kind().clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    pub coords: Coords,
    pub label: String,
    pub popup_class: String,
}

impl From<&Workout> for Marker {
    fn from(workout: &Workout) -> Self {
        let workout_type = workout.workout_type();
        Self {
            id: workout.id(),
            coords: workout.coords(),
            label: format!("{} {}", workout_type.icon(), workout.description()),
            popup_class: popup_class(workout_type),
        }
    }
}

fn popup_class(workout_type: WorkoutType) -> String {
    format!("{}-popup", workout_type)
}
