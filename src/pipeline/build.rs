use chrono::{DateTime, Utc};

use crate::pipeline::validate::ValidatedInput;
use crate::types::workout::Workout;

pub fn build(input: ValidatedInput, date: DateTime<Utc>) -> Workout {
    match input {
        ValidatedInput::Running {
            coords,
            distance,
            duration,
            cadence,
        } => Workout::running(coords, distance, duration, cadence, date),
        ValidatedInput::Cycling {
            coords,
            distance,
            duration,
            elevation,
        } => Workout::cycling(coords, distance, duration, elevation, date),
    }
}
