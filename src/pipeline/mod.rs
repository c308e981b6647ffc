pub mod build;
pub mod validate;

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::types::input::WorkoutInput;
use crate::types::workout::Workout;

/// Validates a form submission and builds the workout, stamped with the current time.
pub fn create(input: &WorkoutInput) -> Result<Workout, ValidationError> {
    create_at(input, Utc::now())
}

pub fn create_at(input: &WorkoutInput, now: DateTime<Utc>) -> Result<Workout, ValidationError> {
    let validated = validate::validate(input)?;
    Ok(build::build(validated, now))
}
