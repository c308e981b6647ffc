use crate::error::ValidationError;
use crate::types::input::{RawNumber, WorkoutInput};
use crate::types::workout::{self, Coords, WorkoutType};

/// Input that passed every check. Only `build` consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedInput {
    Running {
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
    },
    Cycling {
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation: f64,
    },
}

pub fn validate(input: &WorkoutInput) -> Result<ValidatedInput, ValidationError> {
    let workout_type: WorkoutType = input.workout_type.parse()?;

    if !input.coords.is_valid() {
        return Err(ValidationError::InvalidCoords {
            lat: input.coords.lat(),
            lng: input.coords.lng(),
        });
    }

    let distance = read_finite("distance", input.distance.as_ref())?;
    let duration = read_finite("duration", input.duration.as_ref())?;

    match workout_type {
        WorkoutType::Running => {
            let cadence = read_finite("cadence", input.cadence.as_ref())?;
            all_positive(&[
                ("distance", distance),
                ("duration", duration),
                ("cadence", cadence),
            ])?;
            workout::finite_metric("pace", workout::pace(distance, duration))?;
            Ok(ValidatedInput::Running {
                coords: input.coords,
                distance,
                duration,
                cadence,
            })
        }
        WorkoutType::Cycling => {
            // Elevation is a net change and may be negative.
            let elevation = read_finite("elevation", input.elevation.as_ref())?;
            all_positive(&[("distance", distance), ("duration", duration)])?;
            workout::finite_metric("speed", workout::speed(distance, duration))?;
            Ok(ValidatedInput::Cycling {
                coords: input.coords,
                distance,
                duration,
                elevation,
            })
        }
    }
}

fn read_finite(field: &'static str, raw: Option<&RawNumber>) -> Result<f64, ValidationError> {
    let value = match raw {
        None => return Err(ValidationError::Missing(field)),
        Some(RawNumber::Number(n)) => *n,
        Some(RawNumber::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::Missing(field));
            }
            trimmed
                .parse::<f64>()
                .map_err(|_| ValidationError::NotANumber {
                    field,
                    raw: text.clone(),
                })?
        }
    };

    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    Ok(value)
}

fn all_positive(fields: &[(&'static str, f64)]) -> Result<(), ValidationError> {
    match fields.iter().find(|(_, value)| *value <= 0.0) {
        Some((name, _)) => Err(ValidationError::NotPositive(name)),
        None => Ok(()),
    }
}
