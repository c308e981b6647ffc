use serde::{Deserialize, Serialize};

use crate::types::workout::Coords;

/// A form value as submitted: either already a number or the raw input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        RawNumber::Number(value)
    }
}

impl From<&str> for RawNumber {
    fn from(value: &str) -> Self {
        RawNumber::Text(value.to_string())
    }
}

/// Body of a form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkoutInput {
    #[serde(rename = "type")]
    pub workout_type: String,
    pub coords: Coords,
    pub distance: Option<RawNumber>,
    pub duration: Option<RawNumber>,
    #[serde(default)]
    pub cadence: Option<RawNumber>,
    #[serde(default)]
    pub elevation: Option<RawNumber>,
}
