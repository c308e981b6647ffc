use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `[lat, lng]` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords(pub f64, pub f64);

impl Coords {
    pub fn lat(&self) -> f64 {
        self.0
    }

    pub fn lng(&self) -> f64 {
        self.1
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutType {
    Running,
    Cycling,
}

impl WorkoutType {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkoutType::Running => "running",
            WorkoutType::Cycling => "cycling",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            WorkoutType::Running => "🏃‍♂️",
            WorkoutType::Cycling => "🚴‍♀️",
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkoutType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "running" => Ok(WorkoutType::Running),
            "cycling" => Ok(WorkoutType::Cycling),
            other => Err(ValidationError::UnknownType(other.to_string())),
        }
    }
}

/// Variant-specific fields. Serialized inline with the record under a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WorkoutKind {
    Running { cadence: f64, pace: f64 },
    Cycling { elevation: f64, speed: f64 },
}

impl WorkoutKind {
    pub fn workout_type(&self) -> WorkoutType {
        match self {
            WorkoutKind::Running { .. } => WorkoutType::Running,
            WorkoutKind::Cycling { .. } => WorkoutType::Cycling,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedMetric {
    /// min/km
    Pace(f64),
    /// km/h
    Speed(f64),
}

impl DerivedMetric {
    pub fn value(self) -> f64 {
        match self {
            DerivedMetric::Pace(v) | DerivedMetric::Speed(v) => v,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            DerivedMetric::Pace(_) => "min/km",
            DerivedMetric::Speed(_) => "km/h",
        }
    }
}

/// Minutes per kilometer.
pub fn pace(distance: f64, duration: f64) -> f64 {
    duration / distance
}

/// Kilometers per hour, with `duration` in minutes.
pub fn speed(distance: f64, duration: f64) -> f64 {
    distance / (duration / 60.0)
}

/// Rejects a derived metric that overflowed or divided by an underflowed duration.
pub fn finite_metric(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite(field))
    }
}

/// Formats `"{Type} on {Month} {day}"`.
pub fn describe(workout_type: WorkoutType, date: DateTime<Utc>) -> String {
    let tag = workout_type.as_str();
    let mut chars = tag.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    let month = MONTHS[date.month0() as usize];
    format!("{} on {} {}", capitalized, month, date.day())
}

/// A logged activity. Everything except `clicks` is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    id: Uuid,
    date: DateTime<Utc>,
    coords: Coords,
    distance: f64,
    duration: f64,
    #[serde(default)]
    clicks: u32,
    description: String,
    #[serde(flatten)]
    kind: WorkoutKind,
}

impl Workout {
    /// Builds a running workout. Inputs are assumed valid; see `pipeline::validate`.
    pub fn running(
        coords: Coords,
        distance: f64,
        duration: f64,
        cadence: f64,
        date: DateTime<Utc>,
    ) -> Self {
        let kind = WorkoutKind::Running {
            cadence,
            pace: pace(distance, duration),
        };
        Self::assemble(coords, distance, duration, kind, date)
    }

    /// Builds a cycling workout. Inputs are assumed valid; see `pipeline::validate`.
    pub fn cycling(
        coords: Coords,
        distance: f64,
        duration: f64,
        elevation: f64,
        date: DateTime<Utc>,
    ) -> Self {
        let kind = WorkoutKind::Cycling {
            elevation,
            speed: speed(distance, duration),
        };
        Self::assemble(coords, distance, duration, kind, date)
    }

    fn assemble(
        coords: Coords,
        distance: f64,
        duration: f64,
        kind: WorkoutKind,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            coords,
            distance,
            duration,
            clicks: 0,
            description: describe(kind.workout_type(), date),
            kind,
        }
    }

    /// Checks a record read back from storage and recomputes its derived metric
    /// from the stored distance and duration.
    pub fn rehydrate(mut self) -> Result<Self, ValidationError> {
        if !self.coords.is_valid() {
            return Err(ValidationError::InvalidCoords {
                lat: self.coords.lat(),
                lng: self.coords.lng(),
            });
        }
        ensure_positive("distance", self.distance)?;
        ensure_positive("duration", self.duration)?;

        self.kind = match self.kind {
            WorkoutKind::Running { cadence, .. } => {
                ensure_positive("cadence", cadence)?;
                WorkoutKind::Running {
                    cadence,
                    pace: finite_metric("pace", pace(self.distance, self.duration))?,
                }
            }
            WorkoutKind::Cycling { elevation, .. } => {
                if !elevation.is_finite() {
                    return Err(ValidationError::NotFinite("elevation"));
                }
                WorkoutKind::Cycling {
                    elevation,
                    speed: finite_metric("speed", speed(self.distance, self.duration))?,
                }
            }
        };
        Ok(self)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn coords(&self) -> Coords {
        self.coords
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> &WorkoutKind {
        &self.kind
    }

    pub fn workout_type(&self) -> WorkoutType {
        self.kind.workout_type()
    }

    pub fn derived_metric(&self) -> DerivedMetric {
        match self.kind {
            WorkoutKind::Running { pace, .. } => DerivedMetric::Pace(pace),
            WorkoutKind::Cycling { speed, .. } => DerivedMetric::Speed(speed),
        }
    }

    pub fn register_click(&mut self) {
        self.clicks = self.clicks.saturating_add(1);
    }
}

fn ensure_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite(field));
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(())
}
