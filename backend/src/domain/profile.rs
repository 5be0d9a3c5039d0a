//! Body profile attributes captured at registration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Upper bound on a plausible body weight, in kilograms.
pub const WEIGHT_MAX_KG: f64 = 700.0;
/// Upper bound on a plausible height, in centimetres.
pub const HEIGHT_MAX_CM: i32 = 300;
/// Upper bound on a plausible age, in years.
pub const AGE_MAX: i32 = 150;

/// Validation errors raised by profile value types.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileValidationError {
    UnknownGoal { value: String },
    WeightOutOfRange { value: f64, max: f64 },
    HeightOutOfRange { value: i32, max: i32 },
    AgeOutOfRange { value: i32, max: i32 },
}

impl fmt::Display for ProfileValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGoal { value } => {
                write!(f, "goal must be one of lose, gain, maintain; got `{value}`")
            }
            Self::WeightOutOfRange { value, max } => {
                write!(f, "weight must be a positive number up to {max} kg; got {value}")
            }
            Self::HeightOutOfRange { value, max } => {
                write!(f, "height must be between 1 and {max} cm; got {value}")
            }
            Self::AgeOutOfRange { value, max } => {
                write!(f, "age must be between 1 and {max}; got {value}")
            }
        }
    }
}

impl std::error::Error for ProfileValidationError {}

/// Body-composition goal. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Reduce body weight.
    Lose,
    /// Increase body weight.
    Gain,
    /// Hold body weight steady.
    Maintain,
}

impl Goal {
    /// Stored spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lose => "lose",
            Self::Gain => "gain",
            Self::Maintain => "maintain",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = ProfileValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lose" => Ok(Self::Lose),
            "gain" => Ok(Self::Gain),
            "maintain" => Ok(Self::Maintain),
            _ => Err(ProfileValidationError::UnknownGoal {
                value: value.to_owned(),
            }),
        }
    }
}

/// Body weight in kilograms.
///
/// ## Invariants
/// - finite, strictly positive and at most [`WEIGHT_MAX_KG`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct WeightKg(f64);

impl WeightKg {
    /// Validate a weight.
    pub fn new(value: f64) -> Result<Self, ProfileValidationError> {
        if !value.is_finite() || value <= 0.0 || value > WEIGHT_MAX_KG {
            return Err(ProfileValidationError::WeightOutOfRange {
                value,
                max: WEIGHT_MAX_KG,
            });
        }
        Ok(Self(value))
    }

    /// Kilograms as a float.
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Height in whole centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeightCm(i32);

impl HeightCm {
    /// Validate a height.
    pub fn new(value: i32) -> Result<Self, ProfileValidationError> {
        if !(1..=HEIGHT_MAX_CM).contains(&value) {
            return Err(ProfileValidationError::HeightOutOfRange {
                value,
                max: HEIGHT_MAX_CM,
            });
        }
        Ok(Self(value))
    }

    /// Centimetres.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Age in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Age(i32);

impl Age {
    /// Validate an age.
    pub fn new(value: i32) -> Result<Self, ProfileValidationError> {
        if !(1..=AGE_MAX).contains(&value) {
            return Err(ProfileValidationError::AgeOutOfRange {
                value,
                max: AGE_MAX,
            });
        }
        Ok(Self(value))
    }

    /// Years.
    pub fn get(self) -> i32 {
        self.0
    }
}

/// Profile attributes, one row per user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAttributes {
    pub is_male: bool,
    pub height: HeightCm,
    pub goal: Goal,
    pub weight_goal: WeightKg,
    pub age: Age,
}

/// Profile attributes joined with the most recent weight sample.
///
/// This is the canonical input to downstream calculations such as
/// [`crate::domain::NutritionGoals`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAttributes {
    pub user_id: UserId,
    pub attributes: ProfileAttributes,
    pub current_weight: WeightKg,
}
