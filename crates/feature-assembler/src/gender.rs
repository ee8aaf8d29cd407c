//! Gender Parsing and Encoding

use crate::error::AssemblyError;
use crate::input::field;
use std::str::FromStr;

/// Operator gender as understood by the estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Binary encoding fixed by the estimator's training data
    pub fn encode(self) -> f64 {
        match self {
            Gender::Male => 0.0,
            Gender::Female => 1.0,
        }
    }
}

impl FromStr for Gender {
    type Err = AssemblyError;

    /// Parse a raw value, ignoring case and surrounding whitespace
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(AssemblyError::InvalidCategory {
                field: field::GENDER,
                value: raw.trim().to_string(),
                expected: "'male' or 'female'",
            }),
        }
    }
}
