//! Raw Operator Input

use serde::{Deserialize, Serialize};

/// Display names of the input fields, used in error messages
pub mod field {
    pub const GENDER: &str = "Gender";
    pub const AGE: &str = "Age";
    pub const HEIGHT: &str = "Height";
    pub const WEIGHT: &str = "Weight";
    pub const DURATION: &str = "Duration";
    pub const HEART_RATE: &str = "Heart Rate";
    pub const BODY_TEMPERATURE: &str = "Body Temperature";
}

/// A field that is either picked from a bucket menu or typed in manually
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionalInput {
    /// Selector value: "Low", "Medium", "High" or "Enter Manually"
    pub selection: String,
    /// Free-text override, read only when the selector is "Enter Manually"
    pub manual: String,
}

impl ConditionalInput {
    /// Input that picks a bucket by its label
    pub fn bucket(label: &str) -> Self {
        Self {
            selection: label.to_string(),
            manual: String::new(),
        }
    }

    /// Input that overrides the bucket with typed text
    pub fn manual(text: &str) -> Self {
        Self {
            selection: crate::Bucket::EnterManually.as_str().to_string(),
            manual: text.to_string(),
        }
    }
}

/// Raw field values collected for a single prediction request
///
/// All values are kept exactly as typed; trimming and coercion happen
/// during assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInputSet {
    pub gender: String,
    pub age: String,
    /// Height in centimeters
    pub height: String,
    /// Weight in kilograms
    pub weight: String,
    /// Exercise duration in minutes
    pub duration: String,
    pub heart_rate: ConditionalInput,
    pub body_temperature: ConditionalInput,
}

impl RawInputSet {
    /// The always-required fields, in validation order
    pub fn required_fields(&self) -> [(&'static str, &str); 5] {
        [
            (field::GENDER, &self.gender),
            (field::AGE, &self.age),
            (field::HEIGHT, &self.height),
            (field::WEIGHT, &self.weight),
            (field::DURATION, &self.duration),
        ]
    }

    /// The always-numeric fields, in coercion order
    pub fn numeric_fields(&self) -> [(&'static str, &str); 4] {
        [
            (field::AGE, &self.age),
            (field::HEIGHT, &self.height),
            (field::WEIGHT, &self.weight),
            (field::DURATION, &self.duration),
        ]
    }
}
