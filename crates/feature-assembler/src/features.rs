//! Feature Vector

use crate::error::AssemblyError;
use crate::gender::Gender;
use serde::Serialize;

/// Number of features consumed by the estimator
pub const FEATURE_DIMENSION: usize = 7;

/// Feature names in vector order, as used when the estimator was trained
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "Gender",
    "Age",
    "Height",
    "Weight",
    "Duration",
    "Heart_Rate",
    "Body_Temp",
];

const GENDER: usize = 0;
const AGE: usize = 1;
const HEIGHT: usize = 2;
const WEIGHT: usize = 3;
const DURATION: usize = 4;
const HEART_RATE: usize = 5;
const BODY_TEMPERATURE: usize = 6;

/// Ordered feature vector for the estimator
///
/// Always holds exactly [`FEATURE_DIMENSION`] finite values with the gender
/// element equal to 0 or 1. Changing the order breaks the contract with the
/// trained model without any visible failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    values: [f64; FEATURE_DIMENSION],
}

impl FeatureVector {
    pub(crate) fn from_parts(
        gender: Gender,
        age: f64,
        height: f64,
        weight: f64,
        duration: f64,
        heart_rate: f64,
        body_temperature: f64,
    ) -> Self {
        Self {
            values: [
                gender.encode(),
                age,
                height,
                weight,
                duration,
                heart_rate,
                body_temperature,
            ],
        }
    }

    /// Build a vector from already-encoded values, checking its invariants
    pub fn from_values(values: [f64; FEATURE_DIMENSION]) -> Result<Self, AssemblyError> {
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(AssemblyError::NumericFormat {
                field: FEATURE_NAMES[idx],
                value: values[idx].to_string(),
            });
        }

        if values[GENDER] != 0.0 && values[GENDER] != 1.0 {
            return Err(AssemblyError::InvalidCategory {
                field: FEATURE_NAMES[GENDER],
                value: values[GENDER].to_string(),
                expected: "0 or 1",
            });
        }

        Ok(Self { values })
    }

    /// Raw values in estimator order
    pub fn values(&self) -> &[f64; FEATURE_DIMENSION] {
        &self.values
    }

    /// Values narrowed to `f32` for runtimes with single-precision inputs
    pub fn to_f32(&self) -> [f32; FEATURE_DIMENSION] {
        self.values.map(|v| v as f32)
    }

    pub fn gender(&self) -> f64 {
        self.values[GENDER]
    }

    pub fn age(&self) -> f64 {
        self.values[AGE]
    }

    pub fn height(&self) -> f64 {
        self.values[HEIGHT]
    }

    pub fn weight(&self) -> f64 {
        self.values[WEIGHT]
    }

    pub fn duration(&self) -> f64 {
        self.values[DURATION]
    }

    pub fn heart_rate(&self) -> f64 {
        self.values[HEART_RATE]
    }

    pub fn body_temperature(&self) -> f64 {
        self.values[BODY_TEMPERATURE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_order() {
        let features =
            FeatureVector::from_parts(Gender::Female, 30.0, 170.0, 65.0, 20.0, 100.0, 40.0);
        assert_eq!(
            features.values(),
            &[1.0, 30.0, 170.0, 65.0, 20.0, 100.0, 40.0]
        );
        assert_eq!(features.duration(), 20.0);
        assert_eq!(features.body_temperature(), 40.0);
    }

    #[test]
    fn test_from_values_rejects_non_finite() {
        let err = FeatureVector::from_values([0.0, 30.0, f64::NAN, 65.0, 20.0, 100.0, 40.0])
            .unwrap_err();
        assert!(matches!(err, AssemblyError::NumericFormat { field: "Height", .. }));
    }

    #[test]
    fn test_from_values_rejects_bad_gender() {
        let err = FeatureVector::from_values([0.5, 30.0, 170.0, 65.0, 20.0, 100.0, 40.0])
            .unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidCategory { field: "Gender", .. }));
    }

    #[test]
    fn test_to_f32() {
        let features =
            FeatureVector::from_values([0.0, 25.0, 180.0, 80.0, 15.0, 95.5, 39.5]).unwrap();
        assert_eq!(features.to_f32()[5], 95.5_f32);
    }
}
