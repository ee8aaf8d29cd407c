//! Feature Vector Assembly

use crate::bucket::{Bucket, BucketTable, BODY_TEMPERATURE_BUCKETS, HEART_RATE_BUCKETS};
use crate::error::AssemblyError;
use crate::features::FeatureVector;
use crate::gender::Gender;
use crate::input::{field, ConditionalInput, RawInputSet};
use tracing::debug;

/// Validates raw operator input and assembles the estimator's feature vector
///
/// Checks run in a fixed order so that the more specific failure wins:
/// presence, gender category, numeric coercion (age, height, weight,
/// duration), then heart rate and body temperature resolution. The first
/// failure stops assembly.
#[derive(Debug, Clone)]
pub struct FeatureAssembler {
    heart_rate: BucketTable,
    body_temperature: BucketTable,
}

impl FeatureAssembler {
    /// Create an assembler with the fixed bucket tables
    pub fn new() -> Self {
        Self {
            heart_rate: HEART_RATE_BUCKETS,
            body_temperature: BODY_TEMPERATURE_BUCKETS,
        }
    }

    /// Assemble a feature vector from one set of raw inputs
    pub fn assemble(&self, raw: &RawInputSet) -> Result<FeatureVector, AssemblyError> {
        let missing: Vec<&'static str> = raw
            .required_fields()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            debug!("Rejecting input with missing fields: {:?}", missing);
            return Err(AssemblyError::MissingField { missing });
        }

        let gender: Gender = raw.gender.parse()?;

        let mut numbers = [0.0; 4];
        for (slot, (name, value)) in numbers.iter_mut().zip(raw.numeric_fields()) {
            *slot = parse_number(name, value)?;
        }
        let [age, height, weight, duration] = numbers;

        let heart_rate = resolve(field::HEART_RATE, &raw.heart_rate, &self.heart_rate)?;
        let body_temperature = resolve(
            field::BODY_TEMPERATURE,
            &raw.body_temperature,
            &self.body_temperature,
        )?;

        let features = FeatureVector::from_parts(
            gender,
            age,
            height,
            weight,
            duration,
            heart_rate,
            body_temperature,
        );
        debug!("Assembled feature vector: {:?}", features.values());
        Ok(features)
    }
}

impl Default for FeatureAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble a feature vector with the default assembler
pub fn assemble(raw: &RawInputSet) -> Result<FeatureVector, AssemblyError> {
    FeatureAssembler::new().assemble(raw)
}

/// Parse trimmed text as a finite decimal
fn parse_number(name: &'static str, raw: &str) -> Result<f64, AssemblyError> {
    let text = raw.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AssemblyError::NumericFormat {
            field: name,
            value: text.to_string(),
        }),
    }
}

/// Resolve a conditional field to either its manual value or its bucket constant
fn resolve(
    name: &'static str,
    input: &ConditionalInput,
    table: &BucketTable,
) -> Result<f64, AssemblyError> {
    let unknown = || AssemblyError::InvalidCategory {
        field: name,
        value: input.selection.clone(),
        expected: "Low, Medium, High or Enter Manually",
    };

    match Bucket::from_label(&input.selection) {
        Some(Bucket::EnterManually) => parse_number(name, &input.manual),
        Some(bucket) => table.value(bucket).ok_or_else(unknown),
        None => Err(unknown()),
    }
}
