//! Feature Assembly
//!
//! Turns the raw text collected from an operator into the fixed-order
//! feature vector consumed by the calorie estimator.
//!
//! Validation is all-or-nothing: [`FeatureAssembler::assemble`] either
//! returns a complete [`FeatureVector`] or a classified [`AssemblyError`].

mod assembler;
mod bucket;
mod error;
mod features;
mod gender;
mod input;

pub use assembler::{assemble, FeatureAssembler};
pub use bucket::{Bucket, BucketTable, BODY_TEMPERATURE_BUCKETS, HEART_RATE_BUCKETS};
pub use error::AssemblyError;
pub use features::{FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
pub use gender::Gender;
pub use input::{field, ConditionalInput, RawInputSet};
