//! ONNX Estimator using tract

use crate::{Estimator, EstimatorError};
use feature_assembler::{FeatureVector, FEATURE_DIMENSION};
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info};

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Regressor exported to ONNX, taking a `[1, 7]` f32 input
pub struct OnnxEstimator {
    model: OnnxPlan,
}

impl OnnxEstimator {
    /// Load and optimize an ONNX model
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EstimatorError> {
        let path = path.as_ref();
        info!("Loading ONNX model from {}", path.display());

        let estimator = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(Self::from_model)
            .map_err(|e| EstimatorError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

        info!("ONNX model loaded successfully");
        Ok(estimator)
    }

    /// Fix the input to `[1, 7]` f32, then optimize the parsed graph
    fn from_model(model: InferenceModel) -> TractResult<Self> {
        let model = model
            .with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into())?
            .into_optimized()?
            .into_runnable()?;
        Ok(Self { model })
    }
}

impl Estimator for OnnxEstimator {
    fn predict(&self, features: FeatureVector) -> Result<f64, EstimatorError> {
        let values = features.to_f32();
        let input = Tensor::from_shape(&[1, FEATURE_DIMENSION], &values[..]).map_err(|e| {
            EstimatorError::InvalidInputShape {
                expected: format!("[1, {}]", FEATURE_DIMENSION),
                actual: e.to_string(),
            }
        })?;

        let outputs = self
            .model
            .run(tvec!(input.into()))
            .map_err(|e| EstimatorError::InferenceFailed(e.to_string()))?;

        let output = outputs.first().ok_or_else(|| {
            EstimatorError::InferenceFailed("model produced no outputs".to_string())
        })?;
        let output = output
            .cast_to::<f64>()
            .map_err(|e| EstimatorError::InferenceFailed(e.to_string()))?;
        let prediction = output
            .as_slice::<f64>()
            .map_err(|e| EstimatorError::InferenceFailed(e.to_string()))?
            .first()
            .copied()
            .ok_or_else(|| EstimatorError::InferenceFailed("model output is empty".to_string()))?;

        debug!("ONNX prediction: {:.4}", prediction);
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tract_onnx::pb::tensor_shape_proto::{dimension, Dimension};
    use tract_onnx::pb::{
        type_proto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto, TensorProto,
        TensorShapeProto, TypeProto, ValueInfoProto,
    };

    /// ONNX `TensorProto.DataType.FLOAT`
    const FLOAT: i32 = 1;

    fn float_value(name: &str, dims: &[i64]) -> ValueInfoProto {
        let dim = dims
            .iter()
            .map(|&d| Dimension {
                value: Some(dimension::Value::DimValue(d)),
                ..Default::default()
            })
            .collect();

        ValueInfoProto {
            name: name.to_string(),
            r#type: Some(TypeProto {
                value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                    elem_type: FLOAT,
                    shape: Some(TensorShapeProto {
                        dim,
                        ..Default::default()
                    }),
                    ..Default::default()
                })),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// `calories = input[1, 7] x weights[7, 1] + bias`
    fn linear_model(weights: [f32; FEATURE_DIMENSION], bias: f32) -> ModelProto {
        let graph = GraphProto {
            name: "linear".to_string(),
            node: vec![
                NodeProto {
                    input: vec!["input".to_string(), "weights".to_string()],
                    output: vec!["product".to_string()],
                    op_type: "MatMul".to_string(),
                    ..Default::default()
                },
                NodeProto {
                    input: vec!["product".to_string(), "bias".to_string()],
                    output: vec!["calories".to_string()],
                    op_type: "Add".to_string(),
                    ..Default::default()
                },
            ],
            initializer: vec![
                TensorProto {
                    name: "weights".to_string(),
                    dims: vec![FEATURE_DIMENSION as i64, 1],
                    data_type: FLOAT,
                    float_data: weights.to_vec(),
                    ..Default::default()
                },
                TensorProto {
                    name: "bias".to_string(),
                    dims: vec![1],
                    data_type: FLOAT,
                    float_data: vec![bias],
                    ..Default::default()
                },
            ],
            input: vec![float_value("input", &[1, FEATURE_DIMENSION as i64])],
            output: vec![float_value("calories", &[1, 1])],
            ..Default::default()
        };

        ModelProto {
            ir_version: 7,
            opset_import: vec![OperatorSetIdProto {
                domain: String::new(),
                version: 13,
            }],
            graph: Some(graph),
            ..Default::default()
        }
    }

    fn estimator(weights: [f32; FEATURE_DIMENSION], bias: f32) -> OnnxEstimator {
        let model = tract_onnx::onnx()
            .model_for_proto_model(&linear_model(weights, bias))
            .unwrap();
        OnnxEstimator::from_model(model).unwrap()
    }

    fn features() -> FeatureVector {
        FeatureVector::from_values([1.0, 30.0, 170.0, 65.0, 20.0, 100.0, 40.0]).unwrap()
    }

    #[test]
    fn test_predict_reads_first_output_element() {
        // 5 kcal per minute plus half the heart rate, minus 10
        let onnx = estimator([0.0, 0.0, 0.0, 0.0, 5.0, 0.5, 0.0], -10.0);
        assert_eq!(onnx.predict(features()).unwrap(), 140.0);
    }

    #[test]
    fn test_predict_feeds_all_seven_features() {
        let onnx = estimator([1.0; FEATURE_DIMENSION], 0.0);
        assert_eq!(onnx.predict(features()).unwrap(), 426.0);
    }

    #[test]
    fn test_gender_position() {
        let onnx = estimator([100.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], 1.5);
        assert_eq!(onnx.predict(features()).unwrap(), 101.5);

        let male = FeatureVector::from_values([0.0, 30.0, 170.0, 65.0, 20.0, 100.0, 40.0]).unwrap();
        assert_eq!(onnx.predict(male).unwrap(), 1.5);
    }

    #[test]
    fn test_missing_model_file() {
        let err = OnnxEstimator::load("models/missing.onnx").err().unwrap();
        assert!(matches!(err, EstimatorError::ModelLoadError(_)));
        assert!(err.to_string().contains("missing.onnx"));
    }
}
