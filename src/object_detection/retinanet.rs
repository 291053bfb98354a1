use crate::error::{PredictError, PredictResult};
use crate::image_utils::image_conversion::DataFormat;
use crate::object_detection::object_detection_model::{ObjectDetectionModel, RawPredictions};
use crate::object_detection::ort_inference_session::OrtInferenceSession;
use ndarray::{Array2, Array3, ArrayD, ArrayView4, Ix2, Ix3};
use ort::inputs;
use ort::value::{DynValue, TensorRef};
use std::path::Path;
use tracing::debug;

/// A RetinaNet detector exported to ONNX with its box decoding and filtering layers attached.
///
/// The exported graph takes one preprocessed image batch and returns at least three outputs:
/// boxes (batch, n, 4), scores (batch, n) and labels (batch, n). Anything after the third output
/// is ignored.
pub struct RetinaNet {
    ort_session: OrtInferenceSession,
    data_format: DataFormat,
    model_name: String,
}

impl RetinaNet {
    pub fn new(model_path: &Path, data_format: DataFormat, model_name: String) -> ort::Result<Self> {
        let ort_session = OrtInferenceSession::new(model_path)?;
        Ok(RetinaNet {
            ort_session,
            data_format,
            model_name,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl ObjectDetectionModel for RetinaNet {
    fn predict_on_batch(&mut self, batch: ArrayView4<f32>) -> PredictResult<RawPredictions> {
        let input = batch.as_standard_layout().into_owned();
        debug!(model = %self.model_name, shape = ?input.shape(), "running inference");
        let outputs = self
            .ort_session
            .session
            .run(inputs![TensorRef::from_array_view(&input)?])?;
        if outputs.len() < 3 {
            return Err(PredictError::MalformedOutput(format!(
                "expected boxes, scores and labels outputs, got {} outputs.",
                outputs.len()
            )));
        }
        let boxes: Array3<f32> = outputs[0]
            .try_extract_array::<f32>()?
            .to_owned()
            .into_dimensionality::<Ix3>()
            .map_err(|e| PredictError::MalformedOutput(format!("boxes: {}", e)))?;
        let scores: Array2<f32> = outputs[1]
            .try_extract_array::<f32>()?
            .to_owned()
            .into_dimensionality::<Ix2>()
            .map_err(|e| PredictError::MalformedOutput(format!("scores: {}", e)))?;
        let labels: Array2<i64> = extract_labels(&outputs[2])?
            .into_dimensionality::<Ix2>()
            .map_err(|e| PredictError::MalformedOutput(format!("labels: {}", e)))?;
        RawPredictions::new(boxes, scores, labels)
    }

    fn data_format(&self) -> DataFormat {
        self.data_format
    }
}

/// Exporters disagree on the label type, accept the common integer and float encodings.
fn extract_labels(value: &DynValue) -> PredictResult<ArrayD<i64>> {
    if let Ok(labels) = value.try_extract_array::<i64>() {
        return Ok(labels.to_owned());
    }
    if let Ok(labels) = value.try_extract_array::<i32>() {
        return Ok(labels.mapv(i64::from));
    }
    let labels = value.try_extract_array::<f32>()?;
    if let Some(label) = labels.iter().find(|label| !label.is_finite()) {
        return Err(PredictError::MalformedOutput(format!(
            "labels must be finite, got {}.",
            label
        )));
    }
    Ok(labels.mapv(|label| label as i64))
}
