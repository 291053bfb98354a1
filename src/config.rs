use crate::error::{PredictError, PredictResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// How the input image is resized before it is given to the network.
///
/// The image is scaled so that its smaller side becomes `min_side`, unless that would make the
/// larger side exceed `max_side`, in which case the larger side becomes `max_side`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ResizeParameters {
    pub min_side: u32,
    pub max_side: u32,
}

impl Default for ResizeParameters {
    fn default() -> Self {
        ResizeParameters {
            min_side: 800,
            max_side: 1333,
        }
    }
}

/// Parameters of a single `predict_image` call.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PredictionParameters {
    /// Minimum probability score to be included in final boxes, ranging from 0 to 1.
    pub score_threshold: f32,
    /// Maximum number of bounding box predictions per image.
    pub max_detections: usize,
    /// Draw the boxes onto the image instead of returning a table.
    pub return_plot: bool,
    /// Class names, indexed by the numeric label the model emits.
    pub classes: Vec<String>,
    pub resize: ResizeParameters,
}

impl Default for PredictionParameters {
    fn default() -> Self {
        PredictionParameters {
            score_threshold: 0.05,
            max_detections: 200,
            return_plot: true,
            classes: vec!["Tree".to_string()],
            resize: ResizeParameters::default(),
        }
    }
}

impl PredictionParameters {
    /// Reads parameters from a json file. Missing fields take their default value.
    pub fn from_json_file(filepath: &Path) -> PredictResult<Self> {
        let reader = BufReader::new(File::open(filepath)?);
        let parameters: PredictionParameters = serde_json::from_reader(reader)?;
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn validate(&self) -> PredictResult<()> {
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(PredictError::InvalidParameter {
                name: "score_threshold",
                reason: format!("must be in [0, 1], got {}.", self.score_threshold),
            });
        }
        if self.max_detections == 0 {
            return Err(PredictError::InvalidParameter {
                name: "max_detections",
                reason: "must be a positive integer.".to_string(),
            });
        }
        if self.classes.is_empty() {
            return Err(PredictError::InvalidParameter {
                name: "classes",
                reason: "at least one class name is required.".to_string(),
            });
        }
        if self.resize.min_side == 0 || self.resize.max_side == 0 {
            return Err(PredictError::InvalidParameter {
                name: "resize",
                reason: format!(
                    "sides must be positive, got min_side {} and max_side {}.",
                    self.resize.min_side, self.resize.max_side
                ),
            });
        }
        Ok(())
    }
}
