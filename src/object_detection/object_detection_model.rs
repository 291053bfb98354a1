use crate::error::{PredictError, PredictResult};
use crate::image_utils::image_conversion::DataFormat;
use ndarray::{Array2, Array3, ArrayView4};

/// Raw network output for a batch of images, before any thresholding.
///
/// Boxes are (batch, detections, 4) in xyxy order and in the coordinates of the resized network
/// input. Scores and labels are (batch, detections). Padding entries may carry a negative label
/// and score.
#[derive(Clone, Debug, PartialEq)]
pub struct RawPredictions {
    pub boxes: Array3<f32>,
    pub scores: Array2<f32>,
    pub labels: Array2<i64>,
}

impl RawPredictions {
    /// Checks the three arrays describe the same detections.
    pub fn new(
        boxes: Array3<f32>,
        scores: Array2<f32>,
        labels: Array2<i64>,
    ) -> PredictResult<Self> {
        let (batch, detections, coordinates) = boxes.dim();
        if coordinates != 4 {
            return Err(PredictError::MalformedOutput(format!(
                "boxes must have 4 coordinates, got {}.",
                coordinates
            )));
        }
        if scores.dim() != (batch, detections) {
            return Err(PredictError::MalformedOutput(format!(
                "scores have shape {:?} but boxes have shape {:?}.",
                scores.shape(),
                boxes.shape()
            )));
        }
        if labels.dim() != (batch, detections) {
            return Err(PredictError::MalformedOutput(format!(
                "labels have shape {:?} but boxes have shape {:?}.",
                labels.shape(),
                boxes.shape()
            )));
        }
        Ok(RawPredictions {
            boxes,
            scores,
            labels,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.scores.dim().0
    }
}

/// Defines a trait that all object detection models must follow.
///
/// A model takes a preprocessed batch laid out in [`Self::data_format`] and returns boxes, scores
/// and labels for every image of the batch. Running a model may need mutable access to its
/// runtime session, hence `&mut self`.
pub trait ObjectDetectionModel {
    fn predict_on_batch(&mut self, batch: ArrayView4<f32>) -> PredictResult<RawPredictions>;

    fn data_format(&self) -> DataFormat {
        DataFormat::ChannelsLast
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_shapes_are_accepted() {
        let predictions = RawPredictions::new(
            Array3::zeros((1, 5, 4)),
            Array2::zeros((1, 5)),
            Array2::zeros((1, 5)),
        )
        .unwrap();
        assert_eq!(predictions.batch_size(), 1);
    }

    #[test]
    fn wrong_coordinate_count_is_rejected() {
        let result = RawPredictions::new(
            Array3::zeros((1, 5, 5)),
            Array2::zeros((1, 5)),
            Array2::zeros((1, 5)),
        );
        assert!(matches!(result, Err(PredictError::MalformedOutput(_))));
    }

    #[test]
    fn mismatched_scores_are_rejected() {
        let result = RawPredictions::new(
            Array3::zeros((1, 5, 4)),
            Array2::zeros((1, 4)),
            Array2::zeros((1, 5)),
        );
        assert!(matches!(result, Err(PredictError::MalformedOutput(_))));
    }

    #[test]
    fn mismatched_labels_are_rejected() {
        let result = RawPredictions::new(
            Array3::zeros((1, 5, 4)),
            Array2::zeros((1, 5)),
            Array2::zeros((2, 5)),
        );
        assert!(matches!(result, Err(PredictError::MalformedOutput(_))));
    }
}
