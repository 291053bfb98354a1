use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::Detection;
use crate::config::PredictionParameters;
use crate::error::{PredictError, PredictResult};
use crate::image_utils::image_conversion::{convert_rgb_image_to_preprocessed_array, to_data_format};
use crate::image_utils::image_io::ImageSource;
use crate::image_utils::resize::resize_image;
use crate::object_detection::object_detection_model::ObjectDetectionModel;
use crate::object_detection::object_detection_utils::{decode_detections, select_top_detections};
use crate::table::DetectionTable;
use crate::visualization::draw::{DEFAULT_THICKNESS, draw_detections};
use image::RgbImage;
use ndarray::Axis;
use tracing::debug;

/// What `predict_image` hands back.
#[derive(Debug)]
pub enum PredictionOutput {
    /// The input image with the detections drawn on it.
    Plot(RgbImage),
    /// One row per kept detection.
    Table(DetectionTable),
}

/// Runs the model on one image and keeps its best detections.
///
/// The image is preprocessed and resized for the network, boxes are mapped back onto the original
/// image, detections scoring at or below `score_threshold` are dropped, and the remaining ones are
/// sorted by descending score and capped at `max_detections`.
pub fn detect_image<M: ObjectDetectionModel>(
    model: &mut M,
    image: &RgbImage,
    parameters: &PredictionParameters,
) -> PredictResult<Vec<Detection<BoundingBox>>> {
    parameters.validate()?;
    let (resized, scale) = resize_image(image, parameters.resize);
    debug!(
        width = image.width(),
        height = image.height(),
        resized_width = resized.width(),
        resized_height = resized.height(),
        scale,
        "resized image for inference"
    );
    let batch = to_data_format(
        convert_rgb_image_to_preprocessed_array(&resized),
        model.data_format(),
    );

    let mut predictions = model.predict_on_batch(batch.view())?;
    if predictions.batch_size() == 0 {
        return Err(PredictError::MalformedOutput(
            "model returned an empty batch.".to_string(),
        ));
    }
    predictions.boxes.mapv_inplace(|coordinate| coordinate / scale);

    let scores = predictions.scores.index_axis(Axis(0), 0);
    let indices =
        select_top_detections(scores, parameters.score_threshold, parameters.max_detections);
    debug!(
        candidates = scores.len(),
        kept = indices.len(),
        score_threshold = parameters.score_threshold,
        "selected detections"
    );
    decode_detections(
        predictions.boxes.index_axis(Axis(0), 0),
        scores,
        predictions.labels.index_axis(Axis(0), 0),
        &indices,
        &parameters.classes,
    )
}

/// Predicts bounding boxes for a single image.
///
/// If `parameters.return_plot` is set the detections are drawn onto the image, which is returned.
/// Otherwise the detections are returned as a table, possibly without rows.
pub fn predict_image<M: ObjectDetectionModel>(
    model: &mut M,
    source: ImageSource,
    parameters: &PredictionParameters,
) -> PredictResult<PredictionOutput> {
    let mut image = source.load()?;
    let detections = detect_image(model, &image, parameters)?;
    if parameters.return_plot {
        draw_detections(
            &mut image,
            &detections,
            &parameters.classes,
            parameters.score_threshold,
            DEFAULT_THICKNESS,
        );
        Ok(PredictionOutput::Plot(image))
    } else {
        Ok(PredictionOutput::Table(DetectionTable::from_detections(
            &detections,
        )))
    }
}
