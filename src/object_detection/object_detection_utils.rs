use crate::annotations::bounding_box::BoundingBox;
use crate::annotations::detection::Detection;
use crate::error::{PredictError, PredictResult};
use itertools::izip;
use ndarray::{ArrayView1, ArrayView2, Axis};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads a file with the class names into a vector so that the number ids
/// which come directly from the ORT inference session can be given meaning.
///
/// Blank lines are skipped.
pub fn read_classes_txt_file(filepath: &Path) -> PredictResult<Vec<String>> {
    let mut classes: Vec<String> = Vec::new();
    for line in BufReader::new(File::open(filepath)?).lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            classes.push(name.to_string());
        }
    }
    Ok(classes)
}

/// Maps a numeric label to its class name.
pub fn label_to_name(classes: &[String], label: i64) -> PredictResult<&str> {
    usize::try_from(label)
        .ok()
        .and_then(|index| classes.get(index))
        .map(String::as_str)
        .ok_or(PredictError::UnknownLabel {
            label,
            num_classes: classes.len(),
        })
}

/// Picks which detections to keep.
///
/// Keeps the indices whose score is strictly above `score_threshold`, ordered by descending
/// score, and at most `max_detections` of them. Ties keep their original order. This is a plain
/// sort and slice, overlapping boxes are not suppressed.
pub fn select_top_detections(
    scores: ArrayView1<f32>,
    score_threshold: f32,
    max_detections: usize,
) -> Vec<usize> {
    let mut indices: Vec<usize> = scores
        .indexed_iter()
        .filter(|(_, score)| **score > score_threshold)
        .map(|(index, _)| index)
        .collect();
    indices.sort_by(|a, b| scores[*b].total_cmp(&scores[*a]));
    indices.truncate(max_detections);
    indices
}

/// Builds named detections from the selected rows of one image's network output.
pub fn decode_detections(
    boxes: ArrayView2<f32>,
    scores: ArrayView1<f32>,
    labels: ArrayView1<i64>,
    indices: &[usize],
    classes: &[String],
) -> PredictResult<Vec<Detection<BoundingBox>>> {
    let selected_boxes = boxes.select(Axis(0), indices);
    let selected_scores = scores.select(Axis(0), indices);
    let selected_labels = labels.select(Axis(0), indices);
    izip!(
        selected_boxes.outer_iter(),
        selected_scores.iter(),
        selected_labels.iter()
    )
    .map(|(coordinates, score, label)| -> PredictResult<Detection<BoundingBox>> {
        let annotation = BoundingBox::from_corners(
            coordinates[0],
            coordinates[1],
            coordinates[2],
            coordinates[3],
            label_to_name(classes, *label)?.to_string(),
        );
        Ok(Detection {
            annotation,
            confidence: *score,
        })
    })
    .collect()
}
