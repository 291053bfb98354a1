use thiserror::Error;

/// Everything that can go wrong while predicting on an image.
///
/// Failures from the image codec, the inference runtime and the output writers are wrapped
/// as-is. The remaining variants cover the few conditions this crate checks itself.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("No image given, either an image path or a raw image is required.")]
    MissingImage,
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
    #[error("Label {label} has no class name, only {num_classes} classes are known.")]
    UnknownLabel { label: i64, num_classes: usize },
    #[error("Invalid bounding box: {0}")]
    InvalidBox(String),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Ort(#[from] ort::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type PredictResult<T> = Result<T, PredictError>;
