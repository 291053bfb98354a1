//! Single-image object detection.
//!
//! Loads an image, runs a pre-trained detector on it through the [`ObjectDetectionModel`] trait,
//! keeps the best scoring boxes mapped back onto the original image, and returns them either drawn
//! onto the image or as a table.
//!
//! ```no_run
//! use deepforest::{ImageSource, PredictionOutput, PredictionParameters, RetinaNet, predict_image};
//! use deepforest::image_utils::image_conversion::DataFormat;
//! use std::path::{Path, PathBuf};
//!
//! let mut model = RetinaNet::new(
//!     Path::new("./data/models/retinanet.onnx"),
//!     DataFormat::ChannelsLast,
//!     "retinanet".to_string(),
//! )?;
//! let parameters = PredictionParameters { return_plot: false, ..Default::default() };
//! let source = ImageSource::Path(PathBuf::from("./data/images/plot.png"));
//! if let PredictionOutput::Table(table) = predict_image(&mut model, source, &parameters)? {
//!     table.write_csv(std::io::stdout())?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod annotations;
pub mod config;
pub mod error;
pub mod image_utils;
pub mod object_detection;
pub mod table;
pub mod visualization;

pub use config::{PredictionParameters, ResizeParameters};
pub use error::{PredictError, PredictResult};
pub use image_utils::image_io::ImageSource;
pub use object_detection::object_detection_model::{ObjectDetectionModel, RawPredictions};
pub use object_detection::predict::{PredictionOutput, detect_image, predict_image};
pub use object_detection::retinanet::RetinaNet;
pub use table::DetectionTable;
