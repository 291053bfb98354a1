use ort::session::Session;
use std::path::Path;
use tracing::info;

/// An onnxruntime inference session.
///
/// The object detection models in this project are wrappers around an ONNX inference session
/// that handles running the network on hardware.
pub struct OrtInferenceSession {
    pub session: Session,
}

impl OrtInferenceSession {
    pub fn new(model_path: &Path) -> ort::Result<Self> {
        let session = Session::builder()?.commit_from_file(model_path)?;
        info!(
            model = %model_path.display(),
            inputs = session.inputs.len(),
            outputs = session.outputs.len(),
            "loaded onnx model"
        );
        Ok(Self { session })
    }
}
