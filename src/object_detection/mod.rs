pub mod object_detection_model;
pub mod object_detection_utils;
pub mod ort_inference_session;
pub mod predict;
pub mod retinanet;
