use crate::config::ResizeParameters;
use image::RgbImage;
use image::imageops::{self, FilterType};

/// Computes the factor an image of the given size is scaled by before inference.
///
/// The smaller side is brought to `min_side`; if that pushes the larger side past `max_side`,
/// the larger side is brought to `max_side` instead.
pub fn compute_resize_scale(width: u32, height: u32, parameters: ResizeParameters) -> f32 {
    let smallest_side = width.min(height) as f32;
    let largest_side = width.max(height) as f32;
    let mut scale = parameters.min_side as f32 / smallest_side;
    if largest_side * scale > parameters.max_side as f32 {
        scale = parameters.max_side as f32 / largest_side;
    }
    scale
}

/// Resizes an image for the network and returns it along with the scale factor used.
///
/// Predicted boxes are divided by the returned scale to map them back onto the original image.
pub fn resize_image(image: &RgbImage, parameters: ResizeParameters) -> (RgbImage, f32) {
    let scale = compute_resize_scale(image.width(), image.height(), parameters);
    let new_width = scaled_side(image.width(), scale);
    let new_height = scaled_side(image.height(), scale);
    let resized = imageops::resize(image, new_width, new_height, FilterType::Triangle);
    (resized, scale)
}

fn scaled_side(side: u32, scale: f32) -> u32 {
    ((side as f32 * scale).round() as u32).max(1)
}
