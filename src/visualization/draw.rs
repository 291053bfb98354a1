use crate::annotations::bounding_box::BoundingBoxGeometry;
use crate::annotations::detection::Detection;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

/// Box colours by class index. Classes past the end of the palette are drawn in [`FALLBACK_COLOR`].
pub const LABEL_COLORS: [[u8; 3]; 12] = [
    [255, 56, 56],
    [255, 157, 151],
    [255, 112, 31],
    [255, 178, 29],
    [207, 210, 49],
    [72, 249, 10],
    [146, 204, 23],
    [61, 219, 134],
    [26, 147, 52],
    [0, 212, 187],
    [44, 153, 168],
    [0, 194, 255],
];

pub const FALLBACK_COLOR: [u8; 3] = [0, 255, 0];

pub const DEFAULT_THICKNESS: u32 = 2;

pub fn label_color(label: usize) -> Rgb<u8> {
    Rgb(*LABEL_COLORS.get(label).unwrap_or(&FALLBACK_COLOR))
}

/// Draws a hollow box `thickness` pixels wide, growing inward from the box edges.
///
/// Parts of the box outside the image are clipped. Coordinates are first clamped to one pixel
/// outside the image, so edges beyond it are not drawn and huge boxes cannot overflow.
pub fn draw_box<T: BoundingBoxGeometry>(
    image: &mut RgbImage,
    annotation: &T,
    color: Rgb<u8>,
    thickness: u32,
) {
    let (left, top, right, bottom) = annotation.as_xyxy();
    let max_x = image.width() as f32;
    let max_y = image.height() as f32;
    let (left, top, right, bottom) = (
        clamp_coordinate(left, max_x),
        clamp_coordinate(top, max_y),
        clamp_coordinate(right, max_x),
        clamp_coordinate(bottom, max_y),
    );
    for inset in 0..thickness as i32 {
        let width = right - left - 2 * inset + 1;
        let height = bottom - top - 2 * inset + 1;
        if width <= 0 || height <= 0 {
            break;
        }
        let rect = Rect::at(left + inset, top + inset).of_size(width as u32, height as u32);
        draw_hollow_rect_mut(image, rect, color);
    }
}

/// NaN lands on 0, like a plain cast.
fn clamp_coordinate(coordinate: f32, max: f32) -> i32 {
    coordinate.clamp(-1.0, max) as i32
}

/// Draws every detection scoring at least `score_threshold` onto the image in place.
///
/// The colour of a box is picked by the position of its category in `classes`.
pub fn draw_detections<T: BoundingBoxGeometry>(
    image: &mut RgbImage,
    detections: &[Detection<T>],
    classes: &[String],
    score_threshold: f32,
    thickness: u32,
) {
    for detection in detections
        .iter()
        .filter(|detection| detection.confidence >= score_threshold)
    {
        let color = classes
            .iter()
            .position(|name| name == detection.annotation.category())
            .map(label_color)
            .unwrap_or(Rgb(FALLBACK_COLOR));
        draw_box(image, &detection.annotation, color, thickness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::bounding_box::BoundingBox;

    fn detection(
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        category: &str,
        confidence: f32,
    ) -> Detection<BoundingBox> {
        Detection {
            annotation: BoundingBox::new(left, top, right, bottom, category.to_string()).unwrap(),
            confidence,
        }
    }

    #[test]
    fn draw_box_outlines_with_thickness() {
        let mut image = RgbImage::new(20, 20);
        let red = Rgb([255, 0, 0]);
        let bbox = BoundingBox::new(2_f32, 2_f32, 12_f32, 12_f32, "Tree".to_string()).unwrap();
        draw_box(&mut image, &bbox, red, 2);
        // Outer and inner ring of the outline.
        assert_eq!(image.get_pixel(2, 2), &red);
        assert_eq!(image.get_pixel(12, 12), &red);
        assert_eq!(image.get_pixel(3, 7), &red);
        assert_eq!(image.get_pixel(11, 7), &red);
        // Inside and outside the box stay untouched.
        assert_eq!(image.get_pixel(7, 7), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(4, 7), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(1, 1), &Rgb([0, 0, 0]));
        assert_eq!(image.get_pixel(13, 13), &Rgb([0, 0, 0]));
    }

    #[test]
    fn draw_box_partially_outside_is_clipped() {
        let mut image = RgbImage::new(10, 10);
        let bbox = BoundingBox::new(-5_f32, -5_f32, 4_f32, 4_f32, "Tree".to_string()).unwrap();
        draw_box(&mut image, &bbox, Rgb([255, 0, 0]), 1);
        assert_eq!(image.get_pixel(4, 0), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(0, 4), &Rgb([255, 0, 0]));
    }

    #[test]
    fn draw_box_far_larger_than_the_image() {
        let mut image = RgbImage::new(10, 10);
        let red = Rgb([255, 0, 0]);
        let bbox = BoundingBox::new(-3e9_f32, 0_f32, 3e9_f32, 5_f32, "Tree".to_string()).unwrap();
        draw_box(&mut image, &bbox, red, DEFAULT_THICKNESS);
        // Top and bottom edges run across the whole image, the side edges fall outside it.
        assert_eq!(image.get_pixel(0, 0), &red);
        assert_eq!(image.get_pixel(9, 5), &red);
        assert_eq!(image.get_pixel(5, 1), &red);
        assert_eq!(image.get_pixel(5, 3), &Rgb([0, 0, 0]));
    }

    #[test]
    fn draw_box_with_infinite_coordinates() {
        let mut image = RgbImage::new(10, 10);
        let bbox = BoundingBox::from_corners(
            f32::NEG_INFINITY,
            f32::NEG_INFINITY,
            f32::INFINITY,
            f32::INFINITY,
            "Tree".to_string(),
        );
        draw_box(&mut image, &bbox, Rgb([255, 0, 0]), DEFAULT_THICKNESS);
        // The outline sits outside the image, the inner ring on its border.
        assert_eq!(image.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(image.get_pixel(5, 5), &Rgb([0, 0, 0]));
    }

    #[test]
    fn colors_follow_class_position() {
        let classes = vec!["Tree".to_string(), "Snag".to_string()];
        let mut image = RgbImage::new(20, 20);
        let dets = vec![
            detection(0., 0., 5., 5., "Tree", 0.9),
            detection(10., 10., 15., 15., "Snag", 0.8),
            detection(0., 10., 5., 15., "Unlisted", 0.8),
        ];
        draw_detections(&mut image, &dets, &classes, 0.5, 1);
        assert_eq!(image.get_pixel(0, 0), &label_color(0));
        assert_eq!(image.get_pixel(10, 10), &label_color(1));
        assert_eq!(image.get_pixel(0, 10), &Rgb(FALLBACK_COLOR));
    }

    #[test]
    fn detections_below_threshold_are_not_drawn() {
        let classes = vec!["Tree".to_string()];
        let mut image = RgbImage::new(10, 10);
        let dets = vec![detection(1., 1., 5., 5., "Tree", 0.2)];
        draw_detections(&mut image, &dets, &classes, 0.5, DEFAULT_THICKNESS);
        assert!(image.pixels().all(|pixel| *pixel == Rgb([0, 0, 0])));
    }

    #[test]
    fn palette_overflow_falls_back() {
        assert_eq!(label_color(LABEL_COLORS.len()), Rgb(FALLBACK_COLOR));
        assert_eq!(label_color(0), Rgb(LABEL_COLORS[0]));
    }
}
