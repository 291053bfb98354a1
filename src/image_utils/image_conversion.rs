use image::RgbImage;
use ndarray::{Array, Array4};

/// ImageNet channel means in BGR order, subtracted from every pixel ("caffe" preprocessing).
pub const CAFFE_BGR_MEANS: [f32; 3] = [103.939, 116.779, 123.68];

/// Memory layout the network expects its input batch in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DataFormat {
    /// (batch, row, column, channel)
    #[default]
    ChannelsLast,
    /// (batch, channel, row, column)
    ChannelsFirst,
}

/// Converts an rgb8 image into a batch of one, preprocessed for the network.
///
/// Channels are reordered to BGR and the ImageNet means are subtracted. The result has
/// dimensions (1, height, width, 3).
pub fn convert_rgb_image_to_preprocessed_array(rgb_image: &RgbImage) -> Array4<f32> {
    let mut image_array = Array::zeros((
        1,
        rgb_image.height() as usize,
        rgb_image.width() as usize,
        3,
    ));
    for (x, y, pixel) in rgb_image.enumerate_pixels() {
        let x = x as usize;
        let y = y as usize;
        let [r, g, b] = pixel.0;
        image_array[[0, y, x, 0]] = (b as f32) - CAFFE_BGR_MEANS[0];
        image_array[[0, y, x, 1]] = (g as f32) - CAFFE_BGR_MEANS[1];
        image_array[[0, y, x, 2]] = (r as f32) - CAFFE_BGR_MEANS[2];
    }
    image_array
}

/// Lays a channels-last batch out in the requested format.
pub fn to_data_format(batch: Array4<f32>, data_format: DataFormat) -> Array4<f32> {
    match data_format {
        DataFormat::ChannelsLast => batch,
        DataFormat::ChannelsFirst => batch
            .permuted_axes([0, 3, 1, 2])
            .as_standard_layout()
            .into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_pixel_image() -> RgbImage {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([10, 20, 30]));
        img
    }

    #[test]
    fn preprocessing_is_bgr_minus_means() {
        let arr = convert_rgb_image_to_preprocessed_array(&two_pixel_image());
        assert_eq!(arr.shape(), &[1, 1, 2, 3]);
        // Each line below tests one pixel by getting all its channels into a tuple.
        assert_eq!(
            (arr[[0, 0, 0, 0]], arr[[0, 0, 0, 1]], arr[[0, 0, 0, 2]]),
            (-103.939, -116.779, 255.0 - 123.68)
        );
        assert_eq!(
            (arr[[0, 0, 1, 0]], arr[[0, 0, 1, 1]], arr[[0, 0, 1, 2]]),
            (30.0 - 103.939, 20.0 - 116.779, 10.0 - 123.68)
        );
    }

    #[test]
    fn channels_first_moves_the_channel_axis() {
        let arr = convert_rgb_image_to_preprocessed_array(&two_pixel_image());
        let channels_first = to_data_format(arr.clone(), DataFormat::ChannelsFirst);
        assert_eq!(channels_first.shape(), &[1, 3, 1, 2]);
        for channel in 0..3 {
            for x in 0..2 {
                assert_eq!(channels_first[[0, channel, 0, x]], arr[[0, 0, x, channel]]);
            }
        }
        assert!(channels_first.is_standard_layout());
    }

    #[test]
    fn channels_last_is_untouched() {
        let arr = convert_rgb_image_to_preprocessed_array(&two_pixel_image());
        assert_eq!(to_data_format(arr.clone(), DataFormat::ChannelsLast), arr);
    }
}
