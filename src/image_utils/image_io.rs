use crate::error::{PredictError, PredictResult};
use image::{self, RgbImage};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where the image to predict on comes from.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// An image file on disk, decoded on use.
    Path(PathBuf),
    /// An already decoded image owned by the caller.
    Raw(RgbImage),
    /// Encoded image bytes (png, jpeg, tiff, ...) held in memory.
    Encoded(Vec<u8>),
}

impl ImageSource {
    /// Picks the image source from an optional path and an optional decoded image.
    ///
    /// When both are given the path wins.
    pub fn from_options(
        image_path: Option<PathBuf>,
        raw_image: Option<RgbImage>,
    ) -> PredictResult<Self> {
        match (image_path, raw_image) {
            (Some(path), Some(_)) => {
                debug!(path = %path.display(), "both a path and a raw image were given, using the path");
                Ok(ImageSource::Path(path))
            }
            (Some(path), None) => Ok(ImageSource::Path(path)),
            (None, Some(raw)) => Ok(ImageSource::Raw(raw)),
            (None, None) => Err(PredictError::MissingImage),
        }
    }

    /// Decodes the source into an RGB image.
    pub fn load(self) -> PredictResult<RgbImage> {
        match self {
            ImageSource::Path(path) => read_image_as_rgb8(&path),
            ImageSource::Raw(raw) => Ok(raw),
            ImageSource::Encoded(bytes) => read_encoded_image_as_rgb8(&bytes),
        }
    }
}

pub fn read_image_as_rgb8(filepath: &Path) -> PredictResult<RgbImage> {
    Ok(image::open(filepath)?.into_rgb8())
}

pub fn read_encoded_image_as_rgb8(bytes: &[u8]) -> PredictResult<RgbImage> {
    Ok(image::load_from_memory(bytes)?.into_rgb8())
}

/// Whether a file looks like an image this crate can decode, judged by its extension.
pub fn is_supported_image(filepath: &Path) -> bool {
    filepath
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            matches!(
                extension.to_ascii_lowercase().as_str(),
                "png" | "jpg" | "jpeg" | "tif" | "tiff" | "bmp"
            )
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Cursor;

    /// A 3x3 image: a black row, a red/green/blue row and a white row.
    fn test_image() -> RgbImage {
        let mut img = RgbImage::new(3, 3);
        img.put_pixel(0, 1, Rgb([255, 0, 0]));
        img.put_pixel(1, 1, Rgb([0, 255, 0]));
        img.put_pixel(2, 1, Rgb([0, 0, 255]));
        for x in 0..3 {
            img.put_pixel(x, 2, Rgb([255, 255, 255]));
        }
        img
    }

    fn assert_is_test_image(img: &RgbImage) {
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(2, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(0, 1), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(1, 1), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(2, 1), &Rgb([0, 0, 255]));
        assert_eq!(img.get_pixel(1, 2), &Rgb([255, 255, 255]));
    }

    #[test]
    fn read_png_from_disk() {
        let filepath = std::env::temp_dir().join("deepforest_rs_image_io_test.png");
        test_image().save(&filepath).unwrap();
        let img = read_image_as_rgb8(&filepath).unwrap();
        std::fs::remove_file(&filepath).unwrap();
        assert_is_test_image(&img);
    }

    #[test]
    fn read_png_from_memory() {
        let mut bytes: Vec<u8> = Vec::new();
        test_image()
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let img = ImageSource::Encoded(bytes).load().unwrap();
        assert_is_test_image(&img);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = read_image_as_rgb8(Path::new("./this/file/does/not/exist.png"));
        assert!(matches!(result, Err(PredictError::Image(_))));
    }

    #[test]
    fn garbage_bytes_are_an_error() {
        let result = ImageSource::Encoded(vec![1, 2, 3, 4]).load();
        assert!(matches!(result, Err(PredictError::Image(_))));
    }

    #[test]
    fn from_options_requires_a_source() {
        assert!(matches!(
            ImageSource::from_options(None, None),
            Err(PredictError::MissingImage)
        ));
    }

    #[test]
    fn from_options_prefers_the_path() {
        let source =
            ImageSource::from_options(Some(PathBuf::from("a.png")), Some(test_image())).unwrap();
        assert!(matches!(source, ImageSource::Path(p) if p == PathBuf::from("a.png")));
    }

    #[test]
    fn from_options_uses_raw_image() {
        let source = ImageSource::from_options(None, Some(test_image())).unwrap();
        assert_is_test_image(&source.load().unwrap());
    }

    #[test]
    fn supported_extensions() {
        assert!(is_supported_image(Path::new("plot_1.TIF")));
        assert!(is_supported_image(Path::new("dir/tile.png")));
        assert!(!is_supported_image(Path::new("classes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }
}
