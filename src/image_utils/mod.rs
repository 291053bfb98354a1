pub mod image_conversion;
pub mod image_io;
pub mod resize;
