//! Image decoding

use crate::compression::SourceFormat;
use image::DynamicImage;
use std::io::Cursor;

/// Decodes source bytes into an image the resize and encode steps work on
pub struct ImageTransformer;

impl ImageTransformer {
    /// Decode image bytes, trusting the declared source format first and
    /// falling back to content sniffing when the data disagrees.
    pub fn decode(data: &[u8], source: SourceFormat) -> Result<DynamicImage, image::ImageError> {
        match image::load_from_memory_with_format(data, source.to_image_format()) {
            Ok(img) => Ok(img),
            Err(declared_err) => {
                let reader = image::ImageReader::new(Cursor::new(data)).with_guessed_format()?;
                if reader.format().is_none() {
                    return Err(declared_err);
                }
                reader.decode()
            }
        }
    }
}
