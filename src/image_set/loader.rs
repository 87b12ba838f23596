//! Image decoding behind a swappable loader

use crate::error::{FinderError, FinderResult};
use image::RgbImage;
use std::path::Path;

/// Decodes an image file into an RGB buffer
pub trait ImageLoader: Send + Sync {
    fn load(&self, path: &Path) -> FinderResult<RgbImage>;
}

/// Loader backed by the `image` crate decoders
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageLoader;

impl ImageLoader for FsImageLoader {
    fn load(&self, path: &Path) -> FinderResult<RgbImage> {
        let image = image::open(path).map_err(|e| FinderError::image_decode(path, e))?;
        log::trace!("Decoded {:?} ({}x{})", path, image.width(), image.height());
        Ok(image.to_rgb8())
    }
}
