//! Image loading helpers.

use crate::core::FillResult;
use image::{DynamicImage, RgbImage};
use std::path::Path;

/// Loads an image file as RGB.
pub fn load_rgb_image(path: &Path) -> FillResult<RgbImage> {
    let img = image::open(path)?;
    Ok(dynamic_to_rgb(img))
}

/// Converts any decoded image into the RGB buffer the pipelines work on.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}
