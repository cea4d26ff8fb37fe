use crate::error::{IcoError, Result};
use crate::image::IconImage;
use crate::size::IconSize;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

//===========================================================================//

/// The filter used when resampling a source image to an icon size.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Resampling {
    /// Nearest-neighbor; keeps pixel art crisp.
    Nearest,
    /// Bilinear.
    Triangle,
    /// Bicubic (Catmull-Rom).
    CatmullRom,
    /// Gaussian blur filter.
    Gaussian,
    /// Lanczos with a window of 3; the highest quality, and the default.
    #[default]
    Lanczos3,
}

impl Resampling {
    fn filter_type(self) -> FilterType {
        match self {
            Resampling::Nearest => FilterType::Nearest,
            Resampling::Triangle => FilterType::Triangle,
            Resampling::CatmullRom => FilterType::CatmullRom,
            Resampling::Gaussian => FilterType::Gaussian,
            Resampling::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

//===========================================================================//

/// A decoded raster that icons are rendered from.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Decodes a source image from encoded bytes (PNG, JPEG, GIF, BMP, WebP
    /// or ICO); the format is guessed from the data.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<SourceImage> {
        let image = match image::load_from_memory(data) {
            Ok(image) => image,
            Err(error) => {
                invalid_input!("Failed to load source image: {}", error)
            }
        };
        debug!(
            width = image.width(),
            height = image.height(),
            "Source image decoded"
        );
        SourceImage::from_dynamic(image)
    }

    /// Wraps an image already decoded by the `image` crate.
    pub fn from_dynamic(image: DynamicImage) -> Result<SourceImage> {
        SourceImage::from_rgba(image.into_rgba8())
    }

    /// Wraps an RGBA buffer.
    pub fn from_rgba(pixels: RgbaImage) -> Result<SourceImage> {
        if pixels.width() == 0 || pixels.height() == 0 {
            invalid_input!(
                "Source image is empty ({}x{})",
                pixels.width(),
                pixels.height()
            );
        }
        Ok(SourceImage { pixels })
    }

    /// Returns the width of the source, in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Returns the height of the source, in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Renders the source stretched to exactly `size`, ignoring its aspect
    /// ratio.
    pub fn render(
        &self,
        size: IconSize,
        resampling: Resampling,
    ) -> Result<IconImage> {
        size.validate()?;
        let resized = if size.width == self.width()
            && size.height == self.height()
        {
            self.pixels.clone()
        } else {
            imageops::resize(
                &self.pixels,
                size.width,
                size.height,
                resampling.filter_type(),
            )
        };
        Ok(IconImage::from_parts(size.width, size.height, resized.into_raw()))
    }
}

impl TryFrom<IconImage> for SourceImage {
    type Error = IcoError;

    fn try_from(image: IconImage) -> Result<SourceImage> {
        let (width, height) = (image.width(), image.height());
        match RgbaImage::from_raw(width, height, image.into_rgba_data()) {
            Some(pixels) => SourceImage::from_rgba(pixels),
            None => invalid_input!(
                "Image data does not match its {}x{} dimensions",
                width,
                height
            ),
        }
    }
}

impl TryFrom<DynamicImage> for SourceImage {
    type Error = IcoError;

    fn try_from(image: DynamicImage) -> Result<SourceImage> {
        SourceImage::from_dynamic(image)
    }
}

//===========================================================================//


//===========================================================================//
