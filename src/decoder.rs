use crate::error::{IcoError, Result};
use crate::format::PayloadFormat;
use crate::icondir::{IconDir, IconDirEntry};
use crate::image::IconImage;
use crate::size::IconSize;
use tracing::{debug, instrument};

//===========================================================================//

// The "BM" magic at the start of a BMP file that still has its
// BITMAPFILEHEADER.  Payloads written by ICO tools normally omit it.
const BMP_FILE_SIGNATURE: &[u8] = b"BM";

//===========================================================================//

/// One image extracted from an ICO file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmbeddedImage {
    width: u32,
    height: u32,
    format: PayloadFormat,
    data: Vec<u8>,
}

impl EmbeddedImage {
    fn from_entry(entry: IconDirEntry) -> EmbeddedImage {
        let size = entry.size();
        let format = entry.format();
        EmbeddedImage {
            width: size.width,
            height: size.height,
            format,
            data: entry.into_data(),
        }
    }

    /// Returns the width declared in the ICO directory, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height declared in the ICO directory, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the declared dimensions.
    pub fn size(&self) -> IconSize {
        IconSize::new(self.width, self.height)
    }

    /// Returns the sniffed payload format.
    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    /// Returns the MIME type of the payload.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Returns the raw payload, exactly as stored in the ICO file.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image, returning the raw payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Decodes the payload into RGBA pixels.  The result has the payload's
    /// own dimensions, which may differ from the declared ones.
    pub fn decode(&self) -> Result<IconImage> {
        match self.format {
            PayloadFormat::Png => IconImage::read_png(self.data.as_slice()),
            PayloadFormat::Bmp if self.data.starts_with(BMP_FILE_SIGNATURE) => {
                decode_bmp_file(&self.data)
            }
            PayloadFormat::Bmp => IconImage::read_bmp(&self.data),
        }
    }

    /// Returns the payload as a PNG file.  PNG payloads are returned
    /// unchanged; BMP payloads are decoded, drawn at the top-left of a
    /// transparent canvas of the declared size, and encoded as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        match self.format {
            PayloadFormat::Png => Ok(self.data.clone()),
            PayloadFormat::Bmp => {
                let image = self.decode()?.on_canvas(self.size())?;
                image.to_png()
            }
        }
    }
}

// Decodes a BMP that still carries its 14-byte file header.
fn decode_bmp_file(data: &[u8]) -> Result<IconImage> {
    let image = match image::load_from_memory_with_format(
        data,
        image::ImageFormat::Bmp,
    ) {
        Ok(image) => image.into_rgba8(),
        Err(error) => decoding_failure!("Malformed BMP data: {}", error),
    };
    let (width, height) = image.dimensions();
    IconImage::from_rgba_data(width, height, image.into_raw())
        .map_err(|error| IcoError::DecodingFailure(error.to_string()))
}

//===========================================================================//

/// Extracts the images stored in ICO files.
#[derive(Clone, Copy, Debug, Default)]
pub struct IcoDecoder;

impl IcoDecoder {
    /// Creates a decoder.
    pub fn new() -> IcoDecoder {
        IcoDecoder
    }

    /// Parses an ICO file into its embedded images, in directory order.
    ///
    /// An ICO file with no entries gives an empty list rather than an error.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn decode(&self, data: &[u8]) -> Result<Vec<EmbeddedImage>> {
        let icondir = IconDir::read(data)?;
        let images: Vec<EmbeddedImage> = icondir
            .into_entries()
            .into_iter()
            .map(EmbeddedImage::from_entry)
            .collect();
        debug!(count = images.len(), "ICO directory parsed");
        Ok(images)
    }

    /// Extracts the image at `index` as a PNG file, converting BMP payloads.
    /// An out-of-range `index` falls back to the first image.  Fails with
    /// `IcoError::NoImages` if the file holds no images.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn decode_first_as_png(
        &self,
        data: &[u8],
        index: usize,
    ) -> Result<Vec<u8>> {
        let mut images = self.decode(data)?;
        if images.is_empty() {
            return Err(IcoError::NoImages);
        }
        let index = if index < images.len() { index } else { 0 };
        let image = images.swap_remove(index);
        debug!(
            index,
            size = %image.size(),
            format = %image.format(),
            "Extracting image as PNG"
        );
        match image.format() {
            PayloadFormat::Png => Ok(image.into_data()),
            PayloadFormat::Bmp => image.to_png(),
        }
    }
}

//===========================================================================//


//===========================================================================//
