//! A library for building and taking apart ICO (Windows icon) files.
//!
//! Building an icon renders a source image at each requested size, encodes
//! every rendition as PNG, and packs them into an ICO container:
//!
//! ```no_run
//! let source = std::fs::read("logo.png")?;
//! let ico = icokit::encode_bytes(&source, &icokit::IconSize::STANDARD)?;
//! std::fs::write("logo.ico", ico)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Taking an icon apart lists the embedded images with their declared sizes
//! and payload formats (PNG or BMP, sniffed from the payload itself):
//!
//! ```no_run
//! let ico = std::fs::read("favicon.ico")?;
//! for image in icokit::decode(&ico)? {
//!     println!("{} {}", image.size(), image.format());
//! }
//! let png = icokit::decode_first_as_png(&ico, 0)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bmpdepth;
mod decoder;
mod encoder;
mod error;
mod format;
mod icondir;
mod image;
mod render;
mod size;

pub use crate::decoder::{EmbeddedImage, IcoDecoder};
pub use crate::encoder::{EncodeOptions, IcoEncoder};
pub use crate::error::{IcoError, Result};
pub use crate::format::{PayloadFormat, ICO_MIME_TYPE};
pub use crate::icondir::{IconDir, IconDirEntry};
pub use crate::image::IconImage;
pub use crate::render::{Resampling, SourceImage};
pub use crate::size::IconSize;

//===========================================================================//

/// Renders `source` at each of `sizes` with the default options and returns
/// the ICO file.  See [`IcoEncoder::encode`].
pub fn encode(source: &SourceImage, sizes: &[IconSize]) -> Result<Vec<u8>> {
    IcoEncoder::default().encode(source, sizes)
}

/// Loads a source image from encoded bytes, then behaves like [`encode`].
pub fn encode_bytes(data: &[u8], sizes: &[IconSize]) -> Result<Vec<u8>> {
    let source = SourceImage::from_bytes(data)?;
    encode(&source, sizes)
}

/// Parses an ICO file into its embedded images.  See [`IcoDecoder::decode`].
pub fn decode(data: &[u8]) -> Result<Vec<EmbeddedImage>> {
    IcoDecoder::new().decode(data)
}

/// Extracts one image from an ICO file as PNG.  See
/// [`IcoDecoder::decode_first_as_png`].
pub fn decode_first_as_png(data: &[u8], index: usize) -> Result<Vec<u8>> {
    IcoDecoder::new().decode_first_as_png(data, index)
}

//===========================================================================//
