use crate::bmpdepth::{mask_row_len, BmpDepth};
use crate::error::{IcoError, Result};
use crate::size::IconSize;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Write};

//===========================================================================//

// The size of a BITMAPINFOHEADER struct, in bytes.  Later header versions
// (V4, V5) are longer but start with the same fields.
const BMP_HEADER_LEN: u32 = 40;

// BI_RGB, the only DIB compression used by icons.
const BMP_COMPRESSION_NONE: u32 = 0;

//===========================================================================//

/// A decoded RGBA image; the pixel surface that icon payloads are encoded
/// from and decoded into.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconImage {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl IconImage {
    /// Creates a new image with the given dimensions and RGBA data.  The
    /// `width` and `height` must be nonzero, and `rgba_data` must have `4 *
    /// width * height` bytes and be in row-major order from top to bottom.
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> Result<IconImage> {
        if width == 0 || height == 0 {
            invalid_input!(
                "Invalid image dimensions {}x{} (must be at least 1x1)",
                width,
                height
            );
        }
        let expected_data_len = (width as u64) * (height as u64) * 4;
        if (rgba_data.len() as u64) != expected_data_len {
            invalid_input!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                rgba_data.len(),
                expected_data_len,
                width,
                height
            );
        }
        Ok(IconImage { width, height, rgba_data })
    }

    /// Builds an image from parts already known to be consistent.
    pub(crate) fn from_parts(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> IconImage {
        debug_assert!(width > 0 && height > 0);
        debug_assert_eq!(rgba_data.len(), 4 * width as usize * height as usize);
        IconImage { width, height, rgba_data }
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions of the image.
    pub fn size(&self) -> IconSize {
        IconSize::new(self.width, self.height)
    }

    /// Returns the RGBA data for this image, in row-major order from top to
    /// bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    /// Consumes the image, returning its RGBA data.
    pub fn into_rgba_data(self) -> Vec<u8> {
        self.rgba_data
    }

    /// Returns true if any pixel is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.rgba_data.chunks_exact(4).any(|pixel| pixel[3] != u8::MAX)
    }

    /// Returns a copy of this image drawn unscaled at the top-left corner of
    /// a transparent canvas of the given size.  Pixels falling outside the
    /// canvas are cropped.
    pub fn on_canvas(&self, size: IconSize) -> Result<IconImage> {
        if size == self.size() {
            return Ok(self.clone());
        }
        let mut canvas =
            vec![0u8; 4 * size.width as usize * size.height as usize];
        let copy_len = 4 * self.width.min(size.width) as usize;
        let src_stride = 4 * self.width as usize;
        let dst_stride = 4 * size.width as usize;
        for row in 0..self.height.min(size.height) as usize {
            let src = &self.rgba_data[row * src_stride..][..copy_len];
            canvas[row * dst_stride..][..copy_len].copy_from_slice(src);
        }
        IconImage::from_rgba_data(size.width, size.height, canvas)
    }

    //-----------------------------------------------------------------------//

    /// Decodes an image from a PNG file.  Palette, grayscale and 16-bit
    /// images are expanded to 8-bit RGBA.
    pub fn read_png<R: Read>(reader: R) -> Result<IconImage> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );
        let mut png_reader = match decoder.read_info() {
            Ok(png_reader) => png_reader,
            Err(error) => decoding_failure!("Malformed PNG data: {}", error),
        };
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let frame = match png_reader.next_frame(&mut buffer) {
            Ok(frame) => frame,
            Err(error) => decoding_failure!("Malformed PNG data: {}", error),
        };
        buffer.truncate(frame.buffer_size());
        if frame.bit_depth != png::BitDepth::Eight {
            decoding_failure!("Unsupported PNG bit depth: {:?}", frame.bit_depth);
        }
        let rgba_data = match frame.color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => buffer
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
                .collect(),
            png::ColorType::GrayscaleAlpha => buffer
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect(),
            png::ColorType::Grayscale => buffer
                .into_iter()
                .flat_map(|gray| [gray, gray, gray, u8::MAX])
                .collect(),
            png::ColorType::Indexed => {
                decoding_failure!("PNG palette was not expanded");
            }
        };
        IconImage::from_rgba_data(frame.width, frame.height, rgba_data)
            .map_err(|error| IcoError::DecodingFailure(error.to_string()))
    }

    /// Encodes the image as a PNG file.  Fully opaque images are written as
    /// RGB, everything else as RGBA.
    pub fn write_png<W: Write>(&self, writer: W) -> Result<()> {
        self.write_png_enc(writer)
            .map_err(|error| IcoError::EncodingFailure(error.to_string()))
    }

    /// Encodes the image as a PNG file in a new buffer.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.write_png(&mut output)?;
        Ok(output)
    }

    fn write_png_enc<W: Write>(
        &self,
        writer: W,
    ) -> std::result::Result<(), png::EncodingError> {
        let has_alpha = self.has_alpha();
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_depth(png::BitDepth::Eight);
        if has_alpha {
            encoder.set_color(png::ColorType::Rgba);
        } else {
            encoder.set_color(png::ColorType::Rgb);
        }
        let mut writer = encoder.write_header()?;
        if has_alpha {
            writer.write_image_data(&self.rgba_data)?;
        } else {
            let rgb_data: Vec<u8> = self
                .rgba_data
                .chunks_exact(4)
                .flat_map(|rgba| [rgba[0], rgba[1], rgba[2]])
                .collect();
            writer.write_image_data(&rgb_data)?;
        }
        writer.finish()
    }

    //-----------------------------------------------------------------------//

    /// Decodes a headerless BMP (a DIB), as stored in ICO files: a
    /// BITMAPINFOHEADER with doubled height, an optional color table, the
    /// color rows bottom-up, then a 1-bit AND mask.
    pub fn read_bmp(data: &[u8]) -> Result<IconImage> {
        let mut reader = data;
        let header = DibHeader::read(&mut reader)?;
        let (width, height, depth) =
            (header.width, header.height, header.depth);

        let mut color_table = vec![[0u8; 3]; depth.palette_len()];
        let num_stored_colors = match header.colors_used as usize {
            0 => depth.palette_len(),
            used => used,
        };
        for color in color_table.iter_mut().take(num_stored_colors) {
            let mut bgrx = [0u8; 4];
            reader.read_exact(&mut bgrx).map_err(truncated)?;
            *color = [bgrx[2], bgrx[1], bgrx[0]];
        }
        // Color table entries beyond what the depth can index (all of them,
        // for direct-color depths) still sit before the pixel rows.
        let num_unused_colors =
            num_stored_colors.saturating_sub(depth.palette_len());
        match num_unused_colors.checked_mul(4) {
            Some(len) if len <= reader.len() => reader = &reader[len..],
            _ => decoding_failure!("BMP data is truncated"),
        }

        // The color rows (and, below 32 bpp, the AND mask) must all be
        // present before the pixel buffer is allocated.
        let rows = height as usize;
        let color_len = depth.row_len(width).checked_mul(rows);
        let mask_len = if depth == BmpDepth::ThirtyTwo {
            Some(0)
        } else {
            mask_row_len(width).checked_mul(rows)
        };
        match color_len
            .zip(mask_len)
            .and_then(|(color_len, mask_len)| color_len.checked_add(mask_len))
        {
            Some(len) if len <= reader.len() => {}
            _ => decoding_failure!("BMP data is truncated"),
        }

        let num_pixels = match width.checked_mul(height) {
            Some(num) => num as usize,
            None => decoding_failure!("BMP width * height is too large"),
        };
        let mut rgba = vec![u8::MAX; num_pixels * 4];
        let stride = 4 * width as usize;
        let mut row = vec![0u8; depth.row_len(width)];
        // Rows are stored starting from the *bottom* of the image.
        for y in (0..height as usize).rev() {
            reader.read_exact(&mut row).map_err(truncated)?;
            let pixels = &mut rgba[y * stride..][..stride];
            for (col, pixel) in pixels.chunks_exact_mut(4).enumerate() {
                match depth {
                    BmpDepth::One | BmpDepth::Four | BmpDepth::Eight => {
                        let index = depth.palette_index(&row, col);
                        pixel[..3].copy_from_slice(&color_table[index]);
                    }
                    BmpDepth::Sixteen => {
                        let color =
                            u16::from_le_bytes([row[2 * col], row[2 * col + 1]]);
                        pixel[0] = scale_5_bit(color >> 10);
                        pixel[1] = scale_5_bit(color >> 5);
                        pixel[2] = scale_5_bit(color);
                    }
                    BmpDepth::TwentyFour => {
                        let bgr = &row[3 * col..][..3];
                        pixel[..3].copy_from_slice(&[bgr[2], bgr[1], bgr[0]]);
                    }
                    BmpDepth::ThirtyTwo => {
                        let bgra = &row[4 * col..][..4];
                        pixel.copy_from_slice(&[bgra[2], bgra[1], bgra[0], bgra[3]]);
                    }
                }
            }
        }

        // A 32-bpp image carries its own alpha, unless every alpha byte is
        // zero, in which case it relies on the AND mask like the lower
        // depths.  Some writers omit the mask of 32-bpp images entirely.
        let mut apply_mask = true;
        if depth == BmpDepth::ThirtyTwo {
            if rgba.chunks_exact(4).any(|pixel| pixel[3] != 0) {
                apply_mask = false;
            } else {
                rgba.chunks_exact_mut(4).for_each(|pixel| pixel[3] = u8::MAX);
                apply_mask = !reader.is_empty();
            }
        }
        if apply_mask {
            let mut mask_row = vec![0u8; mask_row_len(width)];
            for y in (0..height as usize).rev() {
                reader.read_exact(&mut mask_row).map_err(truncated)?;
                let pixels = &mut rgba[y * stride..][..stride];
                for (col, pixel) in pixels.chunks_exact_mut(4).enumerate() {
                    if BmpDepth::One.palette_index(&mask_row, col) == 1 {
                        pixel[3] = 0;
                    }
                }
            }
        }

        Ok(IconImage::from_parts(width, height, rgba))
    }
}

//===========================================================================//

struct DibHeader {
    width: u32,
    height: u32,
    depth: BmpDepth,
    colors_used: u32,
}

impl DibHeader {
    fn read<'a>(reader: &mut &'a [u8]) -> Result<DibHeader> {
        let header_len = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        if header_len < BMP_HEADER_LEN {
            decoding_failure!(
                "Invalid BMP header size (was {}, must be at least {})",
                header_len,
                BMP_HEADER_LEN
            );
        }
        let width = reader.read_i32::<LittleEndian>().map_err(truncated)?;
        if width < 1 {
            decoding_failure!(
                "Invalid BMP width (was {}, but must be at least 1)",
                width
            );
        }
        let height = reader.read_i32::<LittleEndian>().map_err(truncated)?;
        if height % 2 != 0 {
            // The height is stored doubled, counting the rows of both the
            // color data and the alpha mask, so it should be divisible by 2.
            decoding_failure!(
                "Invalid height field in BMP header \
                 (was {}, but must be divisible by 2)",
                height
            );
        }
        let height = height / 2;
        if height < 1 {
            decoding_failure!(
                "Invalid BMP height (was {}, but must be at least 1)",
                height
            );
        }
        let _planes = reader.read_u16::<LittleEndian>().map_err(truncated)?;
        let bits_per_pixel =
            reader.read_u16::<LittleEndian>().map_err(truncated)?;
        let depth = match BmpDepth::from_bits_per_pixel(bits_per_pixel) {
            Some(depth) => depth,
            None => decoding_failure!(
                "Unsupported BMP bits-per-pixel ({})",
                bits_per_pixel
            ),
        };
        let compression = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        if compression != BMP_COMPRESSION_NONE {
            decoding_failure!("Unsupported BMP compression ({})", compression);
        }
        let _image_size = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        let _horz_ppm = reader.read_i32::<LittleEndian>().map_err(truncated)?;
        let _vert_ppm = reader.read_i32::<LittleEndian>().map_err(truncated)?;
        let colors_used = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        let _colors_important =
            reader.read_u32::<LittleEndian>().map_err(truncated)?;
        let extra = (header_len - BMP_HEADER_LEN) as usize;
        let remaining: &'a [u8] = *reader;
        if remaining.len() < extra {
            decoding_failure!("BMP data is truncated");
        }
        *reader = &remaining[extra..];
        Ok(DibHeader {
            width: width as u32,
            height: height as u32,
            depth,
            colors_used,
        })
    }
}

fn truncated(_: io::Error) -> IcoError {
    IcoError::DecodingFailure("BMP data is truncated".to_string())
}

fn scale_5_bit(value: u16) -> u8 {
    (((value & 0x1f) * 255 + 15) / 31) as u8
}

//===========================================================================//


//===========================================================================//
