use crate::error::Result;
use crate::format::PayloadFormat;
use crate::size::IconSize;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::Write;
use tracing::trace;

//===========================================================================//

// The size of the ICONDIR header, in bytes.
pub(crate) const HEADER_LEN: usize = 6;
// The size of one ICONDIRENTRY, in bytes.
pub(crate) const ENTRY_LEN: usize = 16;

// Values of the ICONDIR type field.
const ICON_TYPE: u16 = 1;
const CURSOR_TYPE: u16 = 2;

// Fixed field values written for every entry.  The bits-per-pixel field is
// only advisory for PNG payloads, and Windows accepts 32 regardless of the
// PNG's real depth.
const COLOR_PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

/// The directory of an ICO file together with its image payloads.
#[derive(Clone, Debug, Default)]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Creates a new, empty icon collection.
    pub fn new() -> IconDir {
        IconDir { entries: Vec::new() }
    }

    /// Returns the entries in this collection, in directory order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Consumes the collection, returning its entries.
    pub fn into_entries(self) -> Vec<IconDirEntry> {
        self.entries
    }

    /// Appends an entry.  Entries are written in the order they are added.
    pub fn add_entry(&mut self, entry: IconDirEntry) {
        self.entries.push(entry);
    }

    /// Parses an in-memory ICO file.
    ///
    /// Payload offsets may point anywhere in `data`; they need not be in
    /// order or contiguous, and may even overlap.  A payload that runs past
    /// the end of `data` is an error.
    pub fn read(data: &[u8]) -> Result<IconDir> {
        if data.len() < HEADER_LEN {
            invalid_format!(
                "File is too short for an ICONDIR header \
                 (was {} bytes, but must be at least {})",
                data.len(),
                HEADER_LEN
            );
        }
        let mut reader = data;
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            invalid_format!(
                "Invalid reserved field value in ICONDIR \
                 (was {}, but must be 0)",
                reserved
            );
        }
        match reader.read_u16::<LittleEndian>()? {
            ICON_TYPE => {}
            CURSOR_TYPE => {
                invalid_format!("Cursor (CUR) files are not supported")
            }
            restype => invalid_format!(
                "Invalid resource type (was {}, but must be {})",
                restype,
                ICON_TYPE
            ),
        }
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let directory_end = HEADER_LEN + ENTRY_LEN * num_entries;
        if data.len() < directory_end {
            invalid_format!(
                "File is too short for {} ICONDIRENTRY records \
                 (was {} bytes, but must be at least {})",
                num_entries,
                data.len(),
                directory_end
            );
        }
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        for index in 0..num_entries {
            let width_byte = reader.read_u8()?;
            let height_byte = reader.read_u8()?;
            let num_colors = reader.read_u8()?;
            let _reserved = reader.read_u8()?;
            let color_planes = reader.read_u16::<LittleEndian>()?;
            let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let data_size = reader.read_u32::<LittleEndian>()? as usize;
            let data_offset = reader.read_u32::<LittleEndian>()? as usize;
            let data_end = match data_offset.checked_add(data_size) {
                Some(end) if end <= data.len() => end,
                _ => invalid_format!(
                    "Image data for entry {} is out of bounds \
                     (offset {} + length {} exceeds file length {})",
                    index,
                    data_offset,
                    data_size,
                    data.len()
                ),
            };
            let size = IconSize::from_dir_bytes(width_byte, height_byte);
            trace!(index, %size, data_offset, data_size, "read ICONDIRENTRY");
            entries.push(IconDirEntry {
                size,
                num_colors,
                color_planes,
                bits_per_pixel,
                data: data[data_offset..data_end].to_vec(),
            });
        }
        Ok(IconDir { entries })
    }

    /// Writes the ICO file: header, then directory, then every payload back
    /// to back in entry order.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        if self.entries.len() > (u16::MAX as usize) {
            invalid_input!(
                "Too many entries in IconDir (was {}, but max is {})",
                self.entries.len(),
                u16::MAX
            );
        }
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(ICON_TYPE)?;
        writer.write_u16::<LittleEndian>(self.entries.len() as u16)?;
        let mut data_offset = (HEADER_LEN + ENTRY_LEN * self.entries.len()) as u32;
        for entry in self.entries.iter() {
            let (width, height) = entry.size.to_dir_bytes();
            writer.write_u8(width)?;
            writer.write_u8(height)?;
            writer.write_u8(entry.num_colors)?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(entry.color_planes)?;
            writer.write_u16::<LittleEndian>(entry.bits_per_pixel)?;
            let data_size = entry.data.len() as u32;
            writer.write_u32::<LittleEndian>(data_size)?;
            writer.write_u32::<LittleEndian>(data_offset)?;
            data_offset = match data_offset.checked_add(data_size) {
                Some(offset) => offset,
                None => invalid_input!("Image data is too large for an ICO file"),
            };
        }
        for entry in self.entries.iter() {
            writer.write_all(&entry.data)?;
        }
        Ok(())
    }

    /// Returns the total length of the file `write` would produce.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + self
                .entries
                .iter()
                .map(|entry| ENTRY_LEN + entry.data.len())
                .sum::<usize>()
    }

    /// Serializes the ICO file into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(self.encoded_len());
        self.write(&mut output)?;
        Ok(output)
    }
}

//===========================================================================//

/// One entry in an ICO file: declared dimensions plus the raw payload.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconDirEntry {
    size: IconSize,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data: Vec<u8>,
}

impl IconDirEntry {
    /// Creates an entry for an already-encoded payload.  The directory fields
    /// are fixed: no palette, one color plane, 32 bits per pixel.  Returns an
    /// error if `size` can't be represented in a directory entry.
    pub fn new(size: IconSize, data: Vec<u8>) -> Result<IconDirEntry> {
        size.validate()?;
        if data.len() > (u32::MAX as usize) {
            invalid_input!(
                "Image data is too large (was {} bytes, but max is {})",
                data.len(),
                u32::MAX
            );
        }
        Ok(IconDirEntry {
            size,
            num_colors: 0,
            color_planes: COLOR_PLANES,
            bits_per_pixel: BITS_PER_PIXEL,
            data,
        })
    }

    /// Returns the declared size of the image.
    pub fn size(&self) -> IconSize {
        self.size
    }

    /// Returns the declared width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Returns the declared height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Returns the palette size byte (zero for true-color images).
    pub fn num_colors(&self) -> u8 {
        self.num_colors
    }

    /// Returns the color planes field.
    pub fn color_planes(&self) -> u16 {
        self.color_planes
    }

    /// Returns the bits-per-pixel field as stored in the directory.
    pub fn bits_per_pixel(&self) -> u16 {
        self.bits_per_pixel
    }

    /// Returns the payload format, sniffed from its leading bytes.
    pub fn format(&self) -> PayloadFormat {
        PayloadFormat::sniff(&self.data)
    }

    /// Returns the raw payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the entry, returning the raw payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

//===========================================================================//


//===========================================================================//
