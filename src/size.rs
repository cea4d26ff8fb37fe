use crate::error::Result;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

//===========================================================================//

// The largest dimension an ICONDIRENTRY can describe.  The width/height
// fields are a single byte each, with zero standing in for 256.
pub(crate) const MAX_DIMENSION: u32 = 256;

//===========================================================================//

/// The pixel dimensions of one image in an ICO file.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct IconSize {
    /// Width in pixels, from 1 to 256.
    pub width: u32,
    /// Height in pixels, from 1 to 256.
    pub height: u32,
}

impl IconSize {
    /// The square sizes conventionally offered for icons.
    pub const COMMON: [IconSize; 7] = [
        IconSize::square(16),
        IconSize::square(24),
        IconSize::square(32),
        IconSize::square(48),
        IconSize::square(64),
        IconSize::square(128),
        IconSize::square(256),
    ];

    /// A good default selection for Windows icons: 16x16, 32x32 and 48x48.
    pub const STANDARD: [IconSize; 3] =
        [IconSize::square(16), IconSize::square(32), IconSize::square(48)];

    /// Creates a size with the given width and height.
    pub const fn new(width: u32, height: u32) -> IconSize {
        IconSize { width, height }
    }

    /// Creates a square size.
    pub const fn square(dimension: u32) -> IconSize {
        IconSize { width: dimension, height: dimension }
    }

    /// Returns an error unless both dimensions fit in an ICO directory entry.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            invalid_input!(
                "Invalid icon size {} (dimensions must be at least 1)",
                self
            );
        }
        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            invalid_input!(
                "Invalid icon size {} (dimensions must be at most {})",
                self,
                MAX_DIMENSION
            );
        }
        Ok(())
    }

    /// Returns the width/height bytes as stored in a directory entry.
    pub(crate) fn to_dir_bytes(self) -> (u8, u8) {
        (dimension_to_byte(self.width), dimension_to_byte(self.height))
    }

    /// Interprets the width/height bytes of a directory entry.
    pub(crate) fn from_dir_bytes(width: u8, height: u8) -> IconSize {
        IconSize::new(byte_to_dimension(width), byte_to_dimension(height))
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl From<(u32, u32)> for IconSize {
    fn from((width, height): (u32, u32)) -> IconSize {
        IconSize::new(width, height)
    }
}

//===========================================================================//

fn dimension_to_byte(dimension: u32) -> u8 {
    debug_assert!(dimension >= 1 && dimension <= MAX_DIMENSION);
    if dimension == MAX_DIMENSION {
        0
    } else {
        dimension as u8
    }
}

fn byte_to_dimension(byte: u8) -> u32 {
    if byte == 0 {
        MAX_DIMENSION
    } else {
        byte as u32
    }
}

//===========================================================================//


//===========================================================================//
