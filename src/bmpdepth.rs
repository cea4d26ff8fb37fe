//===========================================================================//

/// The color depths a DIB payload can use.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BmpDepth {
    One,
    Four,
    Eight,
    Sixteen,
    TwentyFour,
    ThirtyTwo,
}

impl BmpDepth {
    pub(crate) fn from_bits_per_pixel(
        bits_per_pixel: u16,
    ) -> Option<BmpDepth> {
        match bits_per_pixel {
            1 => Some(BmpDepth::One),
            4 => Some(BmpDepth::Four),
            8 => Some(BmpDepth::Eight),
            16 => Some(BmpDepth::Sixteen),
            24 => Some(BmpDepth::TwentyFour),
            32 => Some(BmpDepth::ThirtyTwo),
            _ => None,
        }
    }

    fn bits(&self) -> usize {
        match *self {
            BmpDepth::One => 1,
            BmpDepth::Four => 4,
            BmpDepth::Eight => 8,
            BmpDepth::Sixteen => 16,
            BmpDepth::TwentyFour => 24,
            BmpDepth::ThirtyTwo => 32,
        }
    }

    /// Returns the number of entries in the color table for this depth, or
    /// zero for direct-color depths.
    pub(crate) fn palette_len(&self) -> usize {
        match *self {
            BmpDepth::One => 2,
            BmpDepth::Four => 16,
            BmpDepth::Eight => 256,
            _ => 0,
        }
    }

    /// Returns the length of one row of color data, padded to four bytes.
    pub(crate) fn row_len(&self, width: u32) -> usize {
        padded_row_len(width as usize * self.bits())
    }

    /// Returns the palette index of pixel `col` in a row of indexed data.
    pub(crate) fn palette_index(&self, row: &[u8], col: usize) -> usize {
        match *self {
            BmpDepth::One => ((row[col / 8] >> (7 - col % 8)) & 0x1) as usize,
            BmpDepth::Four => {
                ((row[col / 2] >> (4 * (1 - col % 2))) & 0xf) as usize
            }
            _ => row[col] as usize,
        }
    }
}

/// Returns the length of one row of the 1-bit AND mask, padded to four bytes.
pub(crate) fn mask_row_len(width: u32) -> usize {
    padded_row_len(width as usize)
}

fn padded_row_len(bits: usize) -> usize {
    ((bits + 31) / 32) * 4
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{mask_row_len, BmpDepth};

    #[test]
    fn bmp_depth_round_trip() {
        for bits_per_pixel in [1, 4, 8, 16, 24, 32] {
            let depth = BmpDepth::from_bits_per_pixel(bits_per_pixel).unwrap();
            assert_eq!(depth.bits(), bits_per_pixel as usize);
        }
        assert_eq!(BmpDepth::from_bits_per_pixel(2), None);
        assert_eq!(BmpDepth::from_bits_per_pixel(0), None);
    }

    #[test]
    fn rows_are_padded_to_four_bytes() {
        assert_eq!(BmpDepth::One.row_len(1), 4);
        assert_eq!(BmpDepth::One.row_len(33), 8);
        assert_eq!(BmpDepth::Four.row_len(5), 4);
        assert_eq!(BmpDepth::Eight.row_len(5), 8);
        assert_eq!(BmpDepth::TwentyFour.row_len(2), 8);
        assert_eq!(BmpDepth::ThirtyTwo.row_len(3), 12);
        assert_eq!(mask_row_len(16), 4);
        assert_eq!(mask_row_len(48), 8);
    }

    #[test]
    fn palette_indices() {
        let row = [0b1010_0000, 0x00, 0x00, 0x00];
        assert_eq!(BmpDepth::One.palette_index(&row, 0), 1);
        assert_eq!(BmpDepth::One.palette_index(&row, 1), 0);
        assert_eq!(BmpDepth::One.palette_index(&row, 2), 1);
        let row = [0x3c, 0x00, 0x00, 0x00];
        assert_eq!(BmpDepth::Four.palette_index(&row, 0), 3);
        assert_eq!(BmpDepth::Four.palette_index(&row, 1), 12);
        assert_eq!(BmpDepth::Eight.palette_index(&row, 0), 0x3c);
    }
}

//===========================================================================//
