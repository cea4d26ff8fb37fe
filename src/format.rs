#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

//===========================================================================//

// The first four bytes of every PNG file.  ICO directory entries carry no
// format field, so this prefix is the only thing distinguishing a PNG payload
// from a BMP one.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

/// The MIME type of an ICO file.
pub const ICO_MIME_TYPE: &str = "image/x-icon";

//===========================================================================//

/// The encoding of an image payload stored in an ICO file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum PayloadFormat {
    /// A complete PNG file.
    Png,
    /// A BMP, usually headerless (a DIB followed by an AND mask).
    Bmp,
}

impl PayloadFormat {
    /// Sniffs the format of a payload from its first four bytes.  Anything
    /// that doesn't start with the PNG signature, including payloads shorter
    /// than four bytes, is treated as a BMP.
    pub fn sniff(data: &[u8]) -> PayloadFormat {
        if data.starts_with(PNG_SIGNATURE) {
            PayloadFormat::Png
        } else {
            PayloadFormat::Bmp
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match *self {
            PayloadFormat::Png => "image/png",
            PayloadFormat::Bmp => "image/bmp",
        }
    }

    /// Returns the usual file extension for this format, without a dot.
    pub fn extension(&self) -> &'static str {
        match *self {
            PayloadFormat::Png => "png",
            PayloadFormat::Bmp => "bmp",
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::PayloadFormat;

    #[test]
    fn sniff_png_signature() {
        let data = b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR";
        assert_eq!(PayloadFormat::sniff(data), PayloadFormat::Png);
        // Only the first four bytes matter.
        assert_eq!(PayloadFormat::sniff(b"\x89PNGgarbage"), PayloadFormat::Png);
    }

    #[test]
    fn sniff_anything_else_as_bmp() {
        assert_eq!(PayloadFormat::sniff(b"BM\x00\x00"), PayloadFormat::Bmp);
        assert_eq!(
            PayloadFormat::sniff(b"\x28\x00\x00\x00\x10\x00\x00\x00"),
            PayloadFormat::Bmp
        );
        assert_eq!(PayloadFormat::sniff(b"\x89PNX"), PayloadFormat::Bmp);
    }

    #[test]
    fn sniff_short_payloads() {
        assert_eq!(PayloadFormat::sniff(b""), PayloadFormat::Bmp);
        assert_eq!(PayloadFormat::sniff(b"\x89PN"), PayloadFormat::Bmp);
    }

    #[test]
    fn mime_types() {
        assert_eq!(PayloadFormat::Png.mime_type(), "image/png");
        assert_eq!(PayloadFormat::Bmp.mime_type(), "image/bmp");
        assert_eq!(PayloadFormat::Bmp.to_string(), "bmp");
    }
}

//===========================================================================//
