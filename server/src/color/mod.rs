//! Color naming core: reference catalog lookup and dominant color extraction.

mod catalog;
mod extractor;
mod identifier;

use serde::Serialize;

pub use catalog::ReferenceCatalog;
pub use extractor::{DominantColorExtractor, ExtractorSettings};
pub use identifier::ColorIdentifier;

/// One dominant color of an image, named after its nearest catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DominantColor {
    pub name: String,
    pub hex: String,
    pub rgb: [u8; 3],
}

/// Name of a single queried RGB value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RgbMatch {
    pub name: String,
    pub hex: String,
}

/// Format as lowercase `#rrggbb`
pub fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}


#[cfg(test)]
mod tests {
    use super::test_support::parse_hex;
    use super::*;

    #[test]
    fn hex_is_lowercase_and_zero_padded() {
        assert_eq!(to_hex([250, 10, 10]), "#fa0a0a");
        assert_eq!(to_hex([0, 0, 0]), "#000000");
        assert_eq!(to_hex([171, 205, 239]), "#abcdef");
    }

    #[test]
    fn hex_parses_back_to_rgb() {
        for rgb in [[0, 0, 0], [255, 255, 255], [18, 52, 86], [250, 10, 10]] {
            assert_eq!(parse_hex(&to_hex(rgb)), Some(rgb));
        }
    }
}
