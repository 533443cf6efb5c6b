//! Binary header extraction.
//!
//! The first two rows of every sub-image look like a code rather than
//! picture data. A row with more than one set bit is read as a binary
//! number: the run from the first `1` through the last `1`, together with
//! the index it starts at.

use serde::{Deserialize, Serialize};

use crate::render::SubImage;

/// A binary run extracted from one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryHeader {
    /// Digits from the first `1` through the last `1`, inclusive.
    pub bits: String,
    /// Column of the first `1`.
    pub start: usize,
}

/// Headers of a sub-image's first and second rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubImageHeaders {
    pub first_row: Option<BinaryHeader>,
    pub second_row: Option<BinaryHeader>,
}

impl SubImageHeaders {
    /// Reads the headers of `image`'s first two rows.
    pub fn from_sub_image(image: &SubImage) -> Self {
        let header_of = |index| {
            image
                .matrix()
                .row(index)
                .and_then(|row| extract_header(&row_to_bits(row)))
        };
        Self {
            first_row: header_of(0),
            second_row: header_of(1),
        }
    }
}

/// Renders a row as a string of digit characters.
pub fn row_to_bits(row: &[u8]) -> String {
    row.iter().map(|&v| char::from(b'0' + v)).collect()
}

/// Number of `'1'` characters in `bits`.
pub fn count_ones(bits: &str) -> usize {
    bits.chars().filter(|&c| c == '1').count()
}

/// Extracts the header run of a row, or `None` for rows with at most one
/// set bit.
pub fn extract_header(bits: &str) -> Option<BinaryHeader> {
    if count_ones(bits) <= 1 {
        return None;
    }
    let start = bits.find('1')?;
    let end = bits.rfind('1')?;
    Some(BinaryHeader {
        bits: bits[start..=end].to_string(),
        start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;

    #[test]
    fn test_single_bit_row_has_no_header() {
        assert_eq!(extract_header("00010"), None);
    }

    #[test]
    fn test_empty_row_has_no_header() {
        assert_eq!(extract_header("00000"), None);
        assert_eq!(extract_header(""), None);
    }

    #[test]
    fn test_header_spans_first_to_last_set_bit() {
        let header = extract_header("011010").unwrap();
        assert_eq!(header.bits, "1101");
        assert_eq!(header.start, 1);
    }

    #[test]
    fn test_header_keeps_inner_zero_runs() {
        let header = extract_header("0001000001000").unwrap();
        assert_eq!(header.bits, "1000001");
        assert_eq!(header.start, 3);
    }

    #[test]
    fn test_row_to_bits() {
        assert_eq!(row_to_bits(&[0, 1, 1, 0]), "0110");
        assert_eq!(count_ones("0110"), 2);
    }

    #[test]
    fn test_sub_image_headers() {
        let matrix = Matrix::from_cells(vec![0, 1, 0, 1, 0, 0, 1, 0, 0, 0, 1, 1], 4).unwrap();
        let image = SubImage::new(0, matrix);

        let headers = SubImageHeaders::from_sub_image(&image);
        assert_eq!(
            headers.first_row,
            Some(BinaryHeader {
                bits: "101".into(),
                start: 1
            })
        );
        assert_eq!(headers.second_row, None);
    }

    #[test]
    fn test_one_row_sub_image_has_no_second_header() {
        let matrix = Matrix::from_cells(vec![1, 1, 0], 3).unwrap();
        let image = SubImage::new(0, matrix);

        let headers = SubImageHeaders::from_sub_image(&image);
        assert!(headers.first_row.is_some());
        assert!(headers.second_row.is_none());
    }
}
