//! Sub-image height detection.
//!
//! Right after the first row, the message repeats a row with a single set
//! bit. The length of that run (plus the first row) is the height of every
//! embedded image, so it is rediscovered here instead of being hardcoded.

use crate::matrix::Matrix;

/// Sum of a row's cell values.
pub fn row_sum(row: &[u8]) -> u32 {
    row.iter().map(|&v| u32::from(v)).sum()
}

/// Counts the rows after row 0 whose sum is exactly 1, stopping at the first
/// row that is not, and adds one for row 0.
///
/// If row 1 does not sum to 1 (or there is no row 1) the result is 1. That
/// is degenerate for real input but is returned as is; callers must cope
/// with it.
pub fn detect_image_height(matrix: &Matrix) -> usize {
    let mut height = 1;
    for row in matrix.rows().skip(1) {
        if row_sum(row) != 1 {
            break;
        }
        height += 1;
    }
    height
}

/// Splits `total_rows` into whole images of `image_height` rows.
///
/// Returns `(images, leftover_rows)`. A zero height yields no images and
/// leaves every row over.
pub fn image_count(total_rows: usize, image_height: usize) -> (usize, usize) {
    match image_height {
        0 => (0, total_rows),
        h => (total_rows / h, total_rows % h),
    }
}
