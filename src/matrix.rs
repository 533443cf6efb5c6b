//! Fixed-width reshaping of the raw message.
//!
//! Every character is parsed as a decimal digit (its value, not its code
//! point) and laid out row-major. The character count must be an exact
//! multiple of the column count; nothing is ever padded or truncated.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::fetch::RawMessage;

/// Errors that can occur while building a matrix.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MatrixError {
    #[error("Column count must be greater than zero")]
    ZeroColumns,

    #[error(
        "Message of {len} characters cannot be reshaped into rows of {columns} \
         ({remainder} left over)"
    )]
    Shape {
        len: usize,
        columns: usize,
        remainder: usize,
    },

    #[error("Non-digit character {found:?} at index {index}")]
    InvalidCharacter { index: usize, found: char },

    #[error("Cell value {value} at index {index} is not a digit")]
    InvalidCell { index: usize, value: u8 },

    #[error("Row range {start}..{end} is out of bounds for {rows} rows")]
    RowRange { start: usize, end: usize, rows: usize },
}

/// A row-major grid of digit values with a fixed column count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    columns: usize,
    cells: Vec<u8>,
}

impl Matrix {
    /// Builds a matrix from cell values, checking the shape and that every
    /// cell is a digit value (0..=9).
    pub fn from_cells(cells: Vec<u8>, columns: usize) -> Result<Self, MatrixError> {
        if columns == 0 {
            return Err(MatrixError::ZeroColumns);
        }
        let remainder = cells.len() % columns;
        if remainder != 0 {
            return Err(MatrixError::Shape {
                len: cells.len(),
                columns,
                remainder,
            });
        }
        if let Some((index, &value)) = cells.iter().enumerate().find(|(_, &v)| v > 9) {
            return Err(MatrixError::InvalidCell { index, value });
        }
        Ok(Self { columns, cells })
    }

    /// Number of cells per row.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.cells.len() / self.columns
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Returns row `index`, if present.
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.columns)?;
        self.cells.get(start..start + self.columns)
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.cells.chunks_exact(self.columns)
    }

    /// Copies rows `start..end` into a new matrix.
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<Matrix, MatrixError> {
        let rows = self.row_count();
        if start > end || end > rows {
            return Err(MatrixError::RowRange { start, end, rows });
        }
        Ok(Matrix {
            columns: self.columns,
            cells: self.cells[start * self.columns..end * self.columns].to_vec(),
        })
    }

    /// Flattens back into digit characters, row-major.
    pub fn to_message_string(&self) -> String {
        self.cells.iter().map(|&v| digit_char(v)).collect()
    }

    /// Renders one line of digits per row, each terminated by `\n`.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.row_count());
        for row in self.rows() {
            out.extend(row.iter().map(|&v| digit_char(v)));
            out.push('\n');
        }
        out
    }

    /// Writes [`Matrix::to_text`] to `path`, replacing any existing file.
    pub fn write_text<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_text())
    }

    /// Short human-readable shape, e.g. `5299x359`.
    pub fn shape(&self) -> String {
        format!("{}x{}", self.row_count(), self.columns)
    }
}

/// Reshapes `raw` into rows of `columns` digit values.
pub fn build_matrix(raw: &RawMessage, columns: usize) -> Result<Matrix, MatrixError> {
    if columns == 0 {
        return Err(MatrixError::ZeroColumns);
    }

    let len = raw.char_count();
    let remainder = len % columns;
    if remainder != 0 {
        return Err(MatrixError::Shape {
            len,
            columns,
            remainder,
        });
    }

    let cells = raw
        .as_str()
        .chars()
        .enumerate()
        .map(|(index, found)| {
            found
                .to_digit(10)
                .map(|d| d as u8)
                .ok_or(MatrixError::InvalidCharacter { index, found })
        })
        .collect::<Result<Vec<u8>, _>>()?;

    Matrix::from_cells(cells, columns)
}

// Cells only ever hold 0..=9
fn digit_char(value: u8) -> char {
    char::from(b'0' + value)
}
