//! Per-image metadata records.

use serde::{Deserialize, Serialize};

use crate::header::SubImageHeaders;

/// Metadata describing one sub-image.
///
/// Field names follow the record layout used by the store
/// (`row1Binary`, `row1BinaryIdx`, ...). Header fields are omitted when the
/// row carried no header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub id: usize,
    pub name: String,
    pub width: usize,
    pub height: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row1_binary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row1_binary_idx: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row2_binary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row2_binary_idx: Option<usize>,
}

impl ImageInfo {
    /// Creates a record without header fields.
    pub fn new(id: usize, width: usize, height: usize) -> Self {
        Self {
            id,
            name: format!("Image{}", id),
            width,
            height,
            row1_binary: None,
            row1_binary_idx: None,
            row2_binary: None,
            row2_binary_idx: None,
        }
    }

    /// Copies extracted headers into the record.
    pub fn apply_headers(&mut self, headers: &SubImageHeaders) {
        if let Some(h) = &headers.first_row {
            self.row1_binary = Some(h.bits.clone());
            self.row1_binary_idx = Some(h.start);
        }
        if let Some(h) = &headers.second_row {
            self.row2_binary = Some(h.bits.clone());
            self.row2_binary_idx = Some(h.start);
        }
    }
}
