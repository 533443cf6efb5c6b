//! Shared fixtures: a synthetic message with the same shape as the real one.

#![allow(dead_code)]

use std::cell::Cell;

use seti_decoder::{FetchError, MessageTransport};

pub const ROWS: usize = 5299;
pub const COLUMNS: usize = 359;
pub const HEIGHT: usize = 757;
pub const IMAGES: usize = 7;

/// Builds a 5299x359 message made of 7 images of 757 rows.
///
/// - Row 0 of image `k` has bits at columns `10+k`, `12+k`, `13+k`
///   (header `1011` starting at `10+k`).
/// - Rows 1..757 of image 0 have a single bit in the last column, which is
///   the marker run the height detector looks for.
/// - Other rows of later images carry two bits.
pub fn synthetic_message() -> String {
    let mut out = String::with_capacity(ROWS * COLUMNS);
    for row in 0..ROWS {
        let image = row / HEIGHT;
        let local = row % HEIGHT;
        let mut cells = vec![b'0'; COLUMNS];

        if local == 0 {
            for col in [10 + image, 12 + image, 13 + image] {
                cells[col] = b'1';
            }
        } else if image == 0 {
            cells[COLUMNS - 1] = b'1';
        } else {
            cells[(local * 7 + image) % (COLUMNS - 1)] = b'1';
            cells[COLUMNS - 1] = b'1';
        }

        out.extend(cells.into_iter().map(char::from));
    }
    out
}

/// Serves a fixed body and counts how often it was asked.
pub struct CountingTransport {
    body: String,
    calls: Cell<usize>,
}

impl CountingTransport {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl MessageTransport for CountingTransport {
    fn get_text(&self, _url: &str) -> Result<String, FetchError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.body.clone())
    }
}

/// Fails every request, as an unreachable host would.
pub struct OfflineTransport;

impl MessageTransport for OfflineTransport {
    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        Err(FetchError::Status {
            url: url.to_string(),
            status: 503,
        })
    }
}
