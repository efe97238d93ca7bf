//! Capture file readers
//!
//! Each reader turns an exported LIN analyzer capture into an iterator over
//! `BusEvent` objects.

use crate::types::{BusEvent, Result};
use std::path::Path;

pub mod jsonl;

pub use jsonl::{JsonLinesEventIterator, JsonLinesReader};

/// Common trait for all capture readers
pub trait CaptureReader: Iterator<Item = Result<BusEvent>> + Sized {
    /// Open a capture file and return an iterator over bus events
    fn open(path: &Path) -> Result<Self>;
}
