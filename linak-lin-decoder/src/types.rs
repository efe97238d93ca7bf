//! Core types for the LINAK LIN decoder library
//!
//! This module defines the bus events the decoder consumes and the transaction
//! records it emits. The lower-layer LIN analyzer has already split the stream
//! into break, protected identifier and data bytes; nothing here looks at bits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp type used throughout the decoder (seconds since capture start)
pub type Timestamp = f64;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// A single framed event produced by the LIN physical-layer analyzer
///
/// The serde representation follows the analyzer's frame type names so that a
/// capture exported as JSON lines deserializes directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BusEvent {
    /// Frame break: closes the previous transaction and opens a new one
    #[serde(rename = "header_break")]
    Break {
        start_time: Timestamp,
        end_time: Timestamp,
    },

    /// Protected identifier with the parity bits already stripped (6 bits)
    #[serde(rename = "header_pid")]
    ProtectedId {
        #[serde(rename = "protected_id")]
        value: u8,
        start_time: Timestamp,
        end_time: Timestamp,
    },

    /// One response byte. The final byte of every frame is the checksum, but
    /// that is only known once the next break arrives.
    #[serde(rename = "data", alias = "data_or_checksum")]
    DataByte {
        #[serde(rename = "data")]
        value: u8,
        start_time: Timestamp,
        end_time: Timestamp,
    },
}

impl BusEvent {
    /// Analyzer frame type names that map onto a `BusEvent`
    pub const FRAME_TYPES: [&'static str; 4] =
        ["header_break", "header_pid", "data", "data_or_checksum"];

    /// Get the start time of this event
    pub fn start_time(&self) -> Timestamp {
        match self {
            BusEvent::Break { start_time, .. } => *start_time,
            BusEvent::ProtectedId { start_time, .. } => *start_time,
            BusEvent::DataByte { start_time, .. } => *start_time,
        }
    }

    /// Get the end time of this event
    pub fn end_time(&self) -> Timestamp {
        match self {
            BusEvent::Break { end_time, .. } => *end_time,
            BusEvent::ProtectedId { end_time, .. } => *end_time,
            BusEvent::DataByte { end_time, .. } => *end_time,
        }
    }
}

/// Errors that can occur while reading captures
///
/// Decoding itself never fails; these only come from the capture readers and
/// file handling in the decoder facade.
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Failed to parse capture line {line}: {message}")]
    CaptureParse { line: usize, message: String },

    #[error("Unsupported capture format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Kind tag of a decoded transaction, used to pick a display template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// Frame with at least one payload byte
    Transaction,
    /// Frame with no payload (header only, or a lone checksum byte)
    Empty,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Transaction => "LINAK_frame_transaction",
            TransactionKind::Empty => "LINAK_frame_empty",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One completed LIN frame span, break to break - the primary output of the decoder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DecodedTransaction {
    /// A frame with a reported payload (checksum byte removed)
    #[serde(rename = "LINAK_frame_transaction")]
    Transaction {
        /// Start of the break that opened the frame
        start_time: Timestamp,
        /// End of the last event before the closing break
        end_time: Timestamp,
        /// Protected identifier of the frame
        pid: u8,
        /// Command display name from the command table
        #[serde(rename = "cmd")]
        command: &'static str,
        /// Reported payload as lowercase hex
        bytes: String,
        /// Human-readable interpretation (empty if the payload is not understood)
        parsed_command: String,
    },

    /// A frame without payload bytes
    #[serde(rename = "LINAK_frame_empty")]
    Empty {
        start_time: Timestamp,
        end_time: Timestamp,
        pid: u8,
        #[serde(rename = "cmd")]
        command: &'static str,
    },
}

impl DecodedTransaction {
    /// Get the kind tag of this transaction
    pub fn kind(&self) -> TransactionKind {
        match self {
            DecodedTransaction::Transaction { .. } => TransactionKind::Transaction,
            DecodedTransaction::Empty { .. } => TransactionKind::Empty,
        }
    }

    pub fn start_time(&self) -> Timestamp {
        match self {
            DecodedTransaction::Transaction { start_time, .. } => *start_time,
            DecodedTransaction::Empty { start_time, .. } => *start_time,
        }
    }

    pub fn end_time(&self) -> Timestamp {
        match self {
            DecodedTransaction::Transaction { end_time, .. } => *end_time,
            DecodedTransaction::Empty { end_time, .. } => *end_time,
        }
    }

    pub fn pid(&self) -> u8 {
        match self {
            DecodedTransaction::Transaction { pid, .. } => *pid,
            DecodedTransaction::Empty { pid, .. } => *pid,
        }
    }

    /// Get the command display name
    pub fn command(&self) -> &'static str {
        match self {
            DecodedTransaction::Transaction { command, .. } => command,
            DecodedTransaction::Empty { command, .. } => command,
        }
    }

    /// Hex payload text (empty for `Empty` records)
    pub fn bytes(&self) -> &str {
        match self {
            DecodedTransaction::Transaction { bytes, .. } => bytes,
            DecodedTransaction::Empty { .. } => "",
        }
    }

    /// Interpretation text (empty for `Empty` records)
    pub fn parsed_command(&self) -> &str {
        match self {
            DecodedTransaction::Transaction { parsed_command, .. } => parsed_command,
            DecodedTransaction::Empty { .. } => "",
        }
    }

    /// Decode the hex payload back into bytes (empty for `Empty` records)
    pub fn payload(&self) -> Vec<u8> {
        match self {
            DecodedTransaction::Transaction { bytes, .. } => hex::decode(bytes).unwrap_or_default(),
            DecodedTransaction::Empty { .. } => Vec::new(),
        }
    }

    /// True if this is an `Empty` record
    pub fn is_empty(&self) -> bool {
        self.kind() == TransactionKind::Empty
    }
}
