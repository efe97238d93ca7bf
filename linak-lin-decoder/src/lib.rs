//! LINAK LIN Decoder Library
//!
//! Decodes a LIN-bus event stream carrying the LINAK actuator-control protocol
//! into transactions: one record per frame, from one break to the next, with
//! the command name and a human-readable interpretation of the payload.
//!
//! # Architecture
//!
//! - `TransactionAssembler`: break-to-break state machine that buffers data bytes
//!   and strips the trailing checksum once the next break arrives
//! - `commands` / `interpreter`: stateless command table and payload layouts
//! - `Decoder`: ties capture readers and the assembler together
//!
//! The library does NOT:
//! - Decode the LIN physical layer (breaks, PIDs and bytes arrive already framed)
//! - Validate checksums or parity
//! - Render transactions for display
//!
//! # Example Usage
//!
//! ```no_run
//! use linak_lin_decoder::{Decoder, DecoderConfig};
//! use std::path::Path;
//!
//! let config = DecoderConfig::new().with_empty_frames(false);
//! let mut decoder = Decoder::new(config);
//!
//! for transaction in decoder.decode_file(Path::new("capture.jsonl")).unwrap() {
//!     match transaction {
//!         Ok(t) => println!("{:.6}s {}", t.start_time(), t.command()),
//!         Err(e) => eprintln!("Decode error: {}", e),
//!     }
//! }
//! ```

// Public modules
pub mod assembler;
pub mod commands;
pub mod config;
pub mod decoder;
pub mod formats;
pub mod interpreter;
pub mod types;

// Re-export main types for convenience
pub use assembler::{AssemblerState, AssemblerStats, TransactionAssembler};
pub use commands::{command_name, is_known_command, UNKNOWN_COMMAND};
pub use config::DecoderConfig;
pub use decoder::{Decoder, TransactionIterator};
pub use interpreter::{interpret, MotionCommand, PayloadInterpreter};
pub use types::{BusEvent, DecodedTransaction, DecoderError, Result, Timestamp, TransactionKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
