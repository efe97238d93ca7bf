//! Transaction assembly
//!
//! LIN frames do not carry their length in-band, so a frame can only be closed
//! when the next break arrives. The assembler buffers every data byte seen since
//! the last break and, on the following break, treats the last buffered byte as
//! the checksum.
//!
//! ```text
//! Break ─ PID ─ Data ─ Data ─ ... ─ Data(checksum) ─ Break ─ ...
//! └──────────────── one transaction ──────────────┘
//! ```

use crate::commands::{command_name, is_known_command};
use crate::config::DecoderConfig;
use crate::interpreter::PayloadInterpreter;
use crate::types::{BusEvent, DecodedTransaction, Timestamp};

/// Phase of the assembler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    /// No break seen yet (or reset/finished): nothing to close
    AwaitingFirstBreak,
    /// A break opened a span that the next break will close
    AccumulatingTransaction,
}

/// Counters collected while assembling transactions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    /// Total number of bus events processed
    pub events_processed: usize,
    /// Records emitted with a payload
    pub transactions_emitted: usize,
    /// `Empty` records emitted
    pub empty_frames_emitted: usize,
    /// Empty spans dropped because empty frames are hidden
    pub empty_frames_suppressed: usize,
    /// Spans dropped because no protected identifier was seen
    pub orphan_spans_dropped: usize,
    /// Emitted records whose identifier is not in the command table
    pub unknown_commands: usize,
}

/// Per-span state, cleared on every break
#[derive(Debug, Clone, Default, PartialEq)]
struct TransactionState {
    start_time: Option<Timestamp>,
    last_end_time: Option<Timestamp>,
    pid: Option<u8>,
    /// Data bytes including the trailing checksum
    payload: Vec<u8>,
}

impl TransactionState {
    fn clear(&mut self) {
        self.start_time = None;
        self.last_end_time = None;
        self.pid = None;
        self.payload.clear();
    }
}

/// Break-to-break frame assembler
///
/// Feed events in arrival order with [`process`](Self::process). Each call
/// returns at most one completed transaction.
#[derive(Debug, Clone)]
pub struct TransactionAssembler {
    config: DecoderConfig,
    state: TransactionState,
    stats: AssemblerStats,
}

impl TransactionAssembler {
    /// Create a new assembler
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            state: TransactionState::default(),
            stats: AssemblerStats::default(),
        }
    }

    /// Process a single bus event
    ///
    /// Returns the transaction closed by this event, if any. Only breaks can
    /// close a transaction; the very first break never does.
    pub fn process(&mut self, event: BusEvent) -> Vec<DecodedTransaction> {
        log::trace!("Bus event: {:?}", event);
        self.stats.events_processed += 1;

        let mut transactions = Vec::new();

        match event {
            BusEvent::Break { start_time, .. } => {
                transactions.extend(self.close_span());
                self.state.clear();
                self.state.start_time = Some(start_time);
            }
            BusEvent::ProtectedId { value, .. } => {
                if let Some(previous) = self.state.pid {
                    log::debug!("Protected identifier {} replaced by {} within one frame", previous, value);
                }
                self.state.pid = Some(value);
            }
            BusEvent::DataByte { value, .. } => {
                self.state.payload.push(value);
            }
        }

        self.state.last_end_time = Some(event.end_time());
        transactions
    }

    /// Close the currently open span at the end of a capture
    ///
    /// Applies the same rules as a break, but does not open a new span: the
    /// assembler returns to [`AssemblerState::AwaitingFirstBreak`].
    pub fn finish(&mut self) -> Option<DecodedTransaction> {
        let transaction = self.close_span();
        self.state.clear();
        transaction
    }

    /// Drop any partially assembled span and return to the initial state
    ///
    /// Statistics are kept.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Get the current phase of the assembler
    pub fn state(&self) -> AssemblerState {
        if self.state.start_time.is_some() {
            AssemblerState::AccumulatingTransaction
        } else {
            AssemblerState::AwaitingFirstBreak
        }
    }

    /// Get statistics collected so far
    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }

    /// Build the record for the open span, if it should be reported
    fn close_span(&mut self) -> Option<DecodedTransaction> {
        let start_time = self.state.start_time?;
        let end_time = self.state.last_end_time.unwrap_or(start_time);

        let Some(pid) = self.state.pid else {
            log::debug!(
                "Dropping frame at {:.6}s: no protected identifier ({} data bytes)",
                start_time,
                self.state.payload.len()
            );
            self.stats.orphan_spans_dropped += 1;
            return None;
        };

        let command = command_name(i64::from(pid));

        // Last byte is the checksum
        let transaction = match self.state.payload.split_last() {
            Some((_checksum, payload)) if !payload.is_empty() => DecodedTransaction::Transaction {
                start_time,
                end_time,
                pid,
                command,
                bytes: hex::encode(payload),
                parsed_command: PayloadInterpreter::interpret(i64::from(pid), payload),
            },
            _ if self.config.show_empty_frames => DecodedTransaction::Empty {
                start_time,
                end_time,
                pid,
                command,
            },
            _ => {
                log::debug!("Suppressing empty frame at {:.6}s ({})", start_time, command);
                self.stats.empty_frames_suppressed += 1;
                return None;
            }
        };

        match transaction {
            DecodedTransaction::Transaction { .. } => self.stats.transactions_emitted += 1,
            DecodedTransaction::Empty { .. } => self.stats.empty_frames_emitted += 1,
        }
        if !is_known_command(i64::from(pid)) {
            log::debug!("Unknown protected identifier {} at {:.6}s", pid, start_time);
            self.stats.unknown_commands += 1;
        }

        Some(transaction)
    }
}

impl Default for TransactionAssembler {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}
