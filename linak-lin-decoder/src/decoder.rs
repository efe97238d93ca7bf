//! Main decoder API
//!
//! The `Decoder` ties a capture reader to the transaction assembler and exposes
//! the result as a lazy iterator of decoded transactions.

use crate::assembler::{AssemblerStats, TransactionAssembler};
use crate::config::DecoderConfig;
use crate::formats::{CaptureReader, JsonLinesEventIterator};
use crate::types::{BusEvent, DecodedTransaction, DecoderError, Result};
use std::collections::VecDeque;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// The main decoder struct - entry point for all decoding operations
pub struct Decoder {
    assembler: TransactionAssembler,
    /// Close the last open frame when the event stream ends
    flush_at_end: bool,
}

impl Decoder {
    /// Create a new decoder instance
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            assembler: TransactionAssembler::new(config),
            flush_at_end: false,
        }
    }

    /// Builder method: close the trailing frame when the input ends
    ///
    /// The last frame of a capture has no closing break. By default it is left
    /// open, like any frame still waiting for its break.
    pub fn with_flush_at_end(mut self, enabled: bool) -> Self {
        self.flush_at_end = enabled;
        self
    }

    /// Decode a stream of bus events
    ///
    /// Errors from the input are passed through unchanged; decoding continues
    /// with the next event.
    ///
    /// # Example
    /// ```
    /// use linak_lin_decoder::{BusEvent, Decoder, DecoderConfig};
    ///
    /// let events = vec![
    ///     BusEvent::Break { start_time: 0.0, end_time: 0.1 },
    ///     BusEvent::ProtectedId { value: 36, start_time: 0.2, end_time: 0.3 },
    ///     BusEvent::DataByte { value: 0x01, start_time: 0.4, end_time: 0.5 },
    ///     BusEvent::DataByte { value: 0xFE, start_time: 0.6, end_time: 0.7 },
    ///     BusEvent::Break { start_time: 1.0, end_time: 1.1 },
    /// ];
    ///
    /// let mut decoder = Decoder::new(DecoderConfig::new());
    /// let transactions: Vec<_> = decoder
    ///     .decode_events(events.into_iter().map(Ok))
    ///     .collect::<Result<_, _>>()
    ///     .unwrap();
    ///
    /// assert_eq!(transactions.len(), 1);
    /// assert_eq!(transactions[0].command(), "Request power");
    /// ```
    pub fn decode_events<I>(&mut self, events: I) -> TransactionIterator<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Result<BusEvent>>,
    {
        TransactionIterator::new(events.into_iter(), &mut self.assembler, self.flush_at_end)
    }

    /// Decode a capture file and return an iterator of decoded transactions
    ///
    /// The capture format is chosen from the file extension.
    pub fn decode_file(
        &mut self,
        path: &Path,
    ) -> Result<Box<dyn Iterator<Item = Result<DecodedTransaction>> + '_>> {
        log::info!("Decoding capture: {:?}", path);

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("jsonl") | Some("ndjson") => {
                log::debug!("Detected JSON Lines capture");
                let events: JsonLinesEventIterator<BufReader<File>> = CaptureReader::open(path)?;
                Ok(Box::new(self.decode_events(events)))
            }
            _ => Err(DecoderError::UnsupportedFormat(format!("{:?}", extension))),
        }
    }

    /// Get statistics collected so far
    pub fn stats(&self) -> AssemblerStats {
        self.assembler.stats()
    }

    /// Access the underlying assembler
    pub fn assembler(&self) -> &TransactionAssembler {
        &self.assembler
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(DecoderConfig::default())
    }
}

/// Iterator that assembles bus events into decoded transactions
pub struct TransactionIterator<'a, I>
where
    I: Iterator<Item = Result<BusEvent>>,
{
    events: I,
    assembler: &'a mut TransactionAssembler,
    pending: VecDeque<DecodedTransaction>,
    flush_at_end: bool,
    exhausted: bool,
}

impl<'a, I> TransactionIterator<'a, I>
where
    I: Iterator<Item = Result<BusEvent>>,
{
    fn new(events: I, assembler: &'a mut TransactionAssembler, flush_at_end: bool) -> Self {
        Self {
            events,
            assembler,
            pending: VecDeque::new(),
            flush_at_end,
            exhausted: false,
        }
    }
}

impl<'a, I> Iterator for TransactionIterator<'a, I>
where
    I: Iterator<Item = Result<BusEvent>>,
{
    type Item = Result<DecodedTransaction>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(transaction) = self.pending.pop_front() {
                return Some(Ok(transaction));
            }

            if self.exhausted {
                return None;
            }

            match self.events.next() {
                Some(Ok(event)) => self.pending.extend(self.assembler.process(event)),
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.exhausted = true;
                    if self.flush_at_end {
                        self.pending.extend(self.assembler.finish());
                    }
                }
            }
        }
    }
}
