//! Report generation
//!
//! Renders decoded transactions with the LINAK display templates, or as one
//! JSON object per line.

use crate::config::OutputFormat;
use anyhow::Result;
use linak_lin_decoder::{AssemblerStats, DecodedTransaction, TransactionKind};
use std::io::Write;
use std::path::Path;

/// Render a transaction with its display template
pub fn render_text(transaction: &DecodedTransaction) -> String {
    let body = match transaction.kind() {
        TransactionKind::Transaction => format!(
            "{} (Command: {}, data: {})",
            transaction.parsed_command(),
            transaction.command(),
            transaction.bytes()
        ),
        TransactionKind::Empty => format!("(Command: {})", transaction.command()),
    };

    format!(
        "{:>12.6}s .. {:>12.6}s  {}",
        transaction.start_time(),
        transaction.end_time(),
        body
    )
}

/// Write one transaction in the selected format
pub fn write_transaction<W: Write>(
    out: &mut W,
    transaction: &DecodedTransaction,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Txt => writeln!(out, "{}", render_text(transaction))?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(transaction)?)?,
    }
    Ok(())
}

/// Write the per-capture summary (text output only)
pub fn write_summary<W: Write>(
    out: &mut W,
    capture: &Path,
    stats: &AssemblerStats,
    read_errors: usize,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "=== SUMMARY: {} ===", capture.display())?;
    writeln!(out, "Bus events processed:     {}", stats.events_processed)?;
    writeln!(out, "Transactions:             {}", stats.transactions_emitted)?;
    writeln!(out, "Empty frames shown:       {}", stats.empty_frames_emitted)?;
    writeln!(out, "Empty frames hidden:      {}", stats.empty_frames_suppressed)?;
    writeln!(out, "Frames without PID:       {}", stats.orphan_spans_dropped)?;
    writeln!(out, "Unknown commands:         {}", stats.unknown_commands)?;
    writeln!(out, "Unreadable capture lines: {}", read_errors)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position_frame() -> DecodedTransaction {
        DecodedTransaction::Transaction {
            start_time: 0.5,
            end_time: 0.75,
            pid: 5,
            command: "Ref6 Position and status",
            bytes: "6400".to_string(),
            parsed_command: "Ref6 position: 10.0mm".to_string(),
        }
    }

    #[test]
    fn test_render_text_templates() {
        assert_eq!(
            render_text(&position_frame()),
            "    0.500000s ..     0.750000s  Ref6 position: 10.0mm (Command: Ref6 Position and status, data: 6400)"
        );

        let empty = DecodedTransaction::Empty {
            start_time: 1.0,
            end_time: 1.25,
            pid: 36,
            command: "Request power",
        };
        assert_eq!(
            render_text(&empty),
            "    1.000000s ..     1.250000s  (Command: Request power)"
        );
    }

    #[test]
    fn test_write_json_line() {
        let mut out = Vec::new();
        write_transaction(&mut out, &position_frame(), OutputFormat::Json).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["type"], "LINAK_frame_transaction");
        assert_eq!(value["parsed_command"], "Ref6 position: 10.0mm");
    }

    #[test]
    fn test_summary() {
        let stats = AssemblerStats {
            events_processed: 10,
            transactions_emitted: 2,
            ..Default::default()
        };
        let mut out = Vec::new();
        write_summary(&mut out, Path::new("desk.jsonl"), &stats, 1).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("=== SUMMARY: desk.jsonl ==="));
        assert!(text.contains("Bus events processed:     10"));
        assert!(text.contains("Unreadable capture lines: 1"));
    }
}
