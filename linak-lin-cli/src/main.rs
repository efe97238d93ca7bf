//! LINAK LIN Decoder CLI Application
//!
//! Command-line front end for the linak-lin-decoder library. It reads LIN
//! analyzer captures, decodes them into LINAK transactions and prints them
//! with the display templates (or as JSON lines).

use anyhow::{bail, Context, Result};
use clap::Parser;
use linak_lin_decoder::Decoder;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

mod config;
mod report;

use config::{AppConfig, OutputFormat};

/// LINAK LIN Decoder - Decode LINAK actuator traffic from LIN captures
#[derive(Parser, Debug)]
#[command(name = "linak-lin")]
#[command(about = "Decode LINAK actuator transactions from LIN analyzer captures", long_about = None)]
#[command(version)]
struct Args {
    /// Capture file(s) to decode (JSON Lines, can be repeated)
    #[arg(short, long, value_name = "FILE")]
    input: Vec<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output file for decoded transactions (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Do not show empty frames
    #[arg(long, conflicts_with = "show_empty")]
    hide_empty: bool,

    /// Show empty frames
    #[arg(long)]
    show_empty: bool,

    /// Leave the last frame of each capture open instead of closing it at end of file
    #[arg(long)]
    no_flush: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("LINAK LIN Decoder CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", linak_lin_decoder::VERSION);

    let config = resolve_config(&args)?;

    if config.input.files.is_empty() {
        bail!("No input specified. Use --input <capture.jsonl> or a config file with [input] files");
    }

    let mut out: Box<dyn Write> = match &config.output.output_file {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    for capture in &config.input.files {
        decode_capture(capture, &config, &mut out)?;
    }

    out.flush()?;
    Ok(())
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if !args.input.is_empty() {
        config.input.files = args.input.clone();
    }
    if let Some(path) = &args.output {
        config.output.output_file = Some(path.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.hide_empty {
        config.decoder.settings.show_empty_frames = false;
    }
    if args.show_empty {
        config.decoder.settings.show_empty_frames = true;
    }
    if args.no_flush {
        config.decoder.flush_at_end = false;
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Decode one capture file and write its transactions
fn decode_capture<W: Write>(capture: &Path, config: &AppConfig, out: &mut W) -> Result<()> {
    let mut decoder = Decoder::new(config.decoder.settings.clone())
        .with_flush_at_end(config.decoder.flush_at_end);

    let mut read_errors = 0;
    {
        let transactions = decoder
            .decode_file(capture)
            .with_context(|| format!("Failed to open capture: {:?}", capture))?;

        for transaction in transactions {
            match transaction {
                Ok(transaction) => report::write_transaction(out, &transaction, config.output.format)?,
                Err(e) => {
                    log::warn!("{:?}: {}", capture, e);
                    read_errors += 1;
                }
            }
        }
    }

    let stats = decoder.stats();
    log::info!(
        "{:?}: {} transactions, {} empty frames, {} frames without PID",
        capture,
        stats.transactions_emitted,
        stats.empty_frames_emitted,
        stats.orphan_spans_dropped
    );

    if config.output.include_summary && config.output.format == OutputFormat::Txt {
        report::write_summary(out, capture, &stats, read_errors)?;
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
