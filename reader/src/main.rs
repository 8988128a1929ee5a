//! Print the entries and segment offsets of a multistream index.
//!
//! Every entry of the index is logged as it is decoded. Once the index has been read (or
//! `--count` entries have been read), the distinct segment offsets are logged. The first
//! malformed line, read failure, or termination request (SIGINT/SIGTERM) ends the run with
//! a non-zero exit code.
//!
//! # Usage
//!
//! _Grab an index from <https://dumps.wikimedia.org/enwiki/> (any `*-multistream-index.txt.bz2`)._
//!
//! ```sh
//! cargo run --release --bin multistream-reader -- --indexfile enwiki-20250101-pages-articles-multistream-index.txt.bz2 --bzip2 --count 100
//! ```
//!
//! ```sh
//! bzip2 -dc enwiki-20250101-pages-articles-multistream-index.txt.bz2 | cargo run --release --bin multistream-reader -- --stdin
//! ```

use clap::{value_parser, Arg, ArgAction, Command};
use multistream_index::{
    signal::Signaler,
    source::{Compression, Config},
};
use std::{
    fs::File,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};
use tracing::{debug, error, info};

mod read;

/// Flag for verbose output
const VERBOSE_FLAG: &str = "verbose";

/// Signal number reported for an interrupt request.
const SIGINT: i32 = 2;

/// Signal number reported for a termination request.
#[cfg(unix)]
const SIGTERM: i32 = 15;

/// Resolves once the process is asked to stop, returning the signal number.
#[cfg(unix)]
async fn stopped() -> io::Result<i32> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = interrupt.recv() => Ok(SIGINT),
        _ = terminate.recv() => Ok(SIGTERM),
    }
}

/// Resolves once the process is asked to stop, returning the signal number.
#[cfg(not(unix))]
async fn stopped() -> io::Result<i32> {
    tokio::signal::ctrl_c().await?;
    Ok(SIGINT)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse arguments
    let matches = Command::new("multistream-reader")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Print the entries and segment offsets of a multistream index.")
        .arg(
            Arg::new("indexfile")
                .long("indexfile")
                .required_unless_present("stdin")
                .help("Path of the index file")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("stdin")
                .long("stdin")
                .conflicts_with("indexfile")
                .help("Read the index from stdin")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("bzip2")
                .long("bzip2")
                .help("Index is bzip2 compressed")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("zstd")
                .long("zstd")
                .conflicts_with("bzip2")
                .help("Index is zstd compressed")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .default_value("0")
                .help("Entries to read (0 reads the whole index)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new(VERBOSE_FLAG)
                .short('v')
                .long(VERBOSE_FLAG)
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Create logger
    let level = if matches.get_flag(VERBOSE_FLAG) {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    // Configure decoder
    let compression = if matches.get_flag("bzip2") {
        Compression::Bzip2
    } else if matches.get_flag("zstd") {
        Compression::Zstd
    } else {
        Compression::None
    };
    let count = *matches.get_one::<u64>("count").unwrap();

    // Open index
    let reader: Box<dyn Read + Send> = match matches.get_one::<PathBuf>("indexfile") {
        Some(path) => {
            info!(path = %path.display(), "opening index");
            match File::open(path) {
                Ok(file) => Box::new(file),
                Err(e) => {
                    error!(path = %path.display(), error = ?e, "failed to open index");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => Box::new(io::stdin()),
    };

    // Forward termination requests to the decoder
    let (signaler, signal) = Signaler::new();
    tokio::spawn(async move {
        match stopped().await {
            Ok(value) => {
                info!(signal = value, "stopping");
                signaler.signal(value);
            }
            Err(e) => error!(error = ?e, "failed to install signal handlers"),
        }
    });

    // Read index
    info!(?compression, count, "reading index");
    let pass = tokio::task::spawn_blocking(move || {
        read::run(reader, Config { compression }, &signal, count)
    });
    match pass.await {
        Ok(Ok(summary)) => {
            info!(
                entries = summary.entries,
                offsets = summary.offsets.len(),
                "finished reading index"
            );
            debug!(offsets = ?summary.offsets, "segment offsets");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!(error = ?e, "failed to read index");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = ?e, "reader task failed");
            ExitCode::FAILURE
        }
    }
}
