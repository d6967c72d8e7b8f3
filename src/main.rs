//! gps-dump - GPS communication dump daemon
//!
//! Streams raw receiver traffic from a file or stdin through a
//! [`GpsDumper`] and records every completed window to a dump file.
//!
//! ```text
//! input ──chunks──▶ GpsDumper ──ChannelSink──▶ dump-writer thread ──▶ DumpRecorder
//! ```
//!
//! With `overflow = "drop"` the dumper never waits on the writer and late
//! records are counted as dropped; the default `block` keeps the capture
//! complete.

use clap::Parser;
use gps_dump::config::Config;
use gps_dump::core::MonotonicClock;
use gps_dump::error::{Error, Result};
use gps_dump::sink::{ChannelSink, DumpRecorder, DumpSink};
use gps_dump::{Direction, GpsDumper};
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[derive(Parser)]
#[command(name = "gps-dump")]
#[command(about = "Record raw GPS receiver traffic into fixed-size timestamped dump records")]
struct Args {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input file, `-` for stdin (overrides config)
    #[arg(short, long)]
    input: Option<String>,

    /// Output dump file (overrides config)
    #[arg(short, long)]
    output: Option<String>,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(input) = &args.input {
        config.input.path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output.path = output.clone();
    }
    config.validate()?;
    Ok(config)
}

fn open_input(path: &str) -> Result<Box<dyn Read + Send>> {
    if path == "-" {
        Ok(Box::new(io::stdin()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("gps-dump v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Input: {} (mode={}, {:?}), output: {} ({:?})",
        config.input.path,
        config.input.mode,
        config.input.direction,
        config.output.path,
        config.output.format
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let mut recorder = DumpRecorder::create(&config.output.path, config.output.format)?;
    let (sink, rx) =
        ChannelSink::with_policy(config.output.queue_depth, config.output.overflow);

    let writer = thread::Builder::new()
        .name("dump-writer".to_string())
        .spawn(move || {
            for dump in rx.iter() {
                recorder.publish(&dump);
            }
            recorder.finish()
        })
        .map_err(|e| Error::Other(format!("Failed to spawn dump writer: {}", e)))?;

    let mut dumper = GpsDumper::new(&config.dump, MonotonicClock::new(), sink)?;
    let mut input = open_input(&config.input.path)?;
    let mut buffer = vec![0u8; config.input.chunk_size];

    // The flag is only checked between reads; an idle stdin holds shutdown
    // until the next chunk or EOF arrives.
    while running.load(Ordering::Relaxed) {
        let n = match input.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                log::error!("Input read error: {}", e);
                break;
            }
        };
        dumper.dump(&buffer[..n], config.input.mode, config.input.direction);
    }

    let stats = dumper.stats();
    for direction in [Direction::FromDevice, Direction::ToDevice] {
        if let Some(pending) = dumper.pending(direction) {
            if !pending.is_empty() {
                log::info!(
                    "{} bytes pending in {:?} window, not recorded",
                    pending.len(),
                    direction
                );
            }
        }
    }

    let sink = dumper.into_sink();
    log::info!(
        "Dumped {} bytes into {} records ({} filtered calls, {} records dropped)",
        stats.bytes_accepted,
        stats.records_published,
        stats.filtered_calls,
        sink.dropped()
    );
    // Closing the channel ends the writer loop
    drop(sink);

    let info = writer
        .join()
        .map_err(|_| Error::Other("dump writer thread panicked".to_string()))??;
    log::info!(
        "Wrote {} records ({} to device) to {} ({} bytes, {} failed writes)",
        info.record_count,
        info.to_device_count,
        info.path.display(),
        info.file_size_bytes,
        info.failed_writes
    );

    log::info!("gps-dump stopped");
    Ok(())
}
