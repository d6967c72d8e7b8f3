//! Dump file inspector
//!
//! Prints the header of a gps-dump file and each record as a hex line, for
//! protocol analysis and debugging.
//!
//! # Usage
//!
//! ```bash
//! dump_inspect gps_dump.bin --limit 20
//! ```

use clap::Parser;
use gps_dump::sink::DumpPlayer;

/// UBX sync characters
const UBX_SYNC: [u8; 2] = [0xB5, 0x62];
/// RTCM3 preamble
const RTCM3_PREAMBLE: u8 = 0xD3;

#[derive(Parser)]
#[command(name = "dump_inspect")]
#[command(about = "Print the records of a gps-dump file as hex")]
struct Args {
    /// Dump file to inspect
    file: String,

    /// Maximum number of records to print (0 = all)
    #[arg(short, long, default_value = "0")]
    limit: u64,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut player = DumpPlayer::open(&args.file)?;
    let header = player.header().clone();

    log::info!("=== GPS Dump Inspector ===");
    log::info!("File: {}", args.file);
    log::info!(
        "Format: {:?}, records: {}, span: {:.3}s",
        player.format(),
        header.record_count,
        header.duration_us() as f64 / 1_000_000.0
    );

    let mut printed = 0u64;
    let mut ubx_frames = 0usize;
    let mut rtcm_frames = 0usize;
    while let Some(dump) = player.next_dump()? {
        if args.limit > 0 && printed >= args.limit {
            break;
        }
        printed += 1;

        let hex_line: String = dump
            .data
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");

        println!(
            "[{:06}] t={}us inst={} {} {} bytes: {}",
            printed,
            dump.timestamp_us,
            dump.instance,
            if dump.to_device { "TX" } else { "RX" },
            dump.len(),
            hex_line
        );

        ubx_frames += dump.data.windows(2).filter(|w| *w == UBX_SYNC).count();
        rtcm_frames += dump
            .data
            .iter()
            .filter(|&&b| b == RTCM3_PREAMBLE)
            .count();
    }

    log::info!("=== Inspection Complete ===");
    log::info!("Records printed: {}", printed);
    log::info!("UBX sync pairs (B5 62) seen: {}", ubx_frames);
    log::info!("RTCM3 preamble bytes (D3) seen: {}", rtcm_frames);

    Ok(())
}
