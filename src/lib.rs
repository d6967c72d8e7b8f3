//! gps-dump - GPS receiver communication dump
//!
//! Buffers the raw byte stream exchanged with a GPS receiver into
//! fixed-size, timestamped records and hands each completed record to a
//! downstream sink (channel, file, or anything implementing
//! [`sink::DumpSink`]).
//!
//! ```
//! use gps_dump::{DumpConfig, DumpMode, GpsDump, GpsDumper};
//!
//! let config = DumpConfig { mode: DumpMode::Full, instance: 0, capacity: 4 };
//! let mut dumper = GpsDumper::new(&config, || 0u64, Vec::<GpsDump>::new())?;
//!
//! assert_eq!(dumper.dump_received(&[1, 2, 3, 4, 5]), 1);
//! assert_eq!(dumper.sink()[0].data, vec![1, 2, 3, 4]);
//! # Ok::<(), gps_dump::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod dump;
pub mod error;
pub mod sink;

// Re-export commonly used types
pub use config::{Config, DumpConfig};
pub use crate::core::types::{Direction, DumpMode, GpsDump};
pub use dump::{DumpRecord, DumpStats, GpsDumper};
pub use error::{Error, Result};
