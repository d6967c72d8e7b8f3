//! Communication dump accumulation.
//!
//! - [`record::DumpRecord`]: one fixed-capacity window and its flush loop
//! - [`dumper::GpsDumper`]: mode filter and per-direction windows for one receiver

pub mod dumper;
pub mod record;

#[cfg(kani)]
mod proofs;

pub use dumper::{DumpStats, GpsDumper};
pub use record::{DEFAULT_CAPACITY, DumpRecord};
