//! Core abstractions shared by the dumper and its sinks.
//!
//! - [`types`]: dump modes, link direction, the emitted [`types::GpsDump`]
//! - [`clock::Clock`]: timestamp source injected into the dumper

pub mod clock;
pub mod types;

pub use clock::{Clock, MonotonicClock, SystemClock};
pub use types::{Direction, DumpMode, GpsDump};
