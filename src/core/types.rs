//! Core data types for the communication dump.
//!
//! - [`DumpMode`]: which traffic class is currently being dumped
//! - [`Direction`]: which side of the receiver link produced the bytes
//! - [`GpsDump`]: one completed, timestamped dump record handed to a sink

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Communication dump mode
///
/// Discriminants match the raw `GPS_DUMP_COMM` parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DumpMode {
    /// Dumping off, no records allocated
    #[default]
    Disabled = 0,
    /// All receiver traffic in both directions
    Full = 1,
    /// RTCM correction stream injected into the receiver only
    Rtcm = 2,
}

impl DumpMode {
    /// True unless the mode is [`DumpMode::Disabled`]
    #[inline]
    pub fn is_enabled(self) -> bool {
        self != DumpMode::Disabled
    }
}

impl TryFrom<i32> for DumpMode {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self> {
        match raw {
            0 => Ok(DumpMode::Disabled),
            1 => Ok(DumpMode::Full),
            2 => Ok(DumpMode::Rtcm),
            other => Err(Error::InvalidParameter(format!(
                "unknown dump mode {}",
                other
            ))),
        }
    }
}

impl fmt::Display for DumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DumpMode::Disabled => "disabled",
            DumpMode::Full => "full",
            DumpMode::Rtcm => "rtcm",
        };
        f.write_str(name)
    }
}

/// Link direction of dumped bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Bytes read from the receiver
    #[default]
    FromDevice,
    /// Bytes written to the receiver (configuration, RTCM injection)
    ToDevice,
}

impl Direction {
    #[inline]
    pub fn is_to_device(self) -> bool {
        self == Direction::ToDevice
    }
}

impl From<bool> for Direction {
    fn from(to_device: bool) -> Self {
        if to_device {
            Direction::ToDevice
        } else {
            Direction::FromDevice
        }
    }
}

/// Completed dump record as seen by downstream sinks
///
/// `data` always holds exactly one full window of the producing record's
/// capacity. The direction flag is a separate field and never shares
/// storage with the length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpsDump {
    /// Capture time in microseconds (taken at flush)
    pub timestamp_us: u64,
    /// Receiver instance that produced the bytes
    pub instance: u8,
    /// Bytes were sent to the receiver rather than read from it
    pub to_device: bool,
    /// Raw link bytes, in arrival order
    pub data: Vec<u8>,
}

impl GpsDump {
    /// Number of payload bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Direction the payload travelled
    #[inline]
    pub fn direction(&self) -> Direction {
        Direction::from(self.to_device)
    }
}
