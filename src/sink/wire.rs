//! Record encoding for dump files
//!
//! Each record in a dump file is framed as:
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┐
//! │ Length (4 bytes) │ Payload (variable)       │
//! │ Little-endian u32│ Postcard or JSON GpsDump │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! Postcard is the default: a 200 byte window encodes to roughly 210 bytes.
//! JSON is available for captures that are read by scripts.

use crate::core::types::GpsDump;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Supported record encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireFormat {
    /// Binary format using postcard - fast and compact
    #[default]
    Postcard,
    /// JSON format - human-readable for debugging
    Json,
}

impl WireFormat {
    /// Tag stored in the dump file header
    pub fn to_tag(self) -> u8 {
        match self {
            WireFormat::Postcard => 0,
            WireFormat::Json => 1,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self> {
        match tag {
            0 => Ok(WireFormat::Postcard),
            1 => Ok(WireFormat::Json),
            other => Err(Error::InvalidFormat(format!(
                "unknown wire format tag {}",
                other
            ))),
        }
    }
}

/// Serializer for one wire format
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    format: WireFormat,
}

impl Serializer {
    pub fn new(format: WireFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    /// Serialize a record to bytes
    pub fn serialize(&self, dump: &GpsDump) -> Result<Vec<u8>> {
        match self.format {
            WireFormat::Postcard => Ok(postcard::to_allocvec(dump)?),
            WireFormat::Json => Ok(serde_json::to_vec(dump)?),
        }
    }

    /// Deserialize bytes to a record
    pub fn deserialize(&self, bytes: &[u8]) -> Result<GpsDump> {
        match self.format {
            WireFormat::Postcard => Ok(postcard::from_bytes(bytes)?),
            WireFormat::Json => Ok(serde_json::from_slice(bytes)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GpsDump {
        GpsDump {
            timestamp_us: 1_700_000_000_000_000,
            instance: 1,
            to_device: true,
            data: vec![0xB5, 0x62, 0x01, 0x07],
        }
    }

    #[test]
    fn test_postcard_is_compact() {
        let bytes = Serializer::new(WireFormat::Postcard)
            .serialize(&sample())
            .unwrap();
        // varint timestamp + instance + flag + len prefix + 4 data bytes
        assert!(bytes.len() < 20);
    }

    #[test]
    fn test_json_is_readable() {
        let bytes = Serializer::new(WireFormat::Json)
            .serialize(&sample())
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("\"to_device\":true"));
        assert!(text.contains("\"instance\":1"));
    }

    #[test]
    fn test_garbage_rejected() {
        let serializer = Serializer::new(WireFormat::Json);
        assert!(matches!(
            serializer.deserialize(b"not json"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(WireFormat::from_tag(WireFormat::Json.to_tag()).unwrap(), WireFormat::Json);
        assert!(WireFormat::from_tag(7).is_err());
    }
}
