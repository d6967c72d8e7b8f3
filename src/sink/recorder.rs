//! Dump file recorder
//!
//! File layout:
//!
//! ```text
//! ┌──────────────────────┬─────────────────────────────────────┐
//! │ Header (48 bytes)    │ Records: [len u32 LE][payload] ...  │
//! └──────────────────────┴─────────────────────────────────────┘
//! ```
//!
//! The header is reserved as zeros on create and written on [`DumpRecorder::finish`].

use super::DumpSink;
use super::wire::{Serializer, WireFormat};
use crate::core::types::GpsDump;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Magic bytes at start of a dump file
pub const DUMP_MAGIC: [u8; 4] = *b"GDMP";

/// Current dump file format version
pub const DUMP_VERSION: u16 = 1;

/// Size of the dump file header in bytes
pub const HEADER_SIZE: usize = 48;

/// Largest record payload accepted on read
pub const MAX_RECORD_SIZE: usize = 1 << 20;

/// Dump file header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpHeader {
    pub magic: [u8; 4],
    pub version: u16,
    /// [`WireFormat`] tag of the records
    pub format: u8,
    pub record_count: u64,
    /// Timestamp of first record (microseconds)
    pub start_time_us: u64,
    /// Timestamp of last record (microseconds)
    pub end_time_us: u64,
}

impl DumpHeader {
    pub fn new(format: WireFormat) -> Self {
        Self {
            magic: DUMP_MAGIC,
            version: DUMP_VERSION,
            format: format.to_tag(),
            record_count: 0,
            start_time_us: 0,
            end_time_us: 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.magic == DUMP_MAGIC
    }

    pub fn duration_us(&self) -> u64 {
        self.end_time_us.saturating_sub(self.start_time_us)
    }

    /// Encode into the fixed-size header block
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let encoded = postcard::to_allocvec(self)?;
        if encoded.len() > HEADER_SIZE {
            return Err(Error::Serialization(format!(
                "header encodes to {} bytes, limit {}",
                encoded.len(),
                HEADER_SIZE
            )));
        }
        let mut block = [0u8; HEADER_SIZE];
        block[..encoded.len()].copy_from_slice(&encoded);
        Ok(block)
    }
}

/// Summary returned by [`DumpRecorder::finish`]
#[derive(Debug, Clone)]
pub struct DumpFileInfo {
    pub path: PathBuf,
    pub record_count: u64,
    pub to_device_count: u64,
    pub failed_writes: u64,
    pub duration_us: u64,
    pub file_size_bytes: u64,
}

/// Writes dump records to a file
///
/// As a [`DumpSink`] it never fails the caller: write errors are logged and
/// counted, and surface again as `failed_writes` in [`DumpFileInfo`].
pub struct DumpRecorder {
    writer: BufWriter<File>,
    path: PathBuf,
    serializer: Serializer,
    record_count: u64,
    to_device_count: u64,
    failed_writes: u64,
    start_time_us: Option<u64>,
    end_time_us: u64,
}

impl DumpRecorder {
    /// Create a dump file, reserving the header block
    pub fn create(path: impl AsRef<Path>, format: WireFormat) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&[0u8; HEADER_SIZE])?;

        log::info!("Recording GPS dump to {} ({:?})", path.display(), format);

        Ok(Self {
            writer,
            path,
            serializer: Serializer::new(format),
            record_count: 0,
            to_device_count: 0,
            failed_writes: 0,
            start_time_us: None,
            end_time_us: 0,
        })
    }

    /// Append one record
    pub fn record(&mut self, dump: &GpsDump) -> Result<()> {
        let frame = self.frame(dump)?;
        self.writer.write_all(&frame)?;

        if self.start_time_us.is_none() {
            self.start_time_us = Some(dump.timestamp_us);
        }
        self.end_time_us = dump.timestamp_us;
        self.record_count += 1;
        if dump.to_device {
            self.to_device_count += 1;
        }
        Ok(())
    }

    /// Length prefix and payload in one buffer
    fn frame(&self, dump: &GpsDump) -> Result<Vec<u8>> {
        let payload = self.serializer.serialize(dump)?;
        if payload.len() > MAX_RECORD_SIZE {
            return Err(Error::InvalidParameter(format!(
                "record of {} bytes exceeds {} byte limit",
                payload.len(),
                MAX_RECORD_SIZE
            )));
        }

        let mut frame = Vec::with_capacity(4 + payload.len());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);
        Ok(frame)
    }

    /// Write the final header and close the file
    pub fn finish(mut self) -> Result<DumpFileInfo> {
        self.writer.flush()?;
        let file_size = self.writer.stream_position()?;

        let header = DumpHeader {
            record_count: self.record_count,
            start_time_us: self.start_time_us.unwrap_or(0),
            end_time_us: self.end_time_us,
            ..DumpHeader::new(self.serializer.format())
        };

        self.writer.seek(SeekFrom::Start(0))?;
        self.writer.write_all(&header.to_bytes()?)?;
        self.writer.flush()?;

        Ok(DumpFileInfo {
            path: self.path,
            record_count: self.record_count,
            to_device_count: self.to_device_count,
            failed_writes: self.failed_writes,
            duration_us: header.duration_us(),
            file_size_bytes: file_size,
        })
    }
}

impl DumpSink for DumpRecorder {
    fn publish(&mut self, dump: &GpsDump) {
        if let Err(e) = self.record(dump) {
            self.failed_writes += 1;
            log::error!("Failed to record GPS dump: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::DumpPlayer;
    use std::fs;
    use tempfile::TempDir;

    fn dump(ts: u64, to_device: bool) -> GpsDump {
        GpsDump {
            timestamp_us: ts,
            instance: 0,
            to_device,
            data: vec![0x24; 16],
        }
    }

    #[test]
    fn test_header_fits_block() {
        let header = DumpHeader {
            record_count: u64::MAX,
            start_time_us: u64::MAX,
            end_time_us: u64::MAX,
            ..DumpHeader::new(WireFormat::Json)
        };
        assert!(header.to_bytes().is_ok());
    }

    #[test]
    fn test_create_and_finish_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.bin");

        let info = DumpRecorder::create(&path, WireFormat::Postcard)
            .unwrap()
            .finish()
            .unwrap();

        assert_eq!(info.record_count, 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), HEADER_SIZE as u64);
    }

    #[test]
    fn test_recorder_counts_and_time_range() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dump.bin");

        let mut recorder = DumpRecorder::create(&path, WireFormat::Postcard).unwrap();
        for i in 0..10 {
            recorder.publish(&dump(1000 + i * 500, i % 2 == 0));
        }
        let info = recorder.finish().unwrap();

        assert_eq!(info.record_count, 10);
        assert_eq!(info.to_device_count, 5);
        assert_eq!(info.failed_writes, 0);
        assert_eq!(info.duration_us, 9 * 500);
        assert!(info.file_size_bytes > HEADER_SIZE as u64);
    }

    #[test]
    fn test_records_are_contiguous_frames() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("frames.bin");

        let mut recorder = DumpRecorder::create(&path, WireFormat::Postcard).unwrap();
        let first = dump(10, false);
        let second = dump(20, true);
        recorder.record(&first).unwrap();
        recorder.record(&second).unwrap();
        recorder.finish().unwrap();

        let serializer = Serializer::new(WireFormat::Postcard);
        let bytes = fs::read(&path).unwrap();
        let mut offset = HEADER_SIZE;
        for expected in [&first, &second] {
            let payload = serializer.serialize(expected).unwrap();
            let len = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap());
            assert_eq!(len as usize, payload.len());
            assert_eq!(&bytes[offset + 4..offset + 4 + payload.len()], &payload[..]);
            offset += 4 + payload.len();
        }
        assert_eq!(offset, bytes.len());
    }

    #[test]
    fn test_oversized_record_leaves_file_readable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("oversized.bin");

        let mut recorder = DumpRecorder::create(&path, WireFormat::Postcard).unwrap();
        recorder.publish(&dump(1, false));
        recorder.publish(&GpsDump {
            data: vec![0; MAX_RECORD_SIZE + 1],
            ..dump(2, false)
        });
        recorder.publish(&dump(3, true));
        let info = recorder.finish().unwrap();

        assert_eq!(info.record_count, 2);
        assert_eq!(info.failed_writes, 1);

        let dumps = DumpPlayer::open(&path).unwrap().read_all().unwrap();
        let stamps: Vec<u64> = dumps.iter().map(|d| d.timestamp_us).collect();
        assert_eq!(stamps, vec![1, 3]);
    }
}
