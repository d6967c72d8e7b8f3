//! Dump file reader

use super::recorder::{DumpHeader, HEADER_SIZE, MAX_RECORD_SIZE};
use super::wire::{Serializer, WireFormat};
use crate::core::types::GpsDump;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Reads records back from a file written by [`super::DumpRecorder`]
///
/// # Example
///
/// ```no_run
/// use gps_dump::sink::DumpPlayer;
///
/// let mut player = DumpPlayer::open("gps_dump.bin")?;
/// while let Some(dump) = player.next_dump()? {
///     println!("{} bytes at {} us", dump.len(), dump.timestamp_us);
/// }
/// # Ok::<(), gps_dump::Error>(())
/// ```
pub struct DumpPlayer {
    reader: BufReader<File>,
    header: DumpHeader,
    serializer: Serializer,
    records_read: u64,
}

impl DumpPlayer {
    /// Open a dump file and validate its header
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let mut header_buffer = [0u8; HEADER_SIZE];
        reader.read_exact(&mut header_buffer)?;

        let header: DumpHeader = postcard::from_bytes(&header_buffer)
            .map_err(|e| Error::InvalidFormat(format!("Failed to parse header: {}", e)))?;

        if !header.is_valid() {
            return Err(Error::InvalidFormat(
                "Invalid dump file magic bytes".to_string(),
            ));
        }

        let format = WireFormat::from_tag(header.format)?;

        Ok(Self {
            reader,
            header,
            serializer: Serializer::new(format),
            records_read: 0,
        })
    }

    pub fn header(&self) -> &DumpHeader {
        &self.header
    }

    pub fn format(&self) -> WireFormat {
        self.serializer.format()
    }

    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Read the next record, `None` at end of file
    pub fn next_dump(&mut self) -> Result<Option<GpsDump>> {
        let mut len_bytes = [0u8; 4];
        match self.reader.read_exact(&mut len_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_le_bytes(len_bytes) as usize;
        if len > MAX_RECORD_SIZE {
            return Err(Error::InvalidFormat(format!(
                "Record too large: {} bytes",
                len
            )));
        }

        let mut payload = vec![0u8; len];
        self.reader.read_exact(&mut payload)?;
        let dump = self.serializer.deserialize(&payload)?;

        self.records_read += 1;
        Ok(Some(dump))
    }

    /// Read every remaining record
    pub fn read_all(&mut self) -> Result<Vec<GpsDump>> {
        let mut dumps = Vec::new();
        while let Some(dump) = self.next_dump()? {
            dumps.push(dump);
        }
        Ok(dumps)
    }
}
