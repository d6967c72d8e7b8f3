//! Fixed-capacity dump window
//!
//! A [`DumpRecord`] collects raw link bytes until exactly `capacity` bytes
//! are buffered, then stamps the window, hands a [`GpsDump`] copy to the
//! sink and starts over from zero.
//!
//! The fill count is private and only moves through [`DumpRecord::accumulate`]
//! and the flush reset, so `fill < capacity` holds whenever the record is at
//! rest and `capacity - fill` can never wrap.

use crate::core::clock::Clock;
use crate::core::types::{Direction, GpsDump};
use crate::error::{Error, Result};
use crate::sink::DumpSink;

/// Default window size in bytes
pub const DEFAULT_CAPACITY: usize = 200;

/// In-flight accumulation window for one link direction
#[derive(Debug, Clone)]
pub struct DumpRecord {
    buffer: Box<[u8]>,
    fill: usize,
    instance: u8,
    timestamp_us: u64,
}

impl DumpRecord {
    /// Create an empty window of `capacity` bytes
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidParameter(
                "dump capacity must be at least 1 byte".to_string(),
            ));
        }
        Ok(Self {
            buffer: vec![0u8; capacity].into_boxed_slice(),
            fill: 0,
            instance: 0,
            timestamp_us: 0,
        })
    }

    /// Restore a partially filled window
    ///
    /// A window that is already full would have been flushed, so
    /// `pending.len() >= capacity` is rejected rather than flushed here.
    pub fn with_pending(capacity: usize, pending: &[u8]) -> Result<Self> {
        let mut record = Self::new(capacity)?;
        if pending.len() >= capacity {
            return Err(Error::InvalidParameter(format!(
                "pending window of {} bytes does not fit below capacity {}",
                pending.len(),
                capacity
            )));
        }
        record.buffer[..pending.len()].copy_from_slice(pending);
        record.fill = pending.len();
        Ok(record)
    }

    /// Window size in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes currently buffered
    #[inline]
    pub fn len(&self) -> usize {
        self.fill
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fill == 0
    }

    /// Free space before the next flush
    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.fill
    }

    /// Buffered bytes not yet published
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.buffer[..self.fill]
    }

    /// Instance id written by the last accumulate call
    #[inline]
    pub fn instance(&self) -> u8 {
        self.instance
    }

    /// Capture time of the last flush (0 before the first one)
    #[inline]
    pub fn timestamp_us(&self) -> u64 {
        self.timestamp_us
    }

    /// Append `data`, publishing every window that fills up
    ///
    /// Returns the number of records published, which is
    /// `(len_before + data.len()) / capacity`. Leftover bytes stay buffered
    /// for the next call.
    pub fn accumulate<C, S>(
        &mut self,
        data: &[u8],
        direction: Direction,
        instance: u8,
        clock: &C,
        sink: &mut S,
    ) -> usize
    where
        C: Clock + ?Sized,
        S: DumpSink + ?Sized,
    {
        self.instance = instance;

        let mut published = 0;
        let mut input = data;
        while !input.is_empty() {
            let write_len = input.len().min(self.remaining());
            let (chunk, rest) = input.split_at(write_len);
            self.buffer[self.fill..self.fill + write_len].copy_from_slice(chunk);
            self.fill += write_len;
            input = rest;

            if self.fill == self.capacity() {
                self.flush(direction, clock, sink);
                published += 1;
            }
        }
        published
    }

    fn flush<C, S>(&mut self, direction: Direction, clock: &C, sink: &mut S)
    where
        C: Clock + ?Sized,
        S: DumpSink + ?Sized,
    {
        self.timestamp_us = clock.now_us();
        log::debug!(
            "Dump flush: instance={} dir={:?} len={} t={}us",
            self.instance,
            direction,
            self.fill,
            self.timestamp_us
        );
        sink.publish(&GpsDump {
            timestamp_us: self.timestamp_us,
            instance: self.instance,
            to_device: direction.is_to_device(),
            data: self.buffer.to_vec(),
        });
        self.fill = 0;
    }
}
