//! Bounded channel sink
//!
//! Hands completed records to another thread over a crossbeam channel.
//! With [`OverflowPolicy::Drop`] the dumper never blocks: when the queue is
//! full the record is dropped and counted. [`OverflowPolicy::Block`] waits
//! for the consumer instead, for offline captures that must be complete.
//! A disconnected receiver always drops.

use super::DumpSink;
use crate::core::types::GpsDump;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use serde::{Deserialize, Serialize};

/// Log the first drop and then every Nth
const DROP_LOG_INTERVAL: u64 = 100;

/// What to do when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Drop the record and count it
    #[default]
    Drop,
    /// Wait for the consumer to make room
    Block,
}

/// Sink backed by a bounded channel
pub struct ChannelSink {
    tx: Sender<GpsDump>,
    policy: OverflowPolicy,
    sent: u64,
    dropped: u64,
}

impl ChannelSink {
    /// Create a dropping sink and the matching receiver with room for `depth` records
    pub fn bounded(depth: usize) -> (Self, Receiver<GpsDump>) {
        Self::with_policy(depth, OverflowPolicy::Drop)
    }

    /// Create a sink with an explicit overflow policy
    pub fn with_policy(depth: usize, policy: OverflowPolicy) -> (Self, Receiver<GpsDump>) {
        let (tx, rx) = bounded(depth);
        (Self::new(tx, policy), rx)
    }

    /// Wrap an existing sender
    pub fn new(tx: Sender<GpsDump>, policy: OverflowPolicy) -> Self {
        Self {
            tx,
            policy,
            sent: 0,
            dropped: 0,
        }
    }

    pub fn policy(&self) -> OverflowPolicy {
        self.policy
    }

    /// Records accepted by the channel
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Records dropped because the queue was full or closed
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn record_drop(&mut self, reason: &str) {
        self.dropped += 1;
        if self.dropped == 1 || self.dropped % DROP_LOG_INTERVAL == 0 {
            log::warn!(
                "Dump record dropped ({}), {} dropped so far",
                reason,
                self.dropped
            );
        }
    }
}

impl DumpSink for ChannelSink {
    fn publish(&mut self, dump: &GpsDump) {
        let result = match self.policy {
            OverflowPolicy::Drop => self.tx.try_send(dump.clone()),
            OverflowPolicy::Block => self
                .tx
                .send(dump.clone())
                .map_err(|e| TrySendError::Disconnected(e.into_inner())),
        };
        match result {
            Ok(()) => self.sent += 1,
            Err(TrySendError::Full(_)) => self.record_drop("queue full"),
            Err(TrySendError::Disconnected(_)) => self.record_drop("receiver gone"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(byte: u8) -> GpsDump {
        GpsDump {
            timestamp_us: 0,
            instance: 0,
            to_device: false,
            data: vec![byte; 2],
        }
    }

    #[test]
    fn test_records_arrive_in_order() {
        let (mut sink, rx) = ChannelSink::bounded(4);
        sink.publish(&dump(1));
        sink.publish(&dump(2));

        assert_eq!(rx.try_recv().unwrap().data, vec![1, 1]);
        assert_eq!(rx.try_recv().unwrap().data, vec![2, 2]);
        assert_eq!(sink.sent(), 2);
    }

    #[test]
    fn test_full_queue_drops_without_blocking() {
        let (mut sink, rx) = ChannelSink::bounded(1);
        sink.publish(&dump(1));
        sink.publish(&dump(2));

        assert_eq!(sink.sent(), 1);
        assert_eq!(sink.dropped(), 1);
        assert_eq!(rx.len(), 1);
    }

    #[test]
    fn test_blocking_policy_waits_for_consumer() {
        let (mut sink, rx) = ChannelSink::with_policy(1, OverflowPolicy::Block);
        let consumer = std::thread::spawn(move || rx.iter().count());

        for i in 0..50 {
            sink.publish(&dump(i));
        }
        assert_eq!(sink.sent(), 50);
        assert_eq!(sink.dropped(), 0);

        drop(sink);
        assert_eq!(consumer.join().unwrap(), 50);
    }

    #[test]
    fn test_disconnected_receiver_drops() {
        let (mut sink, rx) = ChannelSink::with_policy(4, OverflowPolicy::Block);
        drop(rx);
        sink.publish(&dump(1));
        assert_eq!(sink.dropped(), 1);
        assert_eq!(sink.policy(), OverflowPolicy::Block);
    }
}
