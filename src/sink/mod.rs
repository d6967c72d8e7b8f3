//! Downstream consumers of completed dump records.
//!
//! A sink receives every full window exactly once, in input order. Delivery
//! is fire-and-forget: there is no acknowledgement or backpressure path back
//! into the dumper; a sink that cannot keep up drops and counts, or waits
//! when configured to.

pub mod channel;
pub mod player;
pub mod recorder;
pub mod wire;

use crate::core::types::GpsDump;

pub use channel::{ChannelSink, OverflowPolicy};
pub use player::DumpPlayer;
pub use recorder::{DumpFileInfo, DumpRecorder};
pub use wire::{Serializer, WireFormat};

/// Receiver of completed dump records
pub trait DumpSink {
    /// Publish one completed record
    fn publish(&mut self, dump: &GpsDump);
}

impl DumpSink for Vec<GpsDump> {
    fn publish(&mut self, dump: &GpsDump) {
        self.push(dump.clone());
    }
}

impl<S: DumpSink + ?Sized> DumpSink for &mut S {
    #[inline]
    fn publish(&mut self, dump: &GpsDump) {
        (**self).publish(dump);
    }
}

impl<S: DumpSink + ?Sized> DumpSink for Box<S> {
    #[inline]
    fn publish(&mut self, dump: &GpsDump) {
        (**self).publish(dump);
    }
}

/// Sink that only counts records; useful when nothing consumes the dump
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {
    pub published: u64,
}

impl DumpSink for NullSink {
    fn publish(&mut self, _dump: &GpsDump) {
        self.published += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(byte: u8) -> GpsDump {
        GpsDump {
            timestamp_us: byte as u64,
            instance: 0,
            to_device: false,
            data: vec![byte; 4],
        }
    }

    #[test]
    fn test_vec_sink_keeps_order() {
        let mut sink: Vec<GpsDump> = Vec::new();
        sink.publish(&dump(1));
        sink.publish(&dump(2));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].data, vec![1; 4]);
        assert_eq!(sink[1].data, vec![2; 4]);
    }

    #[test]
    fn test_borrowed_and_boxed_sinks() {
        fn feed<S: DumpSink>(mut sink: S) {
            sink.publish(&dump(1));
        }

        let mut inner = NullSink::default();
        feed(&mut inner);
        feed(&mut inner);
        assert_eq!(inner.published, 2);

        let mut boxed: Box<dyn DumpSink> = Box::new(Vec::<GpsDump>::new());
        boxed.publish(&dump(3));
    }
}
