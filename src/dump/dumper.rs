//! Per-instance communication dumper
//!
//! Owns the two dump windows of one receiver instance (bytes read from the
//! device, bytes written to it) and the mode filter deciding whether a
//! chunk of traffic is dumped at all.
//!
//! # Mode filter
//!
//! | Active mode | `dump(.., Full, ..)` | `dump(.., Rtcm, ..)` |
//! |-------------|----------------------|----------------------|
//! | Disabled    | ignored              | ignored              |
//! | Full        | accumulated          | ignored              |
//! | Rtcm        | ignored              | accumulated          |
//!
//! A filtered call is not an error and leaves both windows untouched.
//! When the active mode is `Disabled` no windows are allocated at all.

use super::record::DumpRecord;
use crate::config::DumpConfig;
use crate::core::clock::Clock;
use crate::core::types::{Direction, DumpMode};
use crate::error::Result;
use crate::sink::DumpSink;

/// Running counters for one dumper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpStats {
    /// Bytes copied into a window
    pub bytes_accepted: u64,
    /// Bytes dropped by the mode filter
    pub bytes_filtered: u64,
    /// Full windows handed to the sink
    pub records_published: u64,
    /// Calls rejected by the mode filter
    pub filtered_calls: u64,
}

/// Communication dumper for one receiver instance
pub struct GpsDumper<C, S> {
    active_mode: DumpMode,
    instance: u8,
    from_device: Option<DumpRecord>,
    to_device: Option<DumpRecord>,
    clock: C,
    sink: S,
    stats: DumpStats,
}

impl<C: Clock, S: DumpSink> GpsDumper<C, S> {
    /// Create a dumper from configuration
    ///
    /// Windows are only allocated when the configured mode is enabled.
    pub fn new(config: &DumpConfig, clock: C, sink: S) -> Result<Self> {
        let (from_device, to_device) = if config.mode.is_enabled() {
            (
                Some(DumpRecord::new(config.capacity)?),
                Some(DumpRecord::new(config.capacity)?),
            )
        } else {
            (None, None)
        };

        log::info!(
            "GPS dump instance {}: mode={} capacity={}",
            config.instance,
            config.mode,
            config.capacity
        );

        Ok(Self {
            active_mode: config.mode,
            instance: config.instance,
            from_device,
            to_device,
            clock,
            sink,
            stats: DumpStats::default(),
        })
    }

    /// Dump a chunk of link traffic
    ///
    /// No-op unless `mode` matches the active mode. Returns the number of
    /// records published by this call.
    pub fn dump(&mut self, data: &[u8], mode: DumpMode, direction: Direction) -> usize {
        let record = match direction {
            Direction::FromDevice => self.from_device.as_mut(),
            Direction::ToDevice => self.to_device.as_mut(),
        };

        let record = match record {
            Some(record) if mode == self.active_mode => record,
            _ => {
                self.stats.filtered_calls += 1;
                self.stats.bytes_filtered += data.len() as u64;
                return 0;
            }
        };

        let published =
            record.accumulate(data, direction, self.instance, &self.clock, &mut self.sink);
        self.stats.bytes_accepted += data.len() as u64;
        self.stats.records_published += published as u64;
        published
    }

    /// Dump bytes received from the device
    #[inline]
    pub fn dump_received(&mut self, data: &[u8]) -> usize {
        self.dump(data, DumpMode::Full, Direction::FromDevice)
    }

    /// Dump bytes written to the device
    #[inline]
    pub fn dump_sent(&mut self, data: &[u8]) -> usize {
        self.dump(data, DumpMode::Full, Direction::ToDevice)
    }

    /// Dump an RTCM correction message injected into the device
    #[inline]
    pub fn dump_rtcm_injection(&mut self, data: &[u8]) -> usize {
        self.dump(data, DumpMode::Rtcm, Direction::ToDevice)
    }
}

impl<C, S> GpsDumper<C, S> {
    pub fn active_mode(&self) -> DumpMode {
        self.active_mode
    }

    pub fn instance(&self) -> u8 {
        self.instance
    }

    pub fn stats(&self) -> DumpStats {
        self.stats
    }

    /// Window for `direction`, absent when dumping is disabled
    pub fn record(&self, direction: Direction) -> Option<&DumpRecord> {
        match direction {
            Direction::FromDevice => self.from_device.as_ref(),
            Direction::ToDevice => self.to_device.as_ref(),
        }
    }

    /// Bytes buffered but not yet published for `direction`
    pub fn pending(&self, direction: Direction) -> Option<&[u8]> {
        self.record(direction).map(DumpRecord::pending)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Drop the windows and hand back the sink
    ///
    /// Pending partial windows are discarded.
    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GpsDump;

    fn config(mode: DumpMode, capacity: usize) -> DumpConfig {
        DumpConfig {
            mode,
            instance: 1,
            capacity,
        }
    }

    fn dumper(mode: DumpMode, capacity: usize) -> GpsDumper<fn() -> u64, Vec<GpsDump>> {
        fn now() -> u64 {
            42
        }
        GpsDumper::new(&config(mode, capacity), now as fn() -> u64, Vec::new()).unwrap()
    }

    #[test]
    fn test_disabled_allocates_nothing() {
        let mut d = dumper(DumpMode::Disabled, 16);
        assert!(d.record(Direction::FromDevice).is_none());
        assert!(d.record(Direction::ToDevice).is_none());

        assert_eq!(d.dump(&[0; 32], DumpMode::Disabled, Direction::FromDevice), 0);
        assert!(d.sink().is_empty());
        assert_eq!(d.stats().filtered_calls, 1);
    }

    #[test]
    fn test_mode_mismatch_leaves_state_untouched() {
        let mut d = dumper(DumpMode::Full, 8);
        d.dump_received(&[1, 2, 3]);
        let before = d.record(Direction::FromDevice).unwrap().clone();

        assert_eq!(d.dump_rtcm_injection(&[9; 20]), 0);
        assert_eq!(d.dump(&[9; 20], DumpMode::Rtcm, Direction::FromDevice), 0);

        let after = d.record(Direction::FromDevice).unwrap();
        assert_eq!(after.pending(), before.pending());
        assert_eq!(after.instance(), before.instance());
        assert_eq!(after.timestamp_us(), before.timestamp_us());
        assert!(d.pending(Direction::ToDevice).unwrap().is_empty());
        assert!(d.sink().is_empty());
        assert_eq!(d.stats().filtered_calls, 2);
        assert_eq!(d.stats().bytes_filtered, 40);
    }

    #[test]
    fn test_directions_use_separate_windows() {
        let mut d = dumper(DumpMode::Full, 4);
        d.dump_received(&[1, 2]);
        d.dump_sent(&[10, 20, 30]);
        d.dump_received(&[3, 4]);

        assert_eq!(d.sink().len(), 1);
        assert_eq!(d.sink()[0].data, vec![1, 2, 3, 4]);
        assert!(!d.sink()[0].to_device);
        assert_eq!(d.pending(Direction::ToDevice).unwrap(), &[10, 20, 30]);

        d.dump_sent(&[40]);
        assert_eq!(d.sink().len(), 2);
        assert!(d.sink()[1].to_device);
        assert_eq!(d.sink()[1].instance, 1);
        assert_eq!(d.sink()[1].timestamp_us, 42);
    }

    #[test]
    fn test_rtcm_mode_only_dumps_injection() {
        let mut d = dumper(DumpMode::Rtcm, 4);
        assert_eq!(d.dump_received(&[0; 8]), 0);
        assert_eq!(d.dump_sent(&[0; 8]), 0);
        assert_eq!(d.dump_rtcm_injection(&[0xD3; 8]), 2);

        assert_eq!(d.sink().len(), 2);
        assert!(d.sink().iter().all(|r| r.to_device));
        assert_eq!(d.stats().records_published, 2);
        assert_eq!(d.stats().bytes_accepted, 8);
    }

    #[test]
    fn test_stats_and_into_sink() {
        let mut d = dumper(DumpMode::Full, 200);
        d.dump_received(&[0; 450]);
        let stats = d.stats();
        assert_eq!(stats.records_published, 2);
        assert_eq!(stats.bytes_accepted, 450);
        assert_eq!(d.pending(Direction::FromDevice).unwrap().len(), 50);

        let sink = d.into_sink();
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_zero_capacity_rejected_when_enabled() {
        let result = GpsDumper::new(&config(DumpMode::Full, 0), || 0u64, Vec::<GpsDump>::new());
        assert!(result.is_err());
    }
}
