//! Kani harnesses for the dump window.
//!
//! Run with: `cargo kani`
//!
//! Window and input sizes are kept small so the flush loop unrolls within
//! the unwind bound; the arithmetic does not depend on the absolute sizes.

use super::dumper::GpsDumper;
use super::record::DumpRecord;
use crate::config::DumpConfig;
use crate::core::types::{Direction, DumpMode, GpsDump};
use crate::sink::DumpSink;

const CAPACITY: usize = 8;
const MAX_INPUT: usize = 20;

struct CountingSink {
    published: usize,
    all_full: bool,
}

impl DumpSink for CountingSink {
    fn publish(&mut self, dump: &GpsDump) {
        self.published += 1;
        self.all_full &= dump.data.len() == CAPACITY;
    }
}

fn now() -> u64 {
    12345
}

fn any_input() -> ([u8; MAX_INPUT], usize) {
    let len: usize = kani::any();
    kani::assume(len <= MAX_INPUT);
    (kani::any(), len)
}

/// Any resumable window plus any input stays in bounds and ends below capacity.
#[kani::proof]
#[kani::unwind(22)]
fn prove_fill_stays_below_capacity() {
    let fill: usize = kani::any();
    kani::assume(fill < CAPACITY);
    let pending = [0u8; CAPACITY];
    let mut record = DumpRecord::with_pending(CAPACITY, &pending[..fill]).unwrap();

    let (input, len) = any_input();
    let mut sink = CountingSink {
        published: 0,
        all_full: true,
    };
    let direction = Direction::from(kani::any::<bool>());
    let published = record.accumulate(&input[..len], direction, 0, &now, &mut sink);

    assert!(record.len() < CAPACITY);
    assert_eq!(published, (fill + len) / CAPACITY);
    assert_eq!(record.len(), (fill + len) % CAPACITY);
    assert_eq!(sink.published, published);
    assert!(sink.all_full);
}

/// A full window can never be restored from outside.
#[kani::proof]
fn prove_full_window_rejected() {
    let fill: usize = kani::any();
    kani::assume(fill >= CAPACITY && fill <= CAPACITY + 2);
    let pending = [0u8; CAPACITY + 2];
    assert!(DumpRecord::with_pending(CAPACITY, &pending[..fill]).is_err());
}

/// Mismatched modes never touch either window.
#[kani::proof]
#[kani::unwind(22)]
fn prove_mode_filter_is_noop() {
    let active = match kani::any::<u8>() % 3 {
        0 => DumpMode::Disabled,
        1 => DumpMode::Full,
        _ => DumpMode::Rtcm,
    };
    let requested = match kani::any::<u8>() % 3 {
        0 => DumpMode::Disabled,
        1 => DumpMode::Full,
        _ => DumpMode::Rtcm,
    };
    kani::assume(active != requested);

    let config = DumpConfig {
        mode: active,
        instance: 1,
        capacity: CAPACITY,
    };
    let sink = CountingSink {
        published: 0,
        all_full: true,
    };
    let mut dumper = GpsDumper::new(&config, now as fn() -> u64, sink).unwrap();

    let (input, len) = any_input();
    let direction = Direction::from(kani::any::<bool>());
    assert_eq!(dumper.dump(&input[..len], requested, direction), 0);

    assert_eq!(dumper.sink().published, 0);
    if let Some(pending) = dumper.pending(direction) {
        assert!(pending.is_empty());
    }
}
