//! Lock-free diagnostic trace of dispatch and response activity.
//!
//! The dispatch path must never block, so diagnostics are recorded into a
//! fixed ring of small copyable records and drained later from task
//! context (the `info` command). If the drainer falls behind, the producer
//! keeps writing and the oldest unread records are lost; the drain side
//! detects the overrun, skips forward and counts the loss. Each slot
//! carries a generation word so a record overwritten while the drainer is
//! copying it is detected and skipped instead of returned torn.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::context::CallingContext;

/// Default trace capacity. Must be a power of 2.
pub const DEFAULT_TRACE_SIZE: usize = 64;

/// What happened to a request or response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceKind {
    /// Request forwarded to the framework sink.
    Dispatched,
    /// Request dropped because no sink was wired yet.
    DroppedUnwired,
    /// Response part rendered to the console.
    ResponseRendered,
    /// Response part carried an identifier this build does not render.
    ResponseIgnored,
    /// Response part rejected as malformed (no payload reference).
    ResponseMalformed,
}

impl TraceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dispatched => "dispatched",
            Self::DroppedUnwired => "dropped-unwired",
            Self::ResponseRendered => "rendered",
            Self::ResponseIgnored => "ignored",
            Self::ResponseMalformed => "malformed",
        }
    }
}

/// One trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    pub kind: TraceKind,
    /// Raw event identifier involved.
    pub event_id: u32,
    /// Dispatch sequence number, 0 when unknown (response side).
    pub seq: u32,
    pub context: CallingContext,
}

impl TraceRecord {
    const EMPTY: Self = Self {
        kind: TraceKind::Dispatched,
        event_id: 0,
        seq: 0,
        context: CallingContext::Task,
    };
}

/// Fixed-size trace ring.
///
/// Producers are the dispatch gate (task or ISR) and the response router
/// (framework task context); each write claims a unique slot via atomic
/// `fetch_add` and brackets the copy with the slot's generation word
/// (odd while the write is in flight). There is one drainer.
pub struct DispatchTrace<const N: usize = DEFAULT_TRACE_SIZE> {
    slots: UnsafeCell<[TraceRecord; N]>,
    gens: [AtomicU32; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    lost: AtomicU32,
}

// SAFETY: producers claim unique slots through fetch_add; the single
// drainer validates the slot generation around its copy and skips any
// slot a producer rewrote underneath it.
unsafe impl<const N: usize> Sync for DispatchTrace<N> {}
unsafe impl<const N: usize> Send for DispatchTrace<N> {}

impl<const N: usize> DispatchTrace<N> {
    const MASK: usize = N - 1;
    const GEN_ZERO: AtomicU32 = AtomicU32::new(0);

    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "trace size must be power of 2");
        Self {
            slots: UnsafeCell::new([TraceRecord::EMPTY; N]),
            gens: [Self::GEN_ZERO; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            lost: AtomicU32::new(0),
        }
    }

    /// Record one event. O(1), never blocks, never allocates.
    #[inline]
    pub fn record(&self, record: TraceRecord) {
        let idx = self.write_idx.fetch_add(1, Ordering::AcqRel) as usize & Self::MASK;
        // Odd generation marks the write window.
        self.gens[idx].fetch_add(1, Ordering::AcqRel);
        // SAFETY: fetch_add hands each producer a unique ring index;
        // the generation word exposes the copy to the drainer.
        unsafe {
            (*self.slots.get())[idx] = record;
        }
        self.gens[idx].fetch_add(1, Ordering::Release);
    }

    /// Drain the next record, skipping forward if the ring was lapped.
    pub fn drain(&self) -> Option<TraceRecord> {
        loop {
            let write = self.write_idx.load(Ordering::Acquire);
            let mut read = self.read_idx.load(Ordering::Relaxed);

            if read == write {
                return None;
            }

            let behind = write.wrapping_sub(read);
            if behind > N as u32 {
                // Lapped: oldest unread records were overwritten.
                let skipped = behind - N as u32;
                self.lost.fetch_add(skipped, Ordering::Relaxed);
                read = write.wrapping_sub(N as u32);
            }

            let idx = (read as usize) & Self::MASK;
            let g1 = self.gens[idx].load(Ordering::Acquire);
            // SAFETY: the generation check below rejects a copy that a
            // producer rewrote while it was in progress.
            let record = unsafe { (*self.slots.get())[idx] };
            if g1 & 1 == 0 && self.gens[idx].load(Ordering::Acquire) == g1 {
                self.read_idx.store(read.wrapping_add(1), Ordering::Release);
                return Some(record);
            }

            // A producer lapped onto this slot mid-copy; count it lost
            // and move on to the next.
            self.lost.fetch_add(1, Ordering::Relaxed);
            self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        }
    }

    /// Records waiting to be drained (capped at capacity).
    pub fn pending(&self) -> u32 {
        let write = self.write_idx.load(Ordering::Acquire);
        let read = self.read_idx.load(Ordering::Relaxed);
        write.wrapping_sub(read).min(N as u32)
    }

    /// Records lost to ring overrun so far.
    #[inline]
    pub fn lost(&self) -> u32 {
        self.lost.load(Ordering::Relaxed)
    }

    /// Total records ever written.
    #[inline]
    pub fn total(&self) -> u32 {
        self.write_idx.load(Ordering::Acquire)
    }
}

impl<const N: usize> Default for DispatchTrace<N> {
    fn default() -> Self {
        Self::new()
    }
}
