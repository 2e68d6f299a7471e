//! Event requests and the single-slot handoff mailbox.
//!
//! A request is an owned value, built fresh for every command and moved
//! through the dispatch boundary. Nothing in the core reuses request
//! storage across commands, so there is no hidden overwrite of an
//! in-flight request.
//!
//! Where a receiving task wants single-slot semantics anyway (the newest
//! command wins), [`RequestSlot`] provides that as an explicit contract:
//! capacity 1, overwrite-oldest, with a counter for every request that was
//! replaced before being taken.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::event::{EventId, EventPayload, ReceiverMask};

/// One typed request for a framework task.
///
/// `seq` is stamped by the dispatch gate; encoders leave it at zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventRequest {
    pub id: EventId,
    pub payload: EventPayload,
    pub receivers: ReceiverMask,
    /// Dispatch sequence number, unique per gate.
    pub seq: u32,
}

impl EventRequest {
    pub const fn new(id: EventId, payload: EventPayload, receivers: ReceiverMask) -> Self {
        Self {
            id,
            payload,
            receivers,
            seq: 0,
        }
    }
}

/// Capacity-1, overwrite-oldest request mailbox.
///
/// Contract:
/// - one producer (the dispatch side, task or ISR), one consumer
///   (the framework task);
/// - [`post`](Self::post) never blocks and always succeeds: a request still
///   sitting in the slot is overwritten and counted;
/// - [`take`](Self::take) consumes the newest request or returns `None`.
///
/// Coordination is a sequence lock plus post/take counters, so a torn read
/// during an overwrite is detected and retried.
pub struct RequestSlot {
    value: UnsafeCell<EventRequest>,
    /// Seqlock generation; odd while a write is in progress.
    gen: AtomicU32,
    posted: AtomicU32,
    taken: AtomicU32,
    overwritten: AtomicU32,
}

// SAFETY: single producer / single consumer by contract; the generation
// counter orders slot writes against reads, and a reader that races a
// writer observes a generation change and retries.
unsafe impl Sync for RequestSlot {}
unsafe impl Send for RequestSlot {}

impl RequestSlot {
    pub const fn new() -> Self {
        Self {
            value: UnsafeCell::new(EventRequest::new(
                EventId::GetSpeakerVolume,
                EventPayload::None,
                ReceiverMask::EMPTY,
            )),
            gen: AtomicU32::new(0),
            posted: AtomicU32::new(0),
            taken: AtomicU32::new(0),
            overwritten: AtomicU32::new(0),
        }
    }

    /// Post a request, replacing any request not yet taken.
    ///
    /// Never blocks, never allocates; safe from interrupt context.
    #[inline]
    pub fn post(&self, request: EventRequest) {
        let posted = self.posted.load(Ordering::Relaxed);
        if posted.wrapping_sub(self.taken.load(Ordering::Acquire)) > 0 {
            self.overwritten.fetch_add(1, Ordering::Relaxed);
        }

        let g = self.gen.load(Ordering::Relaxed);
        self.gen.store(g.wrapping_add(1), Ordering::Release);
        // SAFETY: single producer; consumers validate the generation.
        unsafe {
            *self.value.get() = request;
        }
        self.gen.store(g.wrapping_add(2), Ordering::Release);

        self.posted.store(posted.wrapping_add(1), Ordering::Release);
    }

    /// Take the newest posted request, if any.
    #[inline]
    pub fn take(&self) -> Option<EventRequest> {
        loop {
            let posted = self.posted.load(Ordering::Acquire);
            if posted == self.taken.load(Ordering::Relaxed) {
                return None;
            }

            let g1 = self.gen.load(Ordering::Acquire);
            if g1 & 1 != 0 {
                // Writer mid-update; the value will be readable shortly.
                core::hint::spin_loop();
                continue;
            }

            // SAFETY: generation check below detects a concurrent rewrite.
            let request = unsafe { *self.value.get() };

            if self.gen.load(Ordering::Acquire) == g1 {
                self.taken.store(posted, Ordering::Release);
                return Some(request);
            }
        }
    }

    /// True if a request is waiting to be taken.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.posted.load(Ordering::Acquire) != self.taken.load(Ordering::Relaxed)
    }

    /// Requests replaced in the slot before the consumer took them.
    #[inline]
    pub fn overwritten(&self) -> u32 {
        self.overwritten.load(Ordering::Relaxed)
    }
}

impl Default for RequestSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TaskId;

    fn volume_req(v: u8) -> EventRequest {
        EventRequest::new(
            EventId::SetSpeakerVolume,
            EventPayload::Volume(v),
            ReceiverMask::only(TaskId::Output),
        )
    }

    #[test]
    fn test_slot_empty() {
        let slot = RequestSlot::new();
        assert!(!slot.is_pending());
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_slot_post_take() {
        let slot = RequestSlot::new();
        slot.post(volume_req(42));

        assert!(slot.is_pending());
        let req = slot.take().unwrap();
        assert_eq!(req.payload, EventPayload::Volume(42));
        assert!(!slot.is_pending());
        assert_eq!(slot.overwritten(), 0);
    }

    #[test]
    fn test_slot_overwrite_counts() {
        let slot = RequestSlot::new();
        slot.post(volume_req(1));
        slot.post(volume_req(2));
        slot.post(volume_req(3));

        // Newest wins; the two replaced requests are counted.
        assert_eq!(slot.take().unwrap().payload, EventPayload::Volume(3));
        assert_eq!(slot.overwritten(), 2);
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_slot_concurrent_post_take() {
        use std::sync::Arc;
        use std::thread;

        let slot = Arc::new(RequestSlot::new());

        let producer = {
            let slot = Arc::clone(&slot);
            thread::spawn(move || {
                for v in 0..=100u8 {
                    slot.post(volume_req(v));
                }
            })
        };

        let mut seen = 0u32;
        let mut last = None;
        while !producer.is_finished() || slot.is_pending() {
            if let Some(req) = slot.take() {
                seen += 1;
                last = Some(req);
            }
        }
        producer.join().unwrap();

        // Every taken request is intact, and nothing was lost silently:
        // each post was taken or counted as overwritten (a post racing a
        // take may be counted in both).
        assert!(seen >= 1);
        assert!(seen <= 101);
        assert!(seen + slot.overwritten() >= 101);
        if let Some(req) = last {
            assert!(matches!(req.payload, EventPayload::Volume(v) if v <= 100));
        }
    }
}
