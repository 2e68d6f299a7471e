//! The dispatch gate: single choke point between command encoders and the
//! framework.
//!
//! The gate takes a filled [`EventRequest`] by value, classifies the
//! calling context, stamps a sequence number, and forwards the request to
//! the wired sink synchronously. No blocking waits, no allocation; the
//! whole path is safe from interrupt context.
//!
//! Dispatch is fire-and-forget. The response, if any, arrives later
//! through the response router on the framework task's own schedule;
//! pairing relies on event-identifier correlation plus the per-family
//! [`PendingTracker`].

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::context::{CallingContext, ContextProvider};
use crate::event::{EventFamily, FAMILY_COUNT};
use crate::request::EventRequest;
use crate::trace::{DispatchTrace, TraceKind, TraceRecord};

/// Opaque handle identifying the input device a request originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceHandle(pub u8);

/// The console shell's device handle.
pub const SHELL_DEVICE: DeviceHandle = DeviceHandle(0);

/// Outbound contract to the framework.
///
/// `deliver` is invoked synchronously from the gate, possibly from
/// interrupt context (`context` says which); implementations must not
/// block when `context.is_interrupt()`. Errors are not reported back.
pub trait FrameworkSink: Sync {
    fn deliver(&self, source: DeviceHandle, request: EventRequest, context: CallingContext);
}

struct FamilyState {
    outstanding: AtomicBool,
    last_seq: AtomicU32,
    completions: AtomicU32,
    superseded: AtomicU32,
}

impl FamilyState {
    const IDLE: Self = Self {
        outstanding: AtomicBool::new(false),
        last_seq: AtomicU32::new(0),
        completions: AtomicU32::new(0),
        superseded: AtomicU32::new(0),
    };
}

/// Per-family request/response correlation.
///
/// One family can have at most one request the console still waits on.
/// A new dispatch while the previous one is outstanding supersedes it:
/// allowed (single-operator console), but counted so it is observable
/// instead of a silent overwrite. A completion that arrives for an idle
/// family is counted as a double fire.
pub struct PendingTracker {
    families: [FamilyState; FAMILY_COUNT],
    double_fires: AtomicU32,
}

impl PendingTracker {
    pub const fn new() -> Self {
        Self {
            families: [FamilyState::IDLE; FAMILY_COUNT],
            double_fires: AtomicU32::new(0),
        }
    }

    #[inline]
    fn slot(&self, family: EventFamily) -> &FamilyState {
        &self.families[family as usize]
    }

    /// Mark a dispatch. Called by the gate only.
    pub fn begin(&self, family: EventFamily, seq: u32) {
        let slot = self.slot(family);
        if slot.outstanding.swap(true, Ordering::AcqRel) {
            slot.superseded.fetch_add(1, Ordering::Relaxed);
        }
        slot.last_seq.store(seq, Ordering::Release);
    }

    /// Mark the final response part for a family.
    ///
    /// Returns `true` exactly once per outstanding request; a second
    /// completion is recorded as a double fire and returns `false`.
    pub fn complete(&self, family: EventFamily) -> bool {
        let slot = self.slot(family);
        if slot.outstanding.swap(false, Ordering::AcqRel) {
            slot.completions.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            self.double_fires.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// True while the family still waits for its final response part.
    pub fn is_outstanding(&self, family: EventFamily) -> bool {
        self.slot(family).outstanding.load(Ordering::Acquire)
    }

    /// Sequence number of the most recent dispatch for the family.
    pub fn last_seq(&self, family: EventFamily) -> u32 {
        self.slot(family).last_seq.load(Ordering::Acquire)
    }

    /// Completed request count for the family.
    pub fn completions(&self, family: EventFamily) -> u32 {
        self.slot(family).completions.load(Ordering::Relaxed)
    }

    /// Requests superseded before their response arrived.
    pub fn superseded(&self, family: EventFamily) -> u32 {
        self.slot(family).superseded.load(Ordering::Relaxed)
    }

    /// Final response parts that arrived with nothing outstanding.
    pub fn double_fires(&self) -> u32 {
        self.double_fires.load(Ordering::Relaxed)
    }
}

impl Default for PendingTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Single choke point forwarding requests to the framework.
pub struct DispatchGate<'a> {
    sink: Option<&'a dyn FrameworkSink>,
    provider: &'a dyn ContextProvider,
    tracker: &'a PendingTracker,
    trace: &'a DispatchTrace,
    seq: AtomicU32,
}

impl<'a> DispatchGate<'a> {
    /// Create an unwired gate. Requests dispatched before [`wire`](Self::wire)
    /// are dropped without error; wiring happens once at startup, before
    /// any command can be typed.
    pub fn new(
        provider: &'a dyn ContextProvider,
        tracker: &'a PendingTracker,
        trace: &'a DispatchTrace,
    ) -> Self {
        Self {
            sink: None,
            provider,
            tracker,
            trace,
            seq: AtomicU32::new(0),
        }
    }

    /// Register the framework sink.
    pub fn wire(&mut self, sink: &'a dyn FrameworkSink) {
        self.sink = Some(sink);
    }

    pub fn is_wired(&self) -> bool {
        self.sink.is_some()
    }

    /// Forward a request to the framework.
    ///
    /// Classifies the calling context, stamps the sequence number and
    /// hands the request to the sink synchronously. Unwired gate: silent
    /// no-op (trace-only).
    pub fn dispatch(&self, source: DeviceHandle, mut request: EventRequest) {
        let context = self.provider.current();
        request.seq = self.seq.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        self.tracker.begin(request.id.family(), request.seq);

        match self.sink {
            Some(sink) => {
                self.trace.record(TraceRecord {
                    kind: TraceKind::Dispatched,
                    event_id: request.id.raw(),
                    seq: request.seq,
                    context,
                });
                sink.deliver(source, request, context);
            }
            None => {
                self.trace.record(TraceRecord {
                    kind: TraceKind::DroppedUnwired,
                    event_id: request.id.raw(),
                    seq: request.seq,
                    context,
                });
            }
        }
    }

    /// Total requests that passed through the gate.
    pub fn dispatched(&self) -> u32 {
        self.seq.load(Ordering::Relaxed)
    }

    pub fn tracker(&self) -> &PendingTracker {
        self.tracker
    }

    pub fn trace(&self) -> &DispatchTrace {
        self.trace
    }
}
