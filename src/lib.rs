//! # hmi-event-shell
//!
//! Command-to-event dispatch layer for an embedded HMI console.
//!
//! ## Architecture
//!
//! One typed event at a time flows through the layer:
//!
//! ```text
//! console line ──▶ registry ──▶ encoder ──▶ dispatch gate ──▶ framework task
//! console out ◀── response router ◀────────────── (async) ◀──┘
//! ```
//!
//! - Commands are validated and encoded into owned [`EventRequest`]s;
//!   nothing is dispatched on a validation failure.
//! - The dispatch gate classifies interrupt-vs-task context and forwards
//!   fire-and-forget; no operation blocks or allocates.
//! - Responses come back later through the [`ResponseRouter`], correlated
//!   only by event identifier, and re-emit the prompt on the final part.

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod console;
pub mod context;
pub mod dispatch;
pub mod event;
pub mod request;
pub mod router;
pub mod trace;

pub use console::{Outcome, Shell, ShellError, ShellOutput, COMMANDS, VERSION};
pub use context::{ActiveInterruptProvider, CallingContext, ContextProvider, FixedContext};
pub use dispatch::{DeviceHandle, DispatchGate, FrameworkSink, PendingTracker, SHELL_DEVICE};
pub use event::{
    CoffeeType, EventFamily, EventId, EventPayload, EventResponse, EventStatus, ReceiverMask,
    TaskId,
};
pub use request::{EventRequest, RequestSlot};
pub use router::ResponseRouter;
pub use trace::{DispatchTrace, TraceKind, TraceRecord};
