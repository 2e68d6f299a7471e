//! Response router: renders asynchronous framework responses back onto
//! the console.
//!
//! Invoked by a framework task at a time the console does not control,
//! with a raw event identifier, an optional response payload, a status
//! and an is-final flag. Rendering is a table lookup from identifier to a
//! formatting rule, so adding an event family is a new table entry rather
//! than another arm in a central switch. Identifiers this build does not
//! know are ignored on purpose.
//!
//! The router never touches request state; it only formats text, re-emits
//! the prompt on the final part of a sequence, and completes the pending
//! tracker for correlation.

use core::fmt::Write;

use crate::console::{ShellError, ShellOutput};
use crate::context::CallingContext;
use crate::dispatch::PendingTracker;
use crate::event::{EventId, EventPayload, EventResponse, EventStatus};
use crate::trace::{DispatchTrace, TraceKind, TraceRecord};

/// Formatting rule for one event identifier.
type FormatFn = fn(&mut dyn Write, EventStatus, &EventPayload);

struct FormatterEntry {
    id: EventId,
    format: FormatFn,
}

/// Identifier-to-formatter table. One entry per renderable event.
static FORMATTERS: &[FormatterEntry] = &[
    FormatterEntry {
        id: EventId::GetIrLedBrightness,
        format: fmt_get_ir_brightness,
    },
    FormatterEntry {
        id: EventId::SetIrLedBrightness,
        format: fmt_set_brightness,
    },
    FormatterEntry {
        id: EventId::GetWhiteLedBrightness,
        format: fmt_get_white_brightness,
    },
    FormatterEntry {
        id: EventId::SetWhiteLedBrightness,
        format: fmt_set_brightness,
    },
    FormatterEntry {
        id: EventId::GetSpeakerVolume,
        format: fmt_get_volume,
    },
    FormatterEntry {
        id: EventId::SetSpeakerVolume,
        format: fmt_set_volume,
    },
    FormatterEntry {
        id: EventId::GetCoffeeType,
        format: fmt_get_coffee,
    },
    FormatterEntry {
        id: EventId::SetCoffeeType,
        format: fmt_set_coffee,
    },
];

fn fmt_get_volume(out: &mut dyn Write, status: EventStatus, payload: &EventPayload) {
    if status == EventStatus::Ok {
        if let EventPayload::Volume(v) = payload {
            let _ = write!(out, "\r\nCurrent Volume is {}", v);
        }
    }
}

fn fmt_set_volume(out: &mut dyn Write, status: EventStatus, _payload: &EventPayload) {
    if status == EventStatus::Ok {
        let _ = write!(out, "\r\nVolume set");
    } else {
        let _ = write!(out, "\r\nVolume set failed");
    }
}

fn fmt_get_ir_brightness(out: &mut dyn Write, status: EventStatus, payload: &EventPayload) {
    if status == EventStatus::Ok {
        if let EventPayload::Brightness(v) = payload {
            let _ = write!(out, "\r\nIR LED Brightness is currently set to: {}", v);
        }
    }
}

fn fmt_get_white_brightness(out: &mut dyn Write, status: EventStatus, payload: &EventPayload) {
    if status == EventStatus::Ok {
        if let EventPayload::Brightness(v) = payload {
            let _ = write!(out, "\r\nWhite LED Brightness is currently set to: {}", v);
        }
    }
}

fn fmt_set_brightness(out: &mut dyn Write, status: EventStatus, _payload: &EventPayload) {
    if status == EventStatus::Ok {
        let _ = write!(out, "\r\nBrightness set");
    } else {
        let _ = write!(out, "\r\nBrightness set failed");
    }
}

fn fmt_get_coffee(out: &mut dyn Write, status: EventStatus, payload: &EventPayload) {
    if status == EventStatus::Ok {
        if let EventPayload::Coffee(t) = payload {
            let _ = write!(out, "\r\nCoffee type is currently set to: {}", t.as_str());
        }
    }
}

fn fmt_set_coffee(out: &mut dyn Write, status: EventStatus, _payload: &EventPayload) {
    if status == EventStatus::Ok {
        let _ = write!(out, "\r\nCoffee type set");
    } else {
        let _ = write!(out, "\r\nCoffee type set failed");
    }
}

/// Fixed formatting buffer; one response part never exceeds a line.
struct FormatBuffer {
    buf: [u8; 160],
    len: usize,
}

impl FormatBuffer {
    fn new() -> Self {
        Self {
            buf: [0u8; 160],
            len: 0,
        }
    }

    fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

impl Write for FormatBuffer {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let available = self.buf.len() - self.len;
        let to_copy = bytes.len().min(available);
        self.buf[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}

/// Maps asynchronous event responses back to formatted console output.
pub struct ResponseRouter<'a> {
    out: &'a dyn ShellOutput,
    tracker: &'a PendingTracker,
    trace: &'a DispatchTrace,
}

impl<'a> ResponseRouter<'a> {
    pub fn new(
        out: &'a dyn ShellOutput,
        tracker: &'a PendingTracker,
        trace: &'a DispatchTrace,
    ) -> Self {
        Self {
            out,
            tracker,
            trace,
        }
    }

    /// Inbound callback from a framework task.
    ///
    /// Tolerates zero or more invocations per dispatched request. A
    /// missing response reference is rejected without output; an unknown
    /// identifier produces no output and no error. `is_final` re-emits
    /// the prompt exactly once, after any formatted text.
    pub fn on_response(
        &self,
        event_id: u32,
        response: Option<&EventResponse>,
        status: EventStatus,
        is_final: bool,
    ) -> Result<(), ShellError> {
        let Some(response) = response else {
            self.trace.record(TraceRecord {
                kind: TraceKind::ResponseMalformed,
                event_id,
                seq: 0,
                context: CallingContext::Task,
            });
            return Err(ShellError::MalformedResponse);
        };

        match FORMATTERS.iter().find(|f| f.id.raw() == event_id) {
            Some(entry) => {
                let mut line = FormatBuffer::new();
                (entry.format)(&mut line, status, &response.payload);
                if !line.as_str().is_empty() {
                    self.out.write(format_args!("{}", line.as_str()));
                }
                self.trace.record(TraceRecord {
                    kind: TraceKind::ResponseRendered,
                    event_id,
                    seq: self.tracker.last_seq(entry.id.family()),
                    context: CallingContext::Task,
                });
                if is_final {
                    self.tracker.complete(entry.id.family());
                }
            }
            None => {
                // Deliberate default: events this console build does not
                // know how to render.
                self.trace.record(TraceRecord {
                    kind: TraceKind::ResponseIgnored,
                    event_id,
                    seq: 0,
                    context: CallingContext::Task,
                });
            }
        }

        if is_final {
            self.out.prompt();
        }
        Ok(())
    }
}
