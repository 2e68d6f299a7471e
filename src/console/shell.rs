//! Shell surface: output seam, prompt handling, line execution.
//!
//! The shell does not own the console transport. Output goes through
//! [`ShellOutput`], a shared-reference seam so the response router can
//! print from the framework task's context while the command side prints
//! from its own; implementations serialize internally.

use core::fmt::Arguments;

use crate::console::commands::execute;
use crate::console::parser::parse_line;
use crate::console::ShellError;
use crate::dispatch::{DeviceHandle, DispatchGate};
use crate::event::{EventId, EventPayload, ReceiverMask, TaskId};
use crate::request::EventRequest;

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Console output sink shared between the command side and the response
/// router.
pub trait ShellOutput: Sync {
    /// Append formatted text to the console.
    fn write(&self, args: Arguments<'_>);

    /// Re-emit the interactive prompt, signaling the console accepts
    /// input again.
    fn prompt(&self);
}

/// How a command completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Handled entirely on the console side; output already written.
    Local,
    /// A request was dispatched; the response router owns further output
    /// and the prompt.
    Dispatched,
}

/// The interactive shell: command lookup, encoding and dispatch.
pub struct Shell<'a> {
    out: &'a dyn ShellOutput,
    gate: &'a DispatchGate<'a>,
    source: DeviceHandle,
}

impl<'a> Shell<'a> {
    pub fn new(out: &'a dyn ShellOutput, gate: &'a DispatchGate<'a>, source: DeviceHandle) -> Self {
        Self { out, gate, source }
    }

    /// Handle one tokenizable input line.
    ///
    /// Local commands and failures re-emit the prompt here; a dispatched
    /// command leaves the prompt to the response router's final part.
    pub fn handle_line(&self, line: &str) -> Result<(), ShellError> {
        let cmd = parse_line(line);
        if cmd.command.is_empty() {
            self.out.prompt();
            return Ok(());
        }

        match execute(&cmd, self) {
            Ok(Outcome::Local) => {
                self.out.prompt();
                Ok(())
            }
            Ok(Outcome::Dispatched) => Ok(()),
            Err(e) => {
                self.print(format_args!("{}\r\n", e));
                self.out.prompt();
                Err(e)
            }
        }
    }

    /// Build a request for the output task and push it through the gate.
    pub fn dispatch(&self, id: EventId, payload: EventPayload) {
        let request = EventRequest::new(id, payload, ReceiverMask::only(TaskId::Output));
        self.gate.dispatch(self.source, request);
    }

    pub fn print(&self, args: Arguments<'_>) {
        self.out.write(args);
    }

    pub fn gate(&self) -> &DispatchGate<'a> {
        self.gate
    }

    /// Print welcome banner
    pub fn banner(&self) {
        self.print(format_args!("\r\n{}\r\n", VERSION));
        self.print(format_args!("Type 'help' for commands.\r\n"));
        self.out.prompt();
    }
}
