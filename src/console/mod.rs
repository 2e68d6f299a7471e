//! Interactive console: command registry, request encoders, shell surface.
//!
//! Line editing and tokenizing live outside this crate; the boundary here
//! is one line of text in, formatted text and an eventual prompt out.

pub mod commands;
pub mod error;
pub mod parser;
pub mod shell;

pub use commands::{execute, ArgPolicy, CommandDescriptor, COMMANDS};
pub use error::ShellError;
pub use parser::{parse_line, ParsedCommand};
pub use shell::{Outcome, Shell, ShellOutput, VERSION};
