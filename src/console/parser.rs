//! Argv adapter at the console boundary
//!
//! The real line editor lives outside this crate; whatever produces a
//! line hands it here to be split into a command name and up to
//! [`MAX_ARGS`] arguments. Whitespace-separated, no quoting; surplus
//! tokens are dropped.

/// Arguments accepted after the command name.
pub const MAX_ARGS: usize = 3;

/// One tokenized command line.
#[derive(Debug, Clone)]
pub struct ParsedCommand<'a> {
    /// The command name (first token)
    pub command: &'a str,
    args: [&'a str; MAX_ARGS],
    argc: usize,
}

impl<'a> ParsedCommand<'a> {
    /// Create empty command
    pub const fn empty() -> Self {
        Self {
            command: "",
            args: [""; MAX_ARGS],
            argc: 0,
        }
    }

    /// Get argument by index (0-based)
    pub fn arg(&self, idx: usize) -> Option<&'a str> {
        self.args[..self.argc].get(idx).copied()
    }

    /// Number of arguments present
    pub fn arg_count(&self) -> usize {
        self.argc
    }
}

/// Parse a command line into command and arguments
pub fn parse_line(line: &str) -> ParsedCommand<'_> {
    let mut tokens = line.split_whitespace();
    let command = tokens.next().unwrap_or("");

    let mut parsed = ParsedCommand {
        command,
        args: [""; MAX_ARGS],
        argc: 0,
    };
    for (slot, token) in parsed.args.iter_mut().zip(tokens) {
        *slot = token;
        parsed.argc += 1;
    }
    parsed
}
