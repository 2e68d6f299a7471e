//! Shell error types

/// Shell error with code and message.
///
/// All of these are recoverable at the command boundary: the console
/// prints a message and returns to the prompt. None abort the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellError {
    /// E01: Unknown command
    UnknownCommand,
    /// E02: Wrong number of arguments
    ArgumentCount,
    /// E03: Value has no leading integer
    NotANumber,
    /// E04: Value outside the allowed range
    OutOfRange,
    /// E05: Value not in the command's enumeration
    InvalidEnumValue,
    /// E06: Dangerous command requires 'confirm'
    RequiresConfirm,
    /// E07: Framework delivered a response without a payload reference
    MalformedResponse,
}

impl ShellError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "E01",
            Self::ArgumentCount => "E02",
            Self::NotANumber => "E03",
            Self::OutOfRange => "E04",
            Self::InvalidEnumValue => "E05",
            Self::RequiresConfirm => "E06",
            Self::MalformedResponse => "E07",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::ArgumentCount => "invalid number of parameters",
            Self::NotANumber => "not a number",
            Self::OutOfRange => "value out of range",
            Self::InvalidEnumValue => "invalid value",
            Self::RequiresConfirm => "requires 'confirm'",
            Self::MalformedResponse => "malformed response",
        }
    }
}

impl core::fmt::Display for ShellError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
