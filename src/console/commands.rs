//! Command registry and request encoders
//!
//! Each value command validates its arguments, decides GET vs SET, builds
//! the typed event request and pushes it through the dispatch gate. On
//! any validation failure the shell gets a descriptive message and
//! nothing is dispatched.

use crate::config::{LEVEL_MAX, LEVEL_MIN};
use crate::console::parser::ParsedCommand;
use crate::console::shell::{Outcome, Shell, VERSION};
use crate::console::ShellError;
use crate::event::{CoffeeType, EventFamily, EventId, EventPayload};

/// Argument-count policy for a registered command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgPolicy {
    /// Exactly this many arguments after the name.
    Exact(usize),
    /// Accept any count; the handler does its own bounds checking.
    Ignore,
}

/// Command descriptor
pub struct CommandDescriptor {
    pub name: &'static str,
    pub usage: &'static str,
    pub handler: fn(&ParsedCommand<'_>, &Shell<'_>) -> Result<Outcome, ShellError>,
    pub args: ArgPolicy,
}

/// All available commands
pub static COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "help",
        usage: "\"help\": list commands",
        handler: cmd_help,
        args: ArgPolicy::Ignore,
    },
    CommandDescriptor {
        name: "version",
        usage: "\"version\": get the version of the current software",
        handler: cmd_version,
        args: ArgPolicy::Exact(0),
    },
    CommandDescriptor {
        name: "info",
        usage: "\"info\": get the system information",
        handler: cmd_info,
        args: ArgPolicy::Ignore,
    },
    CommandDescriptor {
        name: "reset",
        usage: "\"reset confirm\": resets the board",
        handler: cmd_reset,
        args: ArgPolicy::Ignore,
    },
    CommandDescriptor {
        name: "ir_pwm",
        usage: "\"ir_pwm <value>\": PWM pulse width for IR LED, value should be \
                between 0 (inactive) and 100 (max)",
        handler: cmd_ir_pwm,
        args: ArgPolicy::Ignore,
    },
    CommandDescriptor {
        name: "white_pwm",
        usage: "\"white_pwm <value>\": PWM pulse width for white LED, value should be \
                between 0 (inactive) and 100 (max)",
        handler: cmd_white_pwm,
        args: ArgPolicy::Ignore,
    },
    CommandDescriptor {
        name: "volume",
        usage: "\"volume <value>\": Volume of the speaker. Value should be between \
                0 (muted) and 100 (max)",
        handler: cmd_volume,
        args: ArgPolicy::Ignore,
    },
    CommandDescriptor {
        name: "coffee_type",
        usage: "\"coffee_type <value>\": Type of coffee: \
                americano, cappuccino, espresso, latte",
        handler: cmd_coffee_type,
        args: ArgPolicy::Ignore,
    },
];

/// Execute a parsed command.
///
/// Lookup is by name on every line; if the table ever carried duplicate
/// names, the later registration wins.
pub fn execute(cmd: &ParsedCommand<'_>, shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    let desc = COMMANDS
        .iter()
        .rev()
        .find(|c| c.name == cmd.command)
        .ok_or(ShellError::UnknownCommand)?;

    if let ArgPolicy::Exact(n) = desc.args {
        if cmd.arg_count() != n {
            shell.print(format_args!("Usage: {}\r\n", desc.usage));
            return Err(ShellError::ArgumentCount);
        }
    }

    (desc.handler)(cmd, shell)
}

// --- Local commands ---

fn cmd_help(_cmd: &ParsedCommand<'_>, shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    for c in COMMANDS {
        shell.print(format_args!("  {:<12} {}\r\n", c.name, c.usage));
    }
    Ok(Outcome::Local)
}

fn cmd_version(_cmd: &ParsedCommand<'_>, shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    shell.print(format_args!("Version {}\r\n", VERSION));
    Ok(Outcome::Local)
}

fn cmd_info(_cmd: &ParsedCommand<'_>, shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    let gate = shell.gate();
    let tracker = gate.tracker();
    let trace = gate.trace();

    shell.print(format_args!("dispatched: {}\r\n", gate.dispatched()));
    for family in EventFamily::ALL {
        shell.print(format_args!(
            "{:<12} outstanding:{} completed:{} superseded:{}\r\n",
            family.as_str(),
            tracker.is_outstanding(family),
            tracker.completions(family),
            tracker.superseded(family),
        ));
    }
    shell.print(format_args!(
        "double fires: {}  trace lost: {}\r\n",
        tracker.double_fires(),
        trace.lost()
    ));

    while let Some(rec) = trace.drain() {
        shell.print(format_args!(
            "  [{}] id:{} seq:{} {}\r\n",
            rec.kind.as_str(),
            rec.event_id,
            rec.seq,
            if rec.context.is_interrupt() { "isr" } else { "task" },
        ));
    }

    #[cfg(all(not(test), target_arch = "xtensa"))]
    {
        let heap_free = unsafe { esp_idf_svc::sys::esp_get_free_heap_size() };
        shell.print(format_args!("heap free: {} bytes\r\n", heap_free));
    }

    Ok(Outcome::Local)
}

fn cmd_reset(cmd: &ParsedCommand<'_>, _shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    if cmd.arg(0) != Some("confirm") {
        return Err(ShellError::RequiresConfirm);
    }

    #[cfg(all(not(test), target_arch = "xtensa"))]
    unsafe {
        esp_idf_svc::sys::esp_restart();
    }

    Ok(Outcome::Local)
}

// --- Request encoders ---

fn cmd_ir_pwm(cmd: &ParsedCommand<'_>, shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    level_command(
        cmd,
        shell,
        EventId::GetIrLedBrightness,
        EventId::SetIrLedBrightness,
        EventPayload::Brightness,
        "PWM duty of",
    )
}

fn cmd_white_pwm(cmd: &ParsedCommand<'_>, shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    level_command(
        cmd,
        shell,
        EventId::GetWhiteLedBrightness,
        EventId::SetWhiteLedBrightness,
        EventPayload::Brightness,
        "PWM duty of",
    )
}

fn cmd_volume(cmd: &ParsedCommand<'_>, shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    level_command(
        cmd,
        shell,
        EventId::GetSpeakerVolume,
        EventId::SetSpeakerVolume,
        EventPayload::Volume,
        "Volume",
    )
}

/// Shared encoder for the 0..=100 percentage commands.
///
/// No argument selects the family's GET identifier and leaves the payload
/// empty; one argument is parsed, range-checked and dispatched as SET.
fn level_command(
    cmd: &ParsedCommand<'_>,
    shell: &Shell<'_>,
    get_id: EventId,
    set_id: EventId,
    payload: fn(u8) -> EventPayload,
    label: &str,
) -> Result<Outcome, ShellError> {
    if cmd.arg_count() > 1 {
        shell.print(format_args!("Invalid # of parameters supplied\r\n"));
        return Err(ShellError::ArgumentCount);
    }

    match cmd.arg(0) {
        None => shell.dispatch(get_id, EventPayload::None),
        Some(raw) => {
            let value = match parse_leading_int(raw) {
                Some(v) => v,
                None => {
                    shell.print(format_args!("\"{}\" not a number.\r\n", raw));
                    return Err(ShellError::NotANumber);
                }
            };
            if value < LEVEL_MIN || value > LEVEL_MAX {
                shell.print(format_args!(
                    "{} {} outside of acceptable range. Valid values are {}->{}.\r\n",
                    label, raw, LEVEL_MIN, LEVEL_MAX
                ));
                return Err(ShellError::OutOfRange);
            }
            shell.dispatch(set_id, payload(value as u8));
        }
    }

    Ok(Outcome::Dispatched)
}

fn cmd_coffee_type(cmd: &ParsedCommand<'_>, shell: &Shell<'_>) -> Result<Outcome, ShellError> {
    if cmd.arg_count() > 1 {
        shell.print(format_args!("Invalid # of parameters supplied\r\n"));
        return Err(ShellError::ArgumentCount);
    }

    match cmd.arg(0) {
        None => shell.dispatch(EventId::GetCoffeeType, EventPayload::None),
        Some(raw) => match CoffeeType::from_name(raw) {
            Some(t) => shell.dispatch(EventId::SetCoffeeType, EventPayload::Coffee(t)),
            None => {
                shell.print(format_args!("Invalid coffee type: \"{}\"\r\n", raw));
                return Err(ShellError::InvalidEnumValue);
            }
        },
    }

    Ok(Outcome::Dispatched)
}

/// strtol-style integer parse: optional sign, then leading decimal digits.
///
/// Trailing non-digits are ignored ("50x" parses as 50); `None` only when
/// no digits were consumed at all. Saturates instead of overflowing.
fn parse_leading_int(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut value: i64 = 0;
    let mut consumed = 0usize;
    for &b in digits {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add((b - b'0') as i64);
        consumed += 1;
    }

    if consumed == 0 {
        return None;
    }
    Some(if negative { -value } else { value })
}
