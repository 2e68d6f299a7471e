//! Command registry and request encoder tests

use std::sync::Mutex;

use hmi_event_shell::{
    CallingContext, CoffeeType, DeviceHandle, DispatchGate, DispatchTrace, EventId, EventPayload,
    EventRequest, FixedContext, FrameworkSink, PendingTracker, Shell, ShellError, ShellOutput,
    TaskId, COMMANDS, SHELL_DEVICE,
};

struct TestConsole {
    text: Mutex<String>,
    prompts: Mutex<u32>,
}

impl TestConsole {
    fn new() -> Self {
        Self {
            text: Mutex::new(String::new()),
            prompts: Mutex::new(0),
        }
    }

    fn contains(&self, s: &str) -> bool {
        self.text.lock().unwrap().contains(s)
    }

    fn prompts(&self) -> u32 {
        *self.prompts.lock().unwrap()
    }
}

impl ShellOutput for TestConsole {
    fn write(&self, args: core::fmt::Arguments<'_>) {
        self.text.lock().unwrap().push_str(&format!("{}", args));
    }

    fn prompt(&self) {
        *self.prompts.lock().unwrap() += 1;
    }
}

struct CapturingSink {
    requests: Mutex<Vec<EventRequest>>,
}

impl CapturingSink {
    fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
        }
    }

    fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last(&self) -> EventRequest {
        *self.requests.lock().unwrap().last().expect("no request")
    }
}

impl FrameworkSink for CapturingSink {
    fn deliver(&self, _source: DeviceHandle, request: EventRequest, _context: CallingContext) {
        self.requests.lock().unwrap().push(request);
    }
}

struct Fixture {
    tracker: PendingTracker,
    trace: DispatchTrace,
    provider: FixedContext,
    console: TestConsole,
    sink: CapturingSink,
}

impl Fixture {
    fn new() -> Self {
        Self {
            tracker: PendingTracker::new(),
            trace: DispatchTrace::new(),
            provider: FixedContext(CallingContext::Task),
            console: TestConsole::new(),
            sink: CapturingSink::new(),
        }
    }

    fn run(&self, line: &str) -> Result<(), ShellError> {
        self.with_shell(|shell| shell.handle_line(line))
    }

    fn with_shell<R>(&self, body: impl FnOnce(&Shell<'_>) -> R) -> R {
        let mut gate = DispatchGate::new(&self.provider, &self.tracker, &self.trace);
        gate.wire(&self.sink);
        let shell = Shell::new(&self.console, &gate, SHELL_DEVICE);
        body(&shell)
    }
}

#[test]
fn test_command_registry_has_all_commands() {
    let expected = [
        "help",
        "version",
        "info",
        "reset",
        "ir_pwm",
        "white_pwm",
        "volume",
        "coffee_type",
    ];

    for name in expected {
        assert!(
            COMMANDS.iter().any(|c| c.name == name),
            "Command '{}' should be in registry",
            name
        );
    }
}

#[test]
fn test_unknown_command() {
    let f = Fixture::new();
    let result = f.run("foobar");

    assert_eq!(result, Err(ShellError::UnknownCommand));
    assert_eq!(f.sink.count(), 0);
    assert_eq!(f.console.prompts(), 1);
}

#[test]
fn test_volume_set_encodes_request() {
    let f = Fixture::new();
    f.run("volume 50").unwrap();

    assert_eq!(f.sink.count(), 1);
    let req = f.sink.last();
    assert_eq!(req.id, EventId::SetSpeakerVolume);
    assert_eq!(req.payload, EventPayload::Volume(50));
    assert!(req.receivers.contains(TaskId::Output));
    // Dispatched commands leave the prompt to the response router.
    assert_eq!(f.console.prompts(), 0);
}

#[test]
fn test_volume_get_form() {
    let f = Fixture::new();
    f.run("volume").unwrap();

    let req = f.sink.last();
    assert_eq!(req.id, EventId::GetSpeakerVolume);
    assert_eq!(req.payload, EventPayload::None);
}

#[test]
fn test_volume_range_boundaries() {
    let f = Fixture::new();
    f.run("volume 0").unwrap();
    f.run("volume 100").unwrap();
    assert_eq!(f.sink.count(), 2);

    assert_eq!(f.run("volume -1"), Err(ShellError::OutOfRange));
    assert_eq!(f.run("volume 101"), Err(ShellError::OutOfRange));
    assert_eq!(f.sink.count(), 2, "failed commands must not dispatch");
    assert!(f.console.contains("outside of acceptable range"));
}

#[test]
fn test_volume_not_a_number() {
    let f = Fixture::new();
    let result = f.run("volume abc");

    assert_eq!(result, Err(ShellError::NotANumber));
    assert_eq!(f.sink.count(), 0);
    assert!(f.console.contains("\"abc\" not a number."));
}

#[test]
fn test_volume_strtol_trailing_garbage() {
    let f = Fixture::new();
    f.run("volume 50x").unwrap();

    assert_eq!(f.sink.last().payload, EventPayload::Volume(50));
}

#[test]
fn test_volume_argument_count() {
    let f = Fixture::new();
    let result = f.run("volume 1 2");

    assert_eq!(result, Err(ShellError::ArgumentCount));
    assert_eq!(f.sink.count(), 0);
    assert!(f.console.contains("Invalid # of parameters supplied"));
}

#[test]
fn test_ir_pwm_set_and_get() {
    let f = Fixture::new();
    f.run("ir_pwm 33").unwrap();
    assert_eq!(f.sink.last().id, EventId::SetIrLedBrightness);
    assert_eq!(f.sink.last().payload, EventPayload::Brightness(33));

    f.run("ir_pwm").unwrap();
    assert_eq!(f.sink.last().id, EventId::GetIrLedBrightness);
    assert_eq!(f.sink.last().payload, EventPayload::None);
}

#[test]
fn test_white_pwm_range_check() {
    let f = Fixture::new();
    assert_eq!(f.run("white_pwm 101"), Err(ShellError::OutOfRange));
    assert_eq!(f.sink.count(), 0);

    f.run("white_pwm 100").unwrap();
    assert_eq!(f.sink.last().id, EventId::SetWhiteLedBrightness);
    assert_eq!(f.sink.last().payload, EventPayload::Brightness(100));
}

#[test]
fn test_coffee_type_enumeration() {
    let f = Fixture::new();
    let expected = [
        ("americano", CoffeeType::Americano),
        ("cappuccino", CoffeeType::Cappuccino),
        ("espresso", CoffeeType::Espresso),
        ("latte", CoffeeType::Latte),
    ];

    for (name, coffee) in expected {
        f.run(&format!("coffee_type {}", name)).unwrap();
        let req = f.sink.last();
        assert_eq!(req.id, EventId::SetCoffeeType);
        assert_eq!(req.payload, EventPayload::Coffee(coffee));
    }
    assert_eq!(f.sink.count(), 4);
}

#[test]
fn test_coffee_type_invalid_value() {
    let f = Fixture::new();
    let result = f.run("coffee_type mocha");

    assert_eq!(result, Err(ShellError::InvalidEnumValue));
    assert_eq!(f.sink.count(), 0);
    assert!(f.console.contains("Invalid coffee type: \"mocha\""));
}

#[test]
fn test_coffee_type_case_sensitive() {
    let f = Fixture::new();
    assert_eq!(f.run("coffee_type Latte"), Err(ShellError::InvalidEnumValue));
    assert_eq!(f.sink.count(), 0);
}

#[test]
fn test_coffee_type_get_form() {
    let f = Fixture::new();
    f.run("coffee_type").unwrap();

    let req = f.sink.last();
    assert_eq!(req.id, EventId::GetCoffeeType);
    assert_eq!(req.payload, EventPayload::None);
}

#[test]
fn test_help_lists_commands() {
    let f = Fixture::new();
    f.run("help").unwrap();

    assert!(f.console.contains("volume"));
    assert!(f.console.contains("coffee_type"));
    assert_eq!(f.console.prompts(), 1);
    assert_eq!(f.sink.count(), 0);
}

#[test]
fn test_version_prints() {
    let f = Fixture::new();
    f.run("version").unwrap();

    assert!(f.console.contains("Version"));
}

#[test]
fn test_reset_requires_confirm() {
    let f = Fixture::new();
    assert_eq!(f.run("reset"), Err(ShellError::RequiresConfirm));
    f.run("reset confirm").unwrap();
}

#[test]
fn test_info_prints_counters() {
    let f = Fixture::new();
    f.with_shell(|shell| {
        shell.handle_line("volume 10").unwrap();
        shell.handle_line("info").unwrap();
    });

    assert!(f.console.contains("dispatched: 1"));
    assert!(f.console.contains("coffee_type"));
}

#[test]
fn test_empty_line_just_prompts() {
    let f = Fixture::new();
    f.run("").unwrap();
    f.run("   ").unwrap();

    assert_eq!(f.console.prompts(), 2);
    assert_eq!(f.sink.count(), 0);
}
