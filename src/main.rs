//! Hosted simulation of the HMI console.
//!
//! Wires the shell to a mock output-device task over the single-slot
//! request mailbox: stdin lines go through the registry, encoder and
//! dispatch gate; a worker thread plays the framework task, owning the
//! device state and delivering responses back through the router from
//! its own context.

use std::io::{self, BufRead, Write as IoWrite};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use hmi_event_shell::config::PROMPT;
use hmi_event_shell::{
    ActiveInterruptProvider, CallingContext, CoffeeType, DeviceHandle, DispatchGate,
    DispatchTrace, EventId, EventPayload, EventRequest, EventResponse, EventStatus,
    FrameworkSink, PendingTracker, RequestSlot, ResponseRouter, Shell, ShellOutput,
    SHELL_DEVICE,
};

static TRACKER: PendingTracker = PendingTracker::new();
static TRACE: DispatchTrace = DispatchTrace::new();
static SLOT: RequestSlot = RequestSlot::new();
static PROVIDER: ActiveInterruptProvider = ActiveInterruptProvider;
static CONSOLE: StdoutConsole = StdoutConsole {
    lock: Mutex::new(()),
};

/// Console output on stdout, serialized across the shell task and the
/// device task.
struct StdoutConsole {
    lock: Mutex<()>,
}

impl ShellOutput for StdoutConsole {
    fn write(&self, args: core::fmt::Arguments<'_>) {
        let _guard = self.lock.lock().unwrap();
        print!("{}", args);
        let _ = io::stdout().flush();
    }

    fn prompt(&self) {
        let _guard = self.lock.lock().unwrap();
        print!("\r\n{}", PROMPT);
        let _ = io::stdout().flush();
    }
}

/// Framework sink parking requests in the capacity-1 mailbox.
struct SlotSink;

impl FrameworkSink for SlotSink {
    fn deliver(&self, _source: DeviceHandle, request: EventRequest, _context: CallingContext) {
        SLOT.post(request);
    }
}

/// Mock output-device task: owns the device state, answers requests.
fn device_task(router: &ResponseRouter<'_>) {
    let mut ir_brightness: u8 = 50;
    let mut white_brightness: u8 = 50;
    let mut volume: u8 = 60;
    let mut coffee: CoffeeType = CoffeeType::Americano;

    loop {
        let Some(request) = SLOT.take() else {
            thread::sleep(Duration::from_millis(5));
            continue;
        };

        // Simulated device latency.
        thread::sleep(Duration::from_millis(20));

        let payload = match request.id {
            EventId::GetIrLedBrightness => EventPayload::Brightness(ir_brightness),
            EventId::GetWhiteLedBrightness => EventPayload::Brightness(white_brightness),
            EventId::GetSpeakerVolume => EventPayload::Volume(volume),
            EventId::GetCoffeeType => EventPayload::Coffee(coffee),
            EventId::SetIrLedBrightness => {
                if let EventPayload::Brightness(v) = request.payload {
                    ir_brightness = v;
                }
                EventPayload::None
            }
            EventId::SetWhiteLedBrightness => {
                if let EventPayload::Brightness(v) = request.payload {
                    white_brightness = v;
                }
                EventPayload::None
            }
            EventId::SetSpeakerVolume => {
                if let EventPayload::Volume(v) = request.payload {
                    volume = v;
                }
                EventPayload::None
            }
            EventId::SetCoffeeType => {
                if let EventPayload::Coffee(t) = request.payload {
                    coffee = t;
                }
                EventPayload::None
            }
        };

        let response = EventResponse::new(payload);
        let _ = router.on_response(request.id.raw(), Some(&response), EventStatus::Ok, true);
    }
}

static SINK: SlotSink = SlotSink;

fn main() {
    let mut gate = DispatchGate::new(&PROVIDER, &TRACKER, &TRACE);
    gate.wire(&SINK);

    let router: &'static ResponseRouter<'static> =
        Box::leak(Box::new(ResponseRouter::new(&CONSOLE, &TRACKER, &TRACE)));
    thread::spawn(move || device_task(router));

    let shell = Shell::new(&CONSOLE, &gate, SHELL_DEVICE);
    shell.banner();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        // Error status already rendered by the shell.
        let _ = shell.handle_line(&line);
    }
}
