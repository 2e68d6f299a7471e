//! Event identifiers, payloads and statuses exchanged with framework tasks.
//!
//! Every console command is translated into exactly one event. Events come
//! in families: one GET/SET identifier pair sharing a payload shape.
//! Responses travel back with the same identifier, so the identifier is the
//! only correlation key between a command and its asynchronous answer.

/// Framework task identifiers, used as bit positions in a [`ReceiverMask`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TaskId {
    /// Output device task (LEDs, speaker, brewing unit).
    Output = 0,
    /// Display task.
    Display = 1,
    /// Audio processing task.
    Audio = 2,
}

/// Bitset selecting which framework task(s) receive a dispatched request.
///
/// This build always targets a single task, but the mask supports multiple
/// bits so a request can be fanned out later without changing the wire shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiverMask(u32);

impl ReceiverMask {
    /// Empty mask (no receivers).
    pub const EMPTY: Self = Self(0);

    /// Mask with a single receiver.
    #[inline]
    pub const fn only(task: TaskId) -> Self {
        Self(1 << task as u32)
    }

    /// Add another receiver to the mask.
    #[inline]
    pub const fn with(self, task: TaskId) -> Self {
        Self(self.0 | (1 << task as u32))
    }

    /// Check whether a task is selected.
    #[inline]
    pub const fn contains(self, task: TaskId) -> bool {
        self.0 & (1 << task as u32) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Raw bit representation.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

/// Event family: a GET/SET identifier pair sharing one payload shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EventFamily {
    IrLed = 0,
    WhiteLed = 1,
    SpeakerVolume = 2,
    CoffeeType = 3,
}

/// Number of event families known to this build.
pub const FAMILY_COUNT: usize = 4;

impl EventFamily {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IrLed => "ir_led",
            Self::WhiteLed => "white_led",
            Self::SpeakerVolume => "volume",
            Self::CoffeeType => "coffee_type",
        }
    }

    /// All families, for diagnostics listings.
    pub const ALL: [Self; FAMILY_COUNT] = [
        Self::IrLed,
        Self::WhiteLed,
        Self::SpeakerVolume,
        Self::CoffeeType,
    ];
}

/// Typed event identifiers this console build knows how to issue and render.
///
/// The framework side deals in raw `u32` identifiers; responses carrying an
/// identifier outside this set are ignored by the router.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum EventId {
    GetIrLedBrightness = 1,
    SetIrLedBrightness = 2,
    GetWhiteLedBrightness = 3,
    SetWhiteLedBrightness = 4,
    GetSpeakerVolume = 5,
    SetSpeakerVolume = 6,
    GetCoffeeType = 7,
    SetCoffeeType = 8,
}

impl EventId {
    /// Raw identifier as carried on the framework boundary.
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Decode a raw identifier; `None` for events this build does not know.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(Self::GetIrLedBrightness),
            2 => Some(Self::SetIrLedBrightness),
            3 => Some(Self::GetWhiteLedBrightness),
            4 => Some(Self::SetWhiteLedBrightness),
            5 => Some(Self::GetSpeakerVolume),
            6 => Some(Self::SetSpeakerVolume),
            7 => Some(Self::GetCoffeeType),
            8 => Some(Self::SetCoffeeType),
            _ => None,
        }
    }

    /// Family this identifier belongs to.
    pub const fn family(self) -> EventFamily {
        match self {
            Self::GetIrLedBrightness | Self::SetIrLedBrightness => EventFamily::IrLed,
            Self::GetWhiteLedBrightness | Self::SetWhiteLedBrightness => EventFamily::WhiteLed,
            Self::GetSpeakerVolume | Self::SetSpeakerVolume => EventFamily::SpeakerVolume,
            Self::GetCoffeeType | Self::SetCoffeeType => EventFamily::CoffeeType,
        }
    }

    /// True for the GET half of a family pair.
    pub const fn is_get(self) -> bool {
        matches!(
            self,
            Self::GetIrLedBrightness
                | Self::GetWhiteLedBrightness
                | Self::GetSpeakerVolume
                | Self::GetCoffeeType
        )
    }
}

/// Beverage selection for the `coffee_type` command.
///
/// String mapping is case-sensitive; anything outside this set is rejected
/// before a request is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CoffeeType {
    Americano = 0,
    Cappuccino = 1,
    Espresso = 2,
    Latte = 3,
}

impl CoffeeType {
    /// Parse the console literal. Exact match only.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "americano" => Some(Self::Americano),
            "cappuccino" => Some(Self::Cappuccino),
            "espresso" => Some(Self::Espresso),
            "latte" => Some(Self::Latte),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Americano => "americano",
            Self::Cappuccino => "cappuccino",
            Self::Espresso => "espresso",
            Self::Latte => "latte",
        }
    }
}

/// Event payload, tagged per family.
///
/// GET requests carry `None`; the framework fills the family value into the
/// response payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventPayload {
    None,
    /// LED brightness percentage, 0..=100.
    Brightness(u8),
    /// Speaker volume percentage, 0..=100.
    Volume(u8),
    Coffee(CoffeeType),
}

/// Status reported by a framework task for one response part.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EventStatus {
    Ok = 0,
    Error = 1,
    /// Operation accepted but still running; more parts may follow.
    NonBlocking = 2,
}

/// One response part delivered by a framework task.
///
/// Read synchronously inside the router callback and then discarded; the
/// core never retains it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventResponse {
    pub payload: EventPayload,
}

impl EventResponse {
    pub const fn new(payload: EventPayload) -> Self {
        Self { payload }
    }

    /// Response with no payload (typical for SET acknowledgements).
    pub const EMPTY: Self = Self {
        payload: EventPayload::None,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_raw_round_trip() {
        for raw in 1..=8u32 {
            let id = EventId::from_raw(raw).unwrap();
            assert_eq!(id.raw(), raw);
        }
        assert_eq!(EventId::from_raw(0), None);
        assert_eq!(EventId::from_raw(9), None);
        assert_eq!(EventId::from_raw(0xDEAD), None);
    }

    #[test]
    fn test_family_pairing() {
        assert_eq!(
            EventId::GetSpeakerVolume.family(),
            EventId::SetSpeakerVolume.family()
        );
        assert_eq!(
            EventId::GetCoffeeType.family(),
            EventId::SetCoffeeType.family()
        );
        assert!(EventId::GetIrLedBrightness.is_get());
        assert!(!EventId::SetIrLedBrightness.is_get());
    }

    #[test]
    fn test_coffee_type_names() {
        let all = ["americano", "cappuccino", "espresso", "latte"];
        for name in all {
            let t = CoffeeType::from_name(name).unwrap();
            assert_eq!(t.as_str(), name);
        }
        assert_eq!(CoffeeType::from_name("mocha"), None);
        // Case-sensitive by contract
        assert_eq!(CoffeeType::from_name("Latte"), None);
    }

    #[test]
    fn test_receiver_mask() {
        let mask = ReceiverMask::only(TaskId::Output);
        assert!(mask.contains(TaskId::Output));
        assert!(!mask.contains(TaskId::Display));

        let multi = mask.with(TaskId::Display);
        assert!(multi.contains(TaskId::Output));
        assert!(multi.contains(TaskId::Display));
        assert!(!ReceiverMask::EMPTY.contains(TaskId::Output));
    }
}
