//! Execution-context classification for dispatch.
//!
//! The dispatch gate tags every forwarded request with the context it was
//! issued from, so the receiving task can pick an interrupt-safe delivery
//! primitive (non-blocking queue send) over a blocking one. The gate only
//! classifies; it never makes that choice itself.

/// Whether dispatch was invoked from interrupt or task execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallingContext {
    Task,
    Interrupt,
}

impl CallingContext {
    #[inline]
    pub const fn is_interrupt(self) -> bool {
        matches!(self, Self::Interrupt)
    }
}

/// Source of the current calling context.
///
/// Injected into the dispatch gate so hosted builds and tests get a
/// constant answer while the target build reads the processor state.
/// Implementations must be pure, fast and non-blocking; the gate may call
/// them from interrupt context.
pub trait ContextProvider: Sync {
    fn current(&self) -> CallingContext;
}

/// Default provider: asks the platform for the active-interrupt state.
///
/// On the ESP32 target this reads the port ISR flag; everywhere else
/// (hosted builds, tests) dispatch always happens from task context.
pub struct ActiveInterruptProvider;

impl ContextProvider for ActiveInterruptProvider {
    #[inline]
    fn current(&self) -> CallingContext {
        #[cfg(all(not(test), target_arch = "xtensa"))]
        {
            // SAFETY: xPortInIsrContext is always safe to call.
            let in_isr = unsafe { esp_idf_svc::sys::xPortInIsrContext() != 0 };
            if in_isr {
                return CallingContext::Interrupt;
            }
            CallingContext::Task
        }

        #[cfg(any(test, not(target_arch = "xtensa")))]
        {
            CallingContext::Task
        }
    }
}

/// Fixed-answer provider for tests and simulations.
pub struct FixedContext(pub CallingContext);

impl ContextProvider for FixedContext {
    #[inline]
    fn current(&self) -> CallingContext {
        self.0
    }
}
