//! Simulated SoC for testing.
//!
//! [`MockSoc`] models the nRF52840 counting path closely enough to exercise
//! the composition logic on the host: pins with levels and pulls, GPIOTE
//! event channels, PPI routes and TIMER instances with capture registers.
//! Edges injected with [`MockSoc::pulse`] propagate purely through the
//! modelled hardware, so a count only moves if the whole chain is wired
//! and enabled.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::hal::{
    BitWidth, CounterHal, EdgeHal, EventId, Frequency, HalError, InstanceId, InterconnectHal,
    PinId, Polarity, Pull, TaskId,
};
use crate::registers::{
    gpiote_event_address, timer_count_task_address, GPIOTE_CHANNELS, PIN_COUNT, PPI_CHANNELS,
    TIMER_CC_REGISTERS, TIMER_INSTANCES,
};

#[derive(Debug, Clone, Copy)]
struct PinState {
    level: bool,
    pull: Pull,
    reject: bool,
    reject_enable: bool,
}

impl PinState {
    const INIT: Self = Self {
        level: false,
        pull: Pull::None,
        reject: false,
        reject_enable: false,
    };
}

#[derive(Debug, Clone, Copy)]
struct EventChannel {
    pin: PinId,
    polarity: Polarity,
    enabled: bool,
    interrupt: bool,
}

#[derive(Debug, Clone, Copy)]
struct Route {
    event: Option<EventId>,
    task: Option<TaskId>,
    enabled: bool,
    reject: bool,
}

impl Route {
    const INIT: Self = Self {
        event: None,
        task: None,
        enabled: false,
        reject: false,
    };
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    claimed: bool,
    counter_mode: bool,
    width: BitWidth,
    prescaler: u8,
    running: bool,
    count: u32,
    cc: [u32; TIMER_CC_REGISTERS],
    reject: bool,
}

impl Timer {
    const INIT: Self = Self {
        claimed: false,
        counter_mode: false,
        width: BitWidth::Bits32,
        prescaler: 0,
        running: false,
        count: 0,
        cc: [0; TIMER_CC_REGISTERS],
        reject: false,
    };
}

struct State {
    pins: [PinState; PIN_COUNT as usize],
    events: [Option<EventChannel>; GPIOTE_CHANNELS],
    routes: [Route; PPI_CHANNELS],
    timers: [Timer; TIMER_INSTANCES],
    after_capture: Option<(PinId, u32)>,
}

impl State {
    const fn new() -> Self {
        Self {
            pins: [PinState::INIT; PIN_COUNT as usize],
            events: [None; GPIOTE_CHANNELS],
            routes: [Route::INIT; PPI_CHANNELS],
            timers: [Timer::INIT; TIMER_INSTANCES],
            after_capture: None,
        }
    }

    fn event_slot(&self, pin: PinId) -> Option<usize> {
        self.events
            .iter()
            .position(|e| matches!(e, Some(e) if e.pin == pin))
    }

    fn toggle(&mut self, pin: PinId, times: u32) {
        for _ in 0..times {
            let level = !self.pins[pin as usize].level;
            self.transition(pin, level);
        }
    }

    fn transition(&mut self, pin: PinId, level: bool) {
        self.pins[pin as usize].level = level;

        let fired = self.events.iter().enumerate().find_map(|(slot, e)| match e {
            Some(e) if e.pin == pin && e.enabled && e.polarity.matches(level) => {
                Some(EventId::from_raw(gpiote_event_address(slot)))
            }
            _ => None,
        });

        if let Some(event) = fired {
            self.raise(event);
        }
    }

    fn raise(&mut self, event: EventId) {
        for i in 0..PPI_CHANNELS {
            let route = self.routes[i];
            if route.enabled && route.event == Some(event) {
                if let Some(task) = route.task {
                    self.trigger(task);
                }
            }
        }
    }

    fn trigger(&mut self, task: TaskId) {
        for (i, timer) in self.timers.iter_mut().enumerate() {
            if task.raw() == timer_count_task_address(i) && timer.running && timer.counter_mode {
                timer.count = timer.count.wrapping_add(1) & timer.width.mask();
            }
        }
    }
}

/// Simulated SoC implementing every hardware seam trait.
///
/// # Example
///
/// ```
/// use pulse_counter::mock::MockSoc;
/// use pulse_counter::{ChannelPool, EncoderConfig, EncoderDriver};
///
/// let soc = MockSoc::new();
/// let pool: ChannelPool<4> = ChannelPool::new();
/// let mut encoder = EncoderDriver::new("left", &soc, &pool);
/// encoder.init(EncoderConfig::new(3, 0)).unwrap();
///
/// soc.pulse(3, 5);
/// assert_eq!(encoder.read_and_reset(), Ok(5));
/// ```
pub struct MockSoc {
    state: Mutex<CriticalSectionRawMutex, RefCell<State>>,
}

impl Default for MockSoc {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoc {
    /// All pins low, nothing configured.
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(State::new())),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        self.state.lock(|state| f(&mut state.borrow_mut()))
    }

    // -----------------------------------------------------------------------
    // Signal injection
    // -----------------------------------------------------------------------

    /// Toggle `pin` `edges` times; every toggle is one physical edge.
    pub fn pulse(&self, pin: PinId, edges: u32) {
        self.with(|s| s.toggle(pin, edges));
    }

    /// Drive `pin` to `level`. Produces an edge only if the level changes.
    pub fn set_level(&self, pin: PinId, level: bool) {
        self.with(|s| {
            if s.pins[pin as usize].level != level {
                s.transition(pin, level);
            }
        });
    }

    pub fn level(&self, pin: PinId) -> bool {
        self.with(|s| s.pins[pin as usize].level)
    }

    /// Deliver `edges` toggles on `pin` right after the next capture latch,
    /// before control returns to the caller.
    pub fn inject_after_capture(&self, pin: PinId, edges: u32) {
        self.with(|s| s.after_capture = Some((pin, edges)));
    }

    // -----------------------------------------------------------------------
    // Fault injection (one-shot)
    // -----------------------------------------------------------------------

    /// Make the next `configure_input` on `pin` fail.
    pub fn reject_pin(&self, pin: PinId) {
        self.with(|s| s.pins[pin as usize].reject = true);
    }

    /// Make the next `enable_input` on `pin` fail.
    pub fn reject_enable(&self, pin: PinId) {
        self.with(|s| s.pins[pin as usize].reject_enable = true);
    }

    /// Make the next `configure_counter` on `instance` fail.
    pub fn reject_counter(&self, instance: InstanceId) {
        self.with(|s| s.timers[instance as usize].reject = true);
    }

    /// Make the next `assign_channel` on `channel` fail.
    pub fn reject_channel(&self, channel: u8) {
        self.with(|s| s.routes[channel as usize].reject = true);
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    /// Raw live count of a counter instance.
    pub fn counter_value(&self, instance: InstanceId) -> u32 {
        self.with(|s| s.timers[instance as usize].count)
    }

    pub fn counter_running(&self, instance: InstanceId) -> bool {
        self.with(|s| s.timers[instance as usize].running)
    }

    pub fn counter_claimed(&self, instance: InstanceId) -> bool {
        self.with(|s| s.timers[instance as usize].claimed)
    }

    pub fn counter_prescaler(&self, instance: InstanceId) -> u8 {
        self.with(|s| s.timers[instance as usize].prescaler)
    }

    pub fn channel_enabled(&self, channel: u8) -> bool {
        self.with(|s| s.routes[channel as usize].enabled)
    }

    /// Returns `true` if `pin` has an event channel that is raising events.
    pub fn input_enabled(&self, pin: PinId) -> bool {
        self.with(|s| {
            s.event_slot(pin)
                .and_then(|slot| s.events[slot])
                .is_some_and(|e| e.enabled)
        })
    }

    /// Returns `true` if the CPU interrupt for `pin`'s event is enabled.
    pub fn interrupt_enabled(&self, pin: PinId) -> bool {
        self.with(|s| {
            s.event_slot(pin)
                .and_then(|slot| s.events[slot])
                .is_some_and(|e| e.interrupt)
        })
    }

    pub fn pull(&self, pin: PinId) -> Pull {
        self.with(|s| s.pins[pin as usize].pull)
    }

    pub fn event_channels_in_use(&self) -> usize {
        self.with(|s| s.events.iter().filter(|e| e.is_some()).count())
    }
}

impl EdgeHal for MockSoc {
    fn configure_input(
        &self,
        pin: PinId,
        pull: Pull,
        polarity: Polarity,
    ) -> Result<EventId, HalError> {
        if pin >= PIN_COUNT {
            return Err(HalError::InvalidPin);
        }
        self.with(|s| {
            if core::mem::take(&mut s.pins[pin as usize].reject) {
                return Err(HalError::Rejected);
            }
            if s.event_slot(pin).is_some() {
                return Err(HalError::PinInUse);
            }
            let slot = s
                .events
                .iter()
                .position(Option::is_none)
                .ok_or(HalError::NoEventChannel)?;

            s.pins[pin as usize].pull = pull;
            s.events[slot] = Some(EventChannel {
                pin,
                polarity,
                enabled: false,
                interrupt: false,
            });
            Ok(EventId::from_raw(gpiote_event_address(slot)))
        })
    }

    fn enable_input(&self, pin: PinId) -> Result<(), HalError> {
        self.with(|s| {
            let slot = s.event_slot(pin).ok_or(HalError::InvalidPin)?;
            if core::mem::take(&mut s.pins[pin as usize].reject_enable) {
                return Err(HalError::Rejected);
            }
            if let Some(e) = s.events[slot].as_mut() {
                e.enabled = true;
                e.interrupt = false;
            }
            Ok(())
        })
    }

    fn disable_input(&self, pin: PinId) {
        self.with(|s| {
            if let Some(slot) = s.event_slot(pin) {
                s.events[slot] = None;
            }
        });
    }
}

impl CounterHal for MockSoc {
    fn configure_counter(
        &self,
        instance: InstanceId,
        width: BitWidth,
        frequency: Frequency,
    ) -> Result<TaskId, HalError> {
        let index = instance as usize;
        if index >= TIMER_INSTANCES {
            return Err(HalError::InvalidInstance);
        }
        self.with(|s| {
            let timer = &mut s.timers[index];
            if core::mem::take(&mut timer.reject) {
                return Err(HalError::Rejected);
            }
            if timer.claimed {
                return Err(HalError::InstanceInUse);
            }
            *timer = Timer {
                claimed: true,
                counter_mode: true,
                width,
                prescaler: frequency.prescaler(),
                ..Timer::INIT
            };
            Ok(TaskId::from_raw(timer_count_task_address(index)))
        })
    }

    fn start_counter(&self, instance: InstanceId) {
        self.with(|s| {
            if let Some(timer) = s.timers.get_mut(instance as usize) {
                timer.running = timer.claimed;
            }
        });
    }

    fn stop_counter(&self, instance: InstanceId) {
        self.with(|s| {
            if let Some(timer) = s.timers.get_mut(instance as usize) {
                timer.running = false;
                timer.claimed = false;
            }
        });
    }

    fn capture_counter(&self, instance: InstanceId, cc: u8) -> u32 {
        self.with(|s| {
            let Some(timer) = s.timers.get_mut(instance as usize) else {
                return 0;
            };
            let cc = cc as usize % TIMER_CC_REGISTERS;
            timer.cc[cc] = timer.count;
            let latched = timer.cc[cc];

            if let Some((pin, edges)) = s.after_capture.take() {
                s.toggle(pin, edges);
            }
            latched
        })
    }

    fn clear_counter(&self, instance: InstanceId) {
        self.with(|s| {
            if let Some(timer) = s.timers.get_mut(instance as usize) {
                timer.count = 0;
            }
        });
    }
}

impl InterconnectHal for MockSoc {
    fn assign_channel(&self, channel: u8, event: EventId, task: TaskId) -> Result<(), HalError> {
        let index = channel as usize;
        if index >= PPI_CHANNELS {
            return Err(HalError::InvalidChannel);
        }
        self.with(|s| {
            let route = &mut s.routes[index];
            if core::mem::take(&mut route.reject) {
                return Err(HalError::Rejected);
            }
            *route = Route {
                event: Some(event),
                task: Some(task),
                enabled: false,
                reject: false,
            };
            Ok(())
        })
    }

    fn enable_channel(&self, channel: u8) {
        self.with(|s| {
            if let Some(route) = s.routes.get_mut(channel as usize) {
                route.enabled = true;
            }
        });
    }

    fn disable_channel(&self, channel: u8) {
        self.with(|s| {
            if let Some(route) = s.routes.get_mut(channel as usize) {
                route.enabled = false;
            }
        });
    }
}
