//! Hardware seam.
//!
//! The counting path is pin → edge-event channel → interconnect channel →
//! counter task. Each hop is one trait so the composition logic above it
//! runs unchanged on the register-level backend and on the simulated SoC.
//!
//! All methods take `&self`: several encoder instances share one SoC, so
//! backends are expected to use volatile register access or interior
//! mutability.

/// GPIO pin number, counted across ports (`port * 32 + pin`).
pub type PinId = u8;

/// Counter peripheral instance number (TIMER0 = 0, ...).
pub type InstanceId = u8;

/// Input pull configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating input.
    #[default]
    None,
    /// Pull-up resistor enabled.
    Up,
    /// Pull-down resistor enabled.
    Down,
}

/// Which transitions raise the edge event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Rising edge only.
    LoToHi,
    /// Falling edge only.
    HiToLo,
    /// Either edge.
    Toggle,
}

impl Polarity {
    /// Returns `true` if a transition to `level` raises the event.
    pub fn matches(self, level: bool) -> bool {
        match self {
            Polarity::LoToHi => level,
            Polarity::HiToLo => !level,
            Polarity::Toggle => true,
        }
    }
}

/// Counter width. The raw count wraps modulo `2^bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitWidth {
    Bits16,
    Bits24,
    #[default]
    Bits32,
}

impl BitWidth {
    /// Width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            BitWidth::Bits16 => 16,
            BitWidth::Bits24 => 24,
            BitWidth::Bits32 => 32,
        }
    }

    /// Mask selecting the valid bits of a raw count.
    pub const fn mask(self) -> u32 {
        match self {
            BitWidth::Bits16 => 0xFFFF,
            BitWidth::Bits24 => 0x00FF_FFFF,
            BitWidth::Bits32 => u32::MAX,
        }
    }
}

/// Timer base frequency (`16 MHz / 2^prescaler`).
///
/// Has no effect in counter mode, where the count advances only on the
/// COUNT task, but it is still programmed so the peripheral is left in a
/// known state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frequency {
    #[default]
    F16MHz,
    F8MHz,
    F4MHz,
    F2MHz,
    F1MHz,
    F500kHz,
    F250kHz,
    F125kHz,
    F62500Hz,
    F31250Hz,
}

impl Frequency {
    /// Value for the TIMER `PRESCALER` register.
    pub const fn prescaler(self) -> u8 {
        self as u8
    }
}

/// Opaque identifier of a hardware event (interconnect source endpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventId(u32);

impl EventId {
    /// Wrap a backend-specific identifier (on nRF: the event register address).
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Opaque identifier of a hardware task (interconnect target endpoint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(u32);

impl TaskId {
    /// Wrap a backend-specific identifier (on nRF: the task register address).
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Rejections reported by a hardware backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// Pin number does not exist on this device.
    InvalidPin,
    /// Pin is already driving another edge-event channel.
    PinInUse,
    /// All edge-event channels are taken.
    NoEventChannel,
    /// Counter instance does not exist.
    InvalidInstance,
    /// Counter instance is already configured by someone else.
    InstanceInUse,
    /// Interconnect channel number does not exist.
    InvalidChannel,
    /// Peripheral refused the configuration.
    Rejected,
}

/// Edge-triggered event generation on an input pin.
pub trait EdgeHal {
    /// Configure `pin` as an input and reserve an event channel for it.
    ///
    /// Event generation stays off until [`enable_input`](Self::enable_input).
    fn configure_input(&self, pin: PinId, pull: Pull, polarity: Polarity)
        -> Result<EventId, HalError>;

    /// Start raising events for `pin`. Never enables the CPU interrupt path.
    fn enable_input(&self, pin: PinId) -> Result<(), HalError>;

    /// Stop raising events for `pin` and free its event channel.
    fn disable_input(&self, pin: PinId);
}

/// Counter peripheral operated in external-count mode.
pub trait CounterHal {
    /// Put `instance` in counter mode with the given width and zero its count.
    ///
    /// Returns the identifier of its COUNT task.
    fn configure_counter(
        &self,
        instance: InstanceId,
        width: BitWidth,
        frequency: Frequency,
    ) -> Result<TaskId, HalError>;

    /// Start accepting COUNT tasks.
    fn start_counter(&self, instance: InstanceId);

    /// Stop the instance and release it.
    fn stop_counter(&self, instance: InstanceId);

    /// Latch the live count into capture register `cc` and return it.
    /// Counting continues during the latch.
    fn capture_counter(&self, instance: InstanceId, cc: u8) -> u32;

    /// Reset the live count to zero.
    fn clear_counter(&self, instance: InstanceId);
}

/// Programmable event-to-task interconnect.
pub trait InterconnectHal {
    /// Route `event` to `task` through `channel`. The channel stays disabled.
    fn assign_channel(&self, channel: u8, event: EventId, task: TaskId) -> Result<(), HalError>;

    fn enable_channel(&self, channel: u8);

    fn disable_channel(&self, channel: u8);
}

/// A device providing every hop of the counting path.
pub trait Soc: EdgeHal + CounterHal + InterconnectHal {}

impl<T: EdgeHal + CounterHal + InterconnectHal> Soc for T {}
