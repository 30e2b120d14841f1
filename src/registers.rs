//! nRF52840 peripheral topology and register constants.
//!
//! Shared by the register-level backend and the simulated SoC so both
//! expose the same resource counts and endpoint identifiers. Event and task
//! identifiers are the absolute addresses of the corresponding registers,
//! which is exactly what the PPI `EEP`/`TEP` registers expect.

// ---------------------------------------------------------------------------
// Resource counts
// ---------------------------------------------------------------------------

/// Number of addressable GPIO pins (P0.00–P0.31, P1.00–P1.15).
pub const PIN_COUNT: u8 = 48;

/// Number of GPIOTE channels usable as edge-event sources.
pub const GPIOTE_CHANNELS: usize = 8;

/// Number of programmable PPI channels.
pub const PPI_CHANNELS: usize = 20;

/// Number of TIMER instances.
pub const TIMER_INSTANCES: usize = 5;

/// Capture/compare registers per TIMER instance (TIMER0–2 wire up only the
/// first four; TIMER3–4 have all six).
pub const TIMER_CC_REGISTERS: usize = 6;

/// Capture/compare register used to latch the pulse count.
pub const CAPTURE_CC: u8 = 0;

// ---------------------------------------------------------------------------
// Base addresses
// ---------------------------------------------------------------------------

/// GPIOTE base address.
pub const GPIOTE_BASE: u32 = 0x4000_6000;

/// TIMER0–TIMER4 base addresses, indexed by instance id.
pub const TIMER_BASE: [u32; TIMER_INSTANCES] = [
    0x4000_8000,
    0x4000_9000,
    0x4000_A000,
    0x4001_A000,
    0x4001_B000,
];

// ---------------------------------------------------------------------------
// Register offsets
// ---------------------------------------------------------------------------

/// GPIOTE `EVENTS_IN[0]` offset; channel `n` lives at `+ 4 * n`.
pub const GPIOTE_EVENTS_IN: u32 = 0x100;

/// TIMER `TASKS_COUNT` offset.
pub const TIMER_TASKS_COUNT: u32 = 0x008;

/// Address of the GPIOTE `EVENTS_IN[channel]` register.
pub const fn gpiote_event_address(channel: usize) -> u32 {
    GPIOTE_BASE + GPIOTE_EVENTS_IN + 4 * channel as u32
}

/// Address of the `TASKS_COUNT` register of a TIMER instance.
pub const fn timer_count_task_address(instance: usize) -> u32 {
    TIMER_BASE[instance] + TIMER_TASKS_COUNT
}

// ---------------------------------------------------------------------------
// Field encodings
// ---------------------------------------------------------------------------

/// GPIOTE `CONFIG.MODE`: disabled.
pub const GPIOTE_MODE_DISABLED: u32 = 0;
/// GPIOTE `CONFIG.MODE`: event.
pub const GPIOTE_MODE_EVENT: u32 = 1;
/// GPIOTE `CONFIG.PSEL` bit position.
pub const GPIOTE_PSEL_POS: u32 = 8;
/// GPIOTE `CONFIG.PORT` bit position.
pub const GPIOTE_PORT_POS: u32 = 13;
/// GPIOTE `CONFIG.POLARITY` bit position.
pub const GPIOTE_POLARITY_POS: u32 = 16;

/// GPIO `PIN_CNF.PULL` bit position (0 = disabled, 1 = down, 3 = up).
pub const GPIO_PULL_POS: u32 = 2;

/// TIMER `MODE`: counter.
pub const TIMER_MODE_COUNTER: u32 = 1;

/// TIMER `PRESCALER` maximum value.
pub const TIMER_PRESCALER_MAX: u8 = 9;
