//! Hardware pulse counting for encoder pins.
//!
//! Counts edges on an input pin entirely in hardware: an edge-event source
//! raises an event on every transition, an interconnect channel carries it
//! to a counter's COUNT task, and the counter increments. No CPU interrupt
//! is involved per edge, so counting is unaffected by CPU load. Software
//! touches the chain only to set it up and to read "edges since last read".
//!
//! # Architecture
//!
//! - **[`ChannelPool`]**: the shared, finite pool of interconnect channels.
//! - **[`EdgeSource`]**, **[`PulseCounter`]**, **[`Binding`]**: one
//!   peripheral each, generic over the [`hal`] traits.
//! - **[`EncoderDriver`]**: runs the init sequence with full rollback and
//!   exposes [`read_and_reset`](EncoderDriver::read_and_reset).
//! - **[`EncoderSensor`]** / **[`EncoderTable`]**: fetch/get front end and
//!   a fixed table built from static descriptors.
//!
//! # Quick start
//!
//! ```ignore
//! use pulse_counter::{ChannelPool, EncoderConfig, EncoderDriver, NrfSoc};
//!
//! static CHANNELS: ChannelPool<20> = ChannelPool::new();
//!
//! let soc = unsafe { NrfSoc::steal() };
//! let mut left = EncoderDriver::new("encoder_left", &soc, &CHANNELS);
//! left.init(EncoderConfig::new(3, 1))?;
//!
//! let delta = left.read_and_reset()?;
//! ```
//!
//! # Features
//!
//! - **`defmt`**: structured logging and [`defmt::Format`] on public types.
//! - **`nrf52840`**: register-level backend ([`NrfSoc`]).
//! - **`task`**: [`encoder_poll_task`], an async poll loop on `embassy-time`.
//! - **`mock`**: [`mock::MockSoc`], a simulated SoC for host-side tests.

#![no_std]

// Must come first so the logging macros are visible in every module.
mod fmt;

pub mod channel;
pub mod counter;
pub mod driver;
pub mod edge;
pub mod error;
pub mod hal;
pub mod interconnect;
pub mod registers;
pub mod registry;
pub mod sensor;

#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(feature = "nrf52840")]
pub mod nrf;
#[cfg(feature = "task")]
pub mod task;

// ── Re-exports for convenience ───────────────────────────────────────────

pub use channel::{Channel, ChannelAllocator, ChannelPool};
pub use counter::PulseCounter;
pub use driver::{DriverState, EncoderConfig, EncoderDriver};
pub use edge::EdgeSource;
pub use error::{EncoderError, Peripheral};
pub use hal::{BitWidth, Frequency, HalError, Pull, Soc};
pub use interconnect::{bind, Binding};
#[cfg(feature = "nrf52840")]
pub use nrf::NrfSoc;
pub use registry::{EncoderDescriptor, EncoderTable};
pub use sensor::{EncoderSensor, PollConfig, SensorChannel};
#[cfg(feature = "task")]
pub use task::{encoder_poll_task, SharedTable};
