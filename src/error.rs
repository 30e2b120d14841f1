//! Error types for the pulse counter.

use core::fmt;

use crate::hal::HalError;

/// Peripheral that rejected its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Peripheral {
    EdgeSource,
    PulseCounter,
    Interconnect,
}

/// Errors surfaced by channel allocation, initialisation and reads.
///
/// None of these are retried internally: hardware misconfiguration is not
/// transient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderError {
    /// Every interconnect channel in the pool is allocated.
    ResourceExhausted,

    /// A peripheral rejected its configuration (pin conflict, bad instance, ...).
    PeripheralInitFailed {
        peripheral: Peripheral,
        cause: HalError,
    },

    /// Binding attempted on a channel the pool does not hold as allocated.
    InvalidChannel,

    /// Released a channel that is not currently allocated.
    DoubleRelease,

    /// Read attempted before a successful `init()`, or after a fault.
    NotArmed,

    /// `init()` called on an instance that is already armed.
    AlreadyArmed,

    /// More encoder descriptors than the instance table can hold.
    TableFull,
}

impl EncoderError {
    pub(crate) fn peripheral(peripheral: Peripheral) -> impl FnOnce(HalError) -> Self {
        move |cause| EncoderError::PeripheralInitFailed { peripheral, cause }
    }
}

impl fmt::Display for EncoderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EncoderError::ResourceExhausted => write!(f, "No free interconnect channel"),
            EncoderError::PeripheralInitFailed { peripheral, cause } => {
                write!(f, "{:?} init failed: {:?}", peripheral, cause)
            }
            EncoderError::InvalidChannel => write!(f, "Channel is not allocated"),
            EncoderError::DoubleRelease => write!(f, "Channel released twice"),
            EncoderError::NotArmed => write!(f, "Encoder is not armed"),
            EncoderError::AlreadyArmed => write!(f, "Encoder is already armed"),
            EncoderError::TableFull => write!(f, "Encoder table is full"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for EncoderError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            EncoderError::ResourceExhausted => defmt::write!(f, "No free interconnect channel"),
            EncoderError::PeripheralInitFailed { peripheral, cause } => {
                defmt::write!(f, "{} init failed: {}", peripheral, cause)
            }
            EncoderError::InvalidChannel => defmt::write!(f, "Channel is not allocated"),
            EncoderError::DoubleRelease => defmt::write!(f, "Channel released twice"),
            EncoderError::NotArmed => defmt::write!(f, "Encoder is not armed"),
            EncoderError::AlreadyArmed => defmt::write!(f, "Encoder is already armed"),
            EncoderError::TableFull => defmt::write!(f, "Encoder table is full"),
        }
    }
}
