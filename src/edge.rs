//! Edge-event source on a single input pin.
//!
//! Always senses both edges (toggle polarity); the pull configuration is the
//! only caller choice. Events are consumed by the interconnect, so enabling
//! the source never touches the interrupt path.

use crate::error::{EncoderError, Peripheral};
use crate::hal::{EdgeHal, EventId, PinId, Polarity, Pull};

/// A configured edge detector and the event it raises.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EdgeSource {
    pin: PinId,
    pull: Pull,
    event: EventId,
    enabled: bool,
}

impl EdgeSource {
    /// Polarity every edge source is configured with.
    pub const POLARITY: Polarity = Polarity::Toggle;

    /// Configure `pin` as a toggle-sensing event source.
    ///
    /// # Errors
    /// [`EncoderError::PeripheralInitFailed`] if the pin does not exist, is
    /// already in use, or no event channel is free.
    pub fn configure<H: EdgeHal>(hal: &H, pin: PinId, pull: Pull) -> Result<Self, EncoderError> {
        let event = hal
            .configure_input(pin, pull, Self::POLARITY)
            .map_err(EncoderError::peripheral(Peripheral::EdgeSource))?;

        Ok(Self {
            pin,
            pull,
            event,
            enabled: false,
        })
    }

    /// Arm the detector.
    pub fn enable<H: EdgeHal>(&mut self, hal: &H) -> Result<(), EncoderError> {
        hal.enable_input(self.pin)
            .map_err(EncoderError::peripheral(Peripheral::EdgeSource))?;
        self.enabled = true;
        Ok(())
    }

    /// Disarm the detector and give back its event channel.
    pub fn disable<H: EdgeHal>(&mut self, hal: &H) {
        hal.disable_input(self.pin);
        self.enabled = false;
    }

    /// Interconnect source endpoint.
    pub fn event(&self) -> EventId {
        self.event
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn pull(&self) -> Pull {
        self.pull
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
