//! Event-to-task bindings through interconnect channels.
//!
//! The interconnect never allocates channels. It only accepts a channel the
//! pool holds as allocated, and the resulting [`Binding`] owns that channel
//! until it is unbound, so at most one binding can reference a channel.

use crate::channel::{Channel, ChannelAllocator};
use crate::error::{EncoderError, Peripheral};
use crate::hal::{EventId, InterconnectHal, TaskId};

/// One event wired to one task through one channel.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Binding {
    channel: Channel,
    event: EventId,
    task: TaskId,
    enabled: bool,
}

/// Route `event` to `task` through `channel`. The binding starts disabled.
///
/// On failure the channel is handed back alongside the error so the caller
/// can release it.
///
/// # Errors
/// * [`EncoderError::InvalidChannel`] if `allocator` does not hold the
///   channel as allocated
/// * [`EncoderError::PeripheralInitFailed`] if the hardware rejects the route
pub fn bind<H, A>(
    hal: &H,
    allocator: &A,
    channel: Channel,
    event: EventId,
    task: TaskId,
) -> Result<Binding, (EncoderError, Channel)>
where
    H: InterconnectHal,
    A: ChannelAllocator + ?Sized,
{
    if !allocator.is_allocated(&channel) {
        return Err((EncoderError::InvalidChannel, channel));
    }

    if let Err(cause) = hal.assign_channel(channel.id(), event, task) {
        let err = EncoderError::PeripheralInitFailed {
            peripheral: Peripheral::Interconnect,
            cause,
        };
        return Err((err, channel));
    }

    Ok(Binding {
        channel,
        event,
        task,
        enabled: false,
    })
}

impl Binding {
    /// Start routing. From here on no software is involved per edge.
    pub fn enable<H: InterconnectHal>(&mut self, hal: &H) {
        hal.enable_channel(self.channel.id());
        self.enabled = true;
    }

    pub fn disable<H: InterconnectHal>(&mut self, hal: &H) {
        hal.disable_channel(self.channel.id());
        self.enabled = false;
    }

    /// Disable the route and hand back the channel for release.
    pub fn unbind<H: InterconnectHal>(mut self, hal: &H) -> Channel {
        if self.enabled {
            self.disable(hal);
        }
        self.channel
    }

    pub fn channel_id(&self) -> u8 {
        self.channel.id()
    }

    pub fn event(&self) -> EventId {
        self.event
    }

    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
