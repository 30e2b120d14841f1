//! Sensor-style front end over an [`EncoderDriver`].
//!
//! Splits a read into the usual two halves: `sample_fetch` pulls a delta
//! out of the hardware, `channel_get` returns the value of the last fetch.
//! Fetching is the only operation that resets the count.

use crate::channel::ChannelAllocator;
use crate::driver::{DriverState, EncoderDriver};
use crate::error::EncoderError;
use crate::hal::Soc;

/// Channels an encoder sensor reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorChannel {
    /// Position delta: edges counted during the last fetch interval.
    PosDy,
    /// Every channel the sensor has. For an encoder that is `PosDy` alone.
    All,
}

/// Polling cadence for encoder sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Time between fetches in milliseconds.
    pub period_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { period_ms: 1000 }
    }
}

/// An encoder driver plus the result of its last fetch.
pub struct EncoderSensor<'a, H, A: ?Sized> {
    driver: EncoderDriver<'a, H, A>,
    latest: i32,
    total: i64,
    fetches: u32,
}

impl<'a, H, A> EncoderSensor<'a, H, A>
where
    H: Soc,
    A: ChannelAllocator + ?Sized,
{
    pub fn new(driver: EncoderDriver<'a, H, A>) -> Self {
        Self {
            driver,
            latest: 0,
            total: 0,
            fetches: 0,
        }
    }

    /// Read and reset the hardware count and keep the delta.
    ///
    /// # Errors
    /// [`EncoderError::NotArmed`] if the driver is not armed. The previous
    /// sample is kept.
    pub fn sample_fetch(&mut self) -> Result<i32, EncoderError> {
        let delta = self.driver.read_and_reset()?;
        self.latest = delta;
        self.total = self.total.wrapping_add(i64::from(delta));
        self.fetches = self.fetches.wrapping_add(1);
        Ok(delta)
    }

    /// Value of `channel` as of the last fetch. Does not touch hardware.
    ///
    /// # Errors
    /// [`EncoderError::NotArmed`] if the driver is not armed.
    pub fn channel_get(&self, channel: SensorChannel) -> Result<i32, EncoderError> {
        if !self.driver.is_ready() {
            return Err(EncoderError::NotArmed);
        }
        match channel {
            SensorChannel::PosDy | SensorChannel::All => Ok(self.latest),
        }
    }

    /// Sum of every delta fetched so far.
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn fetches(&self) -> u32 {
        self.fetches
    }

    pub fn name(&self) -> &'static str {
        self.driver.name()
    }

    pub fn state(&self) -> DriverState {
        self.driver.state()
    }

    pub fn is_ready(&self) -> bool {
        self.driver.is_ready()
    }

    pub fn driver(&self) -> &EncoderDriver<'a, H, A> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut EncoderDriver<'a, H, A> {
        &mut self.driver
    }
}
