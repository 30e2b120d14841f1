//! Counter peripheral in external-count mode.
//!
//! The count advances only on COUNT tasks delivered by the interconnect.
//! Software never writes a count value; it can only latch the live count
//! (capture) and move the zero point (clear).
//!
//! # Capture and clear
//!
//! A hardware CLEAR after a capture would wipe any edge that lands between
//! the two register writes. Instead the hardware CLEAR task is issued once
//! at configure time, and [`PulseCounter::clear`] moves the zero point to
//! the last latched value. The live register keeps counting across a read,
//! so an edge arriving after the latch shows up in the next delta. Deltas
//! are computed modulo `2^width`, which makes hardware wraparound
//! invisible as long as fewer than `2^31` edges arrive between reads.

use crate::error::{EncoderError, Peripheral};
use crate::hal::{BitWidth, CounterHal, Frequency, InstanceId, TaskId};
use crate::registers::CAPTURE_CC;

/// A configured counter instance and the task that increments it.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseCounter {
    instance: InstanceId,
    width: BitWidth,
    task: TaskId,
    /// Raw value of the last capture.
    latched: u32,
    /// Raw value that reads as zero.
    zero: u32,
    /// Delta computed by the last capture.
    snapshot: i32,
    running: bool,
}

impl PulseCounter {
    /// Put `instance` in counter mode and zero it.
    ///
    /// # Errors
    /// [`EncoderError::PeripheralInitFailed`] if the instance does not exist
    /// or is already claimed.
    pub fn configure<H: CounterHal>(
        hal: &H,
        instance: InstanceId,
        width: BitWidth,
        frequency: Frequency,
    ) -> Result<Self, EncoderError> {
        let task = hal
            .configure_counter(instance, width, frequency)
            .map_err(EncoderError::peripheral(Peripheral::PulseCounter))?;

        Ok(Self {
            instance,
            width,
            task,
            latched: 0,
            zero: 0,
            snapshot: 0,
            running: false,
        })
    }

    /// Start accepting COUNT tasks.
    pub fn enable<H: CounterHal>(&mut self, hal: &H) {
        hal.start_counter(self.instance);
        self.running = true;
    }

    /// Stop the instance and release it.
    pub fn disable<H: CounterHal>(&mut self, hal: &H) {
        hal.stop_counter(self.instance);
        self.running = false;
    }

    /// Latch the live count and return the number of edges since the last
    /// [`clear`](Self::clear). Counting is not paused.
    pub fn capture<H: CounterHal>(&mut self, hal: &H) -> i32 {
        self.latched = hal.capture_counter(self.instance, CAPTURE_CC) & self.width.mask();
        self.snapshot = (self.latched.wrapping_sub(self.zero) & self.width.mask()) as i32;
        self.snapshot
    }

    /// Delta returned by the last [`capture`](Self::capture).
    pub fn snapshot(&self) -> i32 {
        self.snapshot
    }

    /// Make the last captured value the new zero point.
    ///
    /// Does not undo the capture: [`snapshot`](Self::snapshot) keeps
    /// returning the latched delta until the next capture.
    pub fn clear(&mut self) {
        self.zero = self.latched;
    }

    /// Issue the hardware CLEAR task and forget the last capture. Only
    /// meaningful while nothing is bound to the counter; used on teardown.
    pub fn reset<H: CounterHal>(&mut self, hal: &H) {
        hal.clear_counter(self.instance);
        self.latched = 0;
        self.zero = 0;
        self.snapshot = 0;
    }

    /// Interconnect target endpoint.
    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
