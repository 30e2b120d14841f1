//! Encoder driver: composes one edge source, one counter and one binding
//! into a pulse counter that software reads as "edges since last read".
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --init()--> Configuring --ok--> Armed
//!                           Configuring --any step fails--> Faulted
//! Faulted --init()--> Configuring            (explicit re-init only)
//! Armed --shutdown()--> Uninitialized
//! ```
//!
//! Once armed, counting runs entirely in hardware. The only software
//! touchpoints are `init()` and `read_and_reset()`, both of which run to
//! completion on the calling thread without blocking.

use crate::channel::{Channel, ChannelAllocator};
use crate::counter::PulseCounter;
use crate::edge::EdgeSource;
use crate::error::EncoderError;
use crate::hal::{BitWidth, Frequency, InstanceId, PinId, Pull, Soc};
use crate::interconnect::{self, Binding};

/// Static configuration of one encoder instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderConfig {
    /// Input pin carrying the pulse signal.
    pub pin: PinId,
    /// Pull configuration of the input. Default: none.
    pub pull: Pull,
    /// Counter peripheral instance to count into.
    pub counter_instance: InstanceId,
    /// Counter width. Default: 32 bits.
    pub bit_width: BitWidth,
    /// Counter base frequency. Unused in counter mode. Default: 16 MHz.
    pub frequency: Frequency,
}

impl EncoderConfig {
    /// Count edges on `pin` into `counter_instance` with default settings.
    pub const fn new(pin: PinId, counter_instance: InstanceId) -> Self {
        Self {
            pin,
            pull: Pull::None,
            counter_instance,
            bit_width: BitWidth::Bits32,
            frequency: Frequency::F16MHz,
        }
    }

    pub const fn with_pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    pub const fn with_bit_width(mut self, bit_width: BitWidth) -> Self {
        self.bit_width = bit_width;
        self
    }

    pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }
}

/// Driver lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    Uninitialized,
    Configuring,
    /// Counting; the only state in which reads are valid.
    Armed,
    /// Initialisation failed. Stays here until `init()` is called again.
    Faulted,
}

/// Hardware owned by an armed driver.
#[derive(Debug)]
struct EncoderInstance {
    edge: EdgeSource,
    counter: PulseCounter,
    binding: Binding,
}

/// One logical encoder.
///
/// Borrows the SoC and the shared channel allocator; owns its edge source,
/// counter and binding exclusively. `read_and_reset` takes `&mut self`, so
/// concurrent reads of the same instance must go through a mutex (see
/// [`EncoderTable`](crate::EncoderTable) and the `task` feature).
///
/// # Example
///
/// ```ignore
/// let pool: ChannelPool<20> = ChannelPool::new();
/// let mut left = EncoderDriver::new("encoder_left", &soc, &pool);
/// left.init(EncoderConfig::new(3, 1))?;
///
/// loop {
///     let delta = left.read_and_reset()?;
///     // ...
/// }
/// ```
pub struct EncoderDriver<'a, H, A: ?Sized> {
    name: &'static str,
    soc: &'a H,
    allocator: &'a A,
    state: DriverState,
    config: Option<EncoderConfig>,
    instance: Option<EncoderInstance>,
    last_fault: Option<EncoderError>,
}

impl<'a, H, A> EncoderDriver<'a, H, A>
where
    H: Soc,
    A: ChannelAllocator + ?Sized,
{
    /// Create an uninitialised driver. No hardware is touched.
    pub fn new(name: &'static str, soc: &'a H, allocator: &'a A) -> Self {
        Self {
            name,
            soc,
            allocator,
            state: DriverState::Uninitialized,
            config: None,
            instance: None,
            last_fault: None,
        }
    }

    // -----------------------------------------------------------------------
    // Initialisation
    // -----------------------------------------------------------------------

    /// Bring the encoder up.
    ///
    /// Steps, in order:
    /// 1. allocate an interconnect channel
    /// 2. configure and enable the edge source
    /// 3. configure and enable the counter
    /// 4. bind event to COUNT task and enable the binding
    ///
    /// If any step after the first fails, every completed step is undone and
    /// the channel goes back to the pool before the error is returned. The
    /// driver is then `Faulted` until `init()` is called again.
    ///
    /// # Errors
    /// * [`EncoderError::AlreadyArmed`] if the driver is armed
    /// * [`EncoderError::ResourceExhausted`] if no channel is free
    /// * [`EncoderError::PeripheralInitFailed`] if a peripheral rejects its
    ///   configuration
    /// * [`EncoderError::InvalidChannel`] if the allocator lost track of the
    ///   channel between steps 1 and 4
    pub fn init(&mut self, config: EncoderConfig) -> Result<(), EncoderError> {
        if self.state == DriverState::Armed {
            return Err(EncoderError::AlreadyArmed);
        }

        self.state = DriverState::Configuring;
        self.config = Some(config);

        match self.arm(&config) {
            Ok(instance) => {
                info!(
                    "{}: armed (pin {}, counter {}, channel {})",
                    self.name,
                    config.pin,
                    config.counter_instance,
                    instance.binding.channel_id()
                );
                self.instance = Some(instance);
                self.state = DriverState::Armed;
                self.last_fault = None;
                Ok(())
            }
            Err(e) => {
                error!("{}: init failed: {}", self.name, e);
                self.state = DriverState::Faulted;
                self.last_fault = Some(e);
                Err(e)
            }
        }
    }

    fn arm(&self, config: &EncoderConfig) -> Result<EncoderInstance, EncoderError> {
        let soc = self.soc;

        // (1) Channel
        let channel = self.allocator.allocate()?;

        // (2) Edge source
        let mut edge = match EdgeSource::configure(soc, config.pin, config.pull) {
            Ok(edge) => edge,
            Err(e) => return Err(self.release_after_fault(channel, e)),
        };
        if let Err(e) = edge.enable(soc) {
            edge.disable(soc);
            return Err(self.release_after_fault(channel, e));
        }

        // (3) Counter
        let mut counter = match PulseCounter::configure(
            soc,
            config.counter_instance,
            config.bit_width,
            config.frequency,
        ) {
            Ok(counter) => counter,
            Err(e) => {
                edge.disable(soc);
                return Err(self.release_after_fault(channel, e));
            }
        };
        counter.enable(soc);

        // (4) Binding
        let mut binding =
            match interconnect::bind(soc, self.allocator, channel, edge.event(), counter.task()) {
                Ok(binding) => binding,
                Err((e, channel)) => {
                    counter.disable(soc);
                    edge.disable(soc);
                    return Err(self.release_after_fault(channel, e));
                }
            };
        binding.enable(soc);

        Ok(EncoderInstance {
            edge,
            counter,
            binding,
        })
    }

    fn release_after_fault(&self, channel: Channel, fault: EncoderError) -> EncoderError {
        let id = channel.id();
        if let Err(e) = self.allocator.release(channel) {
            warn!("{}: could not release channel {}: {}", self.name, id, e);
        }
        fault
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Return the number of edges since the previous call (or since `init`)
    /// and start a new counting interval.
    ///
    /// Captures the live count without pausing it, takes the latched value
    /// as the result, then clears. An edge that lands after the capture is
    /// reported by the next call. The result is the edge count modulo
    /// `2^bit_width`, valid for fewer than `2^31` edges between calls.
    ///
    /// # Errors
    /// [`EncoderError::NotArmed`] unless the driver is `Armed`.
    pub fn read_and_reset(&mut self) -> Result<i32, EncoderError> {
        let instance = match (self.state, self.instance.as_mut()) {
            (DriverState::Armed, Some(instance)) => instance,
            _ => return Err(EncoderError::NotArmed),
        };

        let delta = instance.counter.capture(self.soc);
        instance.counter.clear();
        Ok(delta)
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Disable the binding, zero and stop the counter, disarm the edge source
    /// and release the channel. The driver returns to `Uninitialized`.
    ///
    /// # Errors
    /// [`EncoderError::DoubleRelease`] if the allocator no longer held the
    /// channel. The hardware is torn down regardless.
    pub fn shutdown(&mut self) -> Result<(), EncoderError> {
        let result = match self.instance.take() {
            Some(EncoderInstance {
                mut edge,
                mut counter,
                binding,
            }) => {
                let channel = binding.unbind(self.soc);
                counter.reset(self.soc);
                counter.disable(self.soc);
                edge.disable(self.soc);
                self.allocator.release(channel)
            }
            None => Ok(()),
        };

        debug!("{}: shut down", self.name);
        self.state = DriverState::Uninitialized;
        result
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Returns `true` if the driver is armed and reads are valid.
    pub fn is_ready(&self) -> bool {
        self.state == DriverState::Armed
    }

    /// Configuration passed to the most recent `init()`.
    pub fn config(&self) -> Option<&EncoderConfig> {
        self.config.as_ref()
    }

    /// Error that put the driver into `Faulted`, if it is faulted.
    pub fn last_fault(&self) -> Option<EncoderError> {
        self.last_fault
    }

    /// Interconnect channel held while armed.
    pub fn channel_id(&self) -> Option<u8> {
        self.instance.as_ref().map(|i| i.binding.channel_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelPool;
    use crate::error::Peripheral;
    use crate::hal::HalError;
    use crate::mock::MockSoc;

    const LEFT: EncoderConfig = EncoderConfig::new(3, 0);

    // ── Lifecycle ────────────────────────────────────────────────────

    #[test]
    fn scenario_init_count_read() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);

        encoder.init(LEFT).unwrap();
        assert_eq!(encoder.state(), DriverState::Armed);

        soc.pulse(3, 5);
        assert_eq!(encoder.read_and_reset(), Ok(5));
        assert_eq!(encoder.read_and_reset(), Ok(0));
    }

    #[test]
    fn never_initialised_is_not_armed() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);

        assert_eq!(encoder.state(), DriverState::Uninitialized);
        assert_eq!(encoder.read_and_reset(), Err(EncoderError::NotArmed));
        assert!(encoder.config().is_none());
        assert!(encoder.channel_id().is_none());
    }

    #[test]
    fn init_touches_no_interrupt() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder.init(LEFT).unwrap();

        assert!(soc.input_enabled(3));
        assert!(!soc.interrupt_enabled(3));
        assert!(soc.counter_running(0));
        assert_eq!(encoder.channel_id(), Some(0));
        assert!(soc.channel_enabled(0));
    }

    #[test]
    fn init_while_armed_is_rejected_and_keeps_counting() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder.init(LEFT).unwrap();

        assert_eq!(encoder.init(LEFT), Err(EncoderError::AlreadyArmed));
        assert_eq!(encoder.state(), DriverState::Armed);
        assert_eq!(pool.available(), 3);

        soc.pulse(3, 2);
        assert_eq!(encoder.read_and_reset(), Ok(2));
    }

    #[test]
    fn shutdown_releases_everything() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder.init(LEFT).unwrap();

        encoder.shutdown().unwrap();
        assert_eq!(encoder.state(), DriverState::Uninitialized);
        assert_eq!(encoder.read_and_reset(), Err(EncoderError::NotArmed));
        assert_eq!(pool.available(), 4);
        assert_eq!(soc.event_channels_in_use(), 0);
        assert!(!soc.counter_claimed(0));
        assert!(!soc.channel_enabled(0));

        // Everything can be claimed again.
        encoder.init(LEFT).unwrap();
        soc.pulse(3, 1);
        assert_eq!(encoder.read_and_reset(), Ok(1));
    }

    #[test]
    fn shutdown_leaves_counter_zeroed() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder.init(LEFT).unwrap();

        soc.pulse(3, 7);
        assert_eq!(encoder.read_and_reset(), Ok(7));
        soc.pulse(3, 2);
        encoder.shutdown().unwrap();
        assert_eq!(soc.counter_value(0), 0);
    }

    #[test]
    fn shutdown_of_uninitialised_driver_is_a_no_op() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        assert_eq!(encoder.shutdown(), Ok(()));
        assert_eq!(pool.available(), 4);
    }

    // ── Counting semantics ───────────────────────────────────────────

    #[test]
    fn delta_equals_edge_count() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder.init(LEFT).unwrap();

        for n in [1u32, 17, 1000, 4096] {
            soc.pulse(3, n);
            assert_eq!(encoder.read_and_reset(), Ok(n as i32));
        }
    }

    #[test]
    fn delta_is_modulo_counter_width() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder
            .init(LEFT.with_bit_width(BitWidth::Bits16))
            .unwrap();

        soc.pulse(3, 70_000);
        assert_eq!(encoder.read_and_reset(), Ok(70_000 % 65_536));
    }

    #[test]
    fn wrap_between_reads_is_transparent() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder
            .init(LEFT.with_bit_width(BitWidth::Bits16))
            .unwrap();

        soc.pulse(3, 65_000);
        assert_eq!(encoder.read_and_reset(), Ok(65_000));
        soc.pulse(3, 1_000); // raw register wraps during this interval
        assert_eq!(encoder.read_and_reset(), Ok(1_000));
    }

    #[test]
    fn wrap_of_24_bit_counter_is_transparent() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder
            .init(LEFT.with_bit_width(BitWidth::Bits24))
            .unwrap();

        soc.pulse(3, (1 << 24) - 3);
        assert_eq!(encoder.read_and_reset(), Ok((1 << 24) - 3));
        soc.pulse(3, 10);
        assert_eq!(soc.counter_value(0), 7);
        assert_eq!(encoder.read_and_reset(), Ok(10));
    }

    #[test]
    fn consecutive_reads_without_edges_return_zero() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder.init(LEFT).unwrap();

        soc.pulse(3, 9);
        assert_eq!(encoder.read_and_reset(), Ok(9));
        assert_eq!(encoder.read_and_reset(), Ok(0));
        assert_eq!(encoder.read_and_reset(), Ok(0));
    }

    #[test]
    fn edge_between_capture_and_clear_goes_to_next_read() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder.init(LEFT).unwrap();

        soc.pulse(3, 5);
        soc.inject_after_capture(3, 2);
        assert_eq!(encoder.read_and_reset(), Ok(5));
        assert_eq!(encoder.read_and_reset(), Ok(2));
        assert_eq!(encoder.read_and_reset(), Ok(0));
    }

    #[test]
    fn edges_before_init_are_not_counted() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);

        soc.pulse(3, 4);
        encoder.init(LEFT).unwrap();
        assert_eq!(encoder.read_and_reset(), Ok(0));
    }

    #[test]
    fn instances_count_independently() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut left = EncoderDriver::new("left", &soc, &pool);
        let mut right = EncoderDriver::new("right", &soc, &pool);
        left.init(EncoderConfig::new(3, 1)).unwrap();
        right
            .init(EncoderConfig::new(4, 2).with_pull(Pull::Up))
            .unwrap();
        assert_ne!(left.channel_id(), right.channel_id());

        soc.pulse(3, 10);
        soc.pulse(4, 3);
        assert_eq!(left.read_and_reset(), Ok(10));
        assert_eq!(right.read_and_reset(), Ok(3));
        assert_eq!(soc.pull(4), Pull::Up);
    }

    // ── Resource exhaustion and partial failure ──────────────────────

    #[test]
    fn pool_exhaustion_faults_and_recovers_after_release() {
        let soc = MockSoc::new();
        let pool: ChannelPool<2> = ChannelPool::new();
        let mut a = EncoderDriver::new("a", &soc, &pool);
        let mut b = EncoderDriver::new("b", &soc, &pool);
        let mut c = EncoderDriver::new("c", &soc, &pool);

        a.init(EncoderConfig::new(1, 0)).unwrap();
        b.init(EncoderConfig::new(2, 1)).unwrap();
        assert_eq!(
            c.init(EncoderConfig::new(3, 2)),
            Err(EncoderError::ResourceExhausted)
        );
        assert_eq!(c.state(), DriverState::Faulted);
        assert_eq!(c.last_fault(), Some(EncoderError::ResourceExhausted));
        assert_eq!(c.read_and_reset(), Err(EncoderError::NotArmed));

        a.shutdown().unwrap();
        c.init(EncoderConfig::new(3, 2)).unwrap();
        assert_eq!(c.state(), DriverState::Armed);
        assert_eq!(c.last_fault(), None);
    }

    #[test]
    fn counter_failure_releases_channel() {
        let soc = MockSoc::new();
        let pool: ChannelPool<1> = ChannelPool::new();
        let mut bad = EncoderDriver::new("bad", &soc, &pool);

        let err = bad.init(EncoderConfig::new(3, 9)).unwrap_err();
        assert_eq!(
            err,
            EncoderError::PeripheralInitFailed {
                peripheral: Peripheral::PulseCounter,
                cause: HalError::InvalidInstance,
            }
        );
        assert_eq!(bad.state(), DriverState::Faulted);
        assert_eq!(pool.available(), 1);
        // The edge source configured in step 2 was undone as well.
        assert_eq!(soc.event_channels_in_use(), 0);

        let mut good = EncoderDriver::new("good", &soc, &pool);
        good.init(EncoderConfig::new(3, 0)).unwrap();
        soc.pulse(3, 2);
        assert_eq!(good.read_and_reset(), Ok(2));
    }

    #[test]
    fn edge_source_failure_releases_channel() {
        let soc = MockSoc::new();
        let pool: ChannelPool<1> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        soc.reject_pin(3);

        let err = encoder.init(LEFT).unwrap_err();
        assert_eq!(
            err,
            EncoderError::PeripheralInitFailed {
                peripheral: Peripheral::EdgeSource,
                cause: HalError::Rejected,
            }
        );
        assert_eq!(pool.available(), 1);
        assert!(!soc.counter_claimed(0));
    }

    #[test]
    fn edge_enable_failure_releases_channel_and_event() {
        let soc = MockSoc::new();
        let pool: ChannelPool<1> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        soc.reject_enable(3);

        let err = encoder.init(LEFT).unwrap_err();
        assert_eq!(
            err,
            EncoderError::PeripheralInitFailed {
                peripheral: Peripheral::EdgeSource,
                cause: HalError::Rejected,
            }
        );
        assert_eq!(encoder.state(), DriverState::Faulted);
        assert_eq!(pool.available(), 1);
        assert_eq!(soc.event_channels_in_use(), 0);
        assert!(!soc.counter_claimed(0));

        encoder.init(LEFT).unwrap();
        soc.pulse(3, 4);
        assert_eq!(encoder.read_and_reset(), Ok(4));
    }

    #[test]
    fn binding_failure_unwinds_all_steps() {
        let soc = MockSoc::new();
        let pool: ChannelPool<1> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        soc.reject_channel(0);

        let err = encoder.init(LEFT).unwrap_err();
        assert_eq!(
            err,
            EncoderError::PeripheralInitFailed {
                peripheral: Peripheral::Interconnect,
                cause: HalError::Rejected,
            }
        );
        assert_eq!(pool.available(), 1);
        assert_eq!(soc.event_channels_in_use(), 0);
        assert!(!soc.counter_claimed(0));
        assert!(!soc.counter_running(0));
    }

    #[test]
    fn faulted_driver_can_be_reinitialised() {
        let soc = MockSoc::new();
        let pool: ChannelPool<2> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);

        soc.reject_counter(0);
        assert!(encoder.init(LEFT).is_err());
        assert_eq!(encoder.state(), DriverState::Faulted);

        encoder.init(LEFT).unwrap();
        assert_eq!(encoder.state(), DriverState::Armed);
        assert_eq!(pool.available(), 1);
        soc.pulse(3, 3);
        assert_eq!(encoder.read_and_reset(), Ok(3));
    }

    #[test]
    fn counter_instance_conflict_between_encoders() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut first = EncoderDriver::new("first", &soc, &pool);
        let mut second = EncoderDriver::new("second", &soc, &pool);

        first.init(EncoderConfig::new(3, 1)).unwrap();
        assert_eq!(
            second.init(EncoderConfig::new(4, 1)),
            Err(EncoderError::PeripheralInitFailed {
                peripheral: Peripheral::PulseCounter,
                cause: HalError::InstanceInUse,
            })
        );
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn config_builders() {
        let config = EncoderConfig::new(7, 2)
            .with_pull(Pull::Down)
            .with_bit_width(BitWidth::Bits24)
            .with_frequency(Frequency::F1MHz);
        assert_eq!(config.pin, 7);
        assert_eq!(config.counter_instance, 2);
        assert_eq!(config.pull, Pull::Down);
        assert_eq!(config.bit_width, BitWidth::Bits24);
        assert_eq!(config.frequency, Frequency::F1MHz);
    }

    #[test]
    fn config_is_remembered() {
        let soc = MockSoc::new();
        let pool: ChannelPool<4> = ChannelPool::new();
        let mut encoder = EncoderDriver::new("left", &soc, &pool);
        encoder.init(LEFT.with_frequency(Frequency::F2MHz)).unwrap();
        assert_eq!(encoder.config(), Some(&LEFT.with_frequency(Frequency::F2MHz)));
        assert_eq!(soc.counter_prescaler(0), 3);
        assert_eq!(encoder.name(), "left");
    }
}
