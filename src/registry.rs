//! Fixed table of encoder instances built from static descriptors.
//!
//! Every descriptor is probed once at start-up. An instance that fails to
//! initialise stays in the table as `Faulted` so the others keep working
//! and the failure remains visible by name.

use heapless::Vec;

use crate::channel::ChannelAllocator;
use crate::driver::{EncoderConfig, EncoderDriver};
use crate::error::EncoderError;
use crate::hal::Soc;
use crate::sensor::EncoderSensor;

/// Static description of one encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderDescriptor {
    pub name: &'static str,
    pub config: EncoderConfig,
}

impl EncoderDescriptor {
    pub const fn new(name: &'static str, config: EncoderConfig) -> Self {
        Self { name, config }
    }
}

/// Up to `N` encoder sensors sharing one SoC and one channel allocator.
pub struct EncoderTable<'a, H, A: ?Sized, const N: usize> {
    sensors: Vec<EncoderSensor<'a, H, A>, N>,
}

impl<'a, H, A, const N: usize> EncoderTable<'a, H, A, N>
where
    H: Soc,
    A: ChannelAllocator + ?Sized,
{
    /// Create and initialise one driver per descriptor, in order.
    ///
    /// Initialisation failures are logged and leave that entry `Faulted`;
    /// they do not fail the probe.
    ///
    /// # Errors
    /// [`EncoderError::TableFull`] if there are more than `N` descriptors.
    /// Nothing is initialised in that case.
    pub fn probe(
        soc: &'a H,
        allocator: &'a A,
        descriptors: &[EncoderDescriptor],
    ) -> Result<Self, EncoderError> {
        if descriptors.len() > N {
            return Err(EncoderError::TableFull);
        }

        let mut sensors: Vec<EncoderSensor<'a, H, A>, N> = Vec::new();
        for descriptor in descriptors {
            let mut driver = EncoderDriver::new(descriptor.name, soc, allocator);
            if let Err(e) = driver.init(descriptor.config) {
                warn!("{}: left faulted: {}", descriptor.name, e);
            }
            sensors
                .push(EncoderSensor::new(driver))
                .map_err(|_| EncoderError::TableFull)?;
        }

        info!("encoder table: {} of {} ready", ready(&sensors), sensors.len());
        Ok(Self { sensors })
    }

    /// Fetch a new sample from every armed sensor. Returns how many fetched.
    pub fn poll_all(&mut self) -> usize {
        let mut fetched = 0;
        for sensor in self.sensors.iter_mut().filter(|s| s.is_ready()) {
            match sensor.sample_fetch() {
                Ok(_) => fetched += 1,
                Err(e) => warn!("{}: fetch failed: {}", sensor.name(), e),
            }
        }
        fetched
    }

    pub fn get(&self, name: &str) -> Option<&EncoderSensor<'a, H, A>> {
        self.sensors.iter().find(|s| s.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EncoderSensor<'a, H, A>> {
        self.sensors.iter_mut().find(|s| s.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EncoderSensor<'a, H, A>> {
        self.sensors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut EncoderSensor<'a, H, A>> {
        self.sensors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Number of entries that are armed.
    pub fn ready_count(&self) -> usize {
        ready(&self.sensors)
    }
}

fn ready<H, A>(sensors: &[EncoderSensor<'_, H, A>]) -> usize
where
    H: Soc,
    A: ChannelAllocator + ?Sized,
{
    sensors.iter().filter(|s| s.is_ready()).count()
}
