//! Interconnect channel pool.
//!
//! Channels are the only resource shared between encoder instances, so the
//! pool is the one place that needs cross-instance locking. State is a
//! bitmask (bit `n` set = channel `n` allocated) behind a critical-section
//! mutex; allocation always hands out the lowest free id.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::EncoderError;

/// Exclusive handle to one interconnect channel.
///
/// Move-only: the holder is the single owner until it hands the handle back
/// through [`ChannelAllocator::release`].
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel {
    id: u8,
}

impl Channel {
    /// Hardware channel number.
    pub fn id(&self) -> u8 {
        self.id
    }
}

/// Source of interconnect channels.
pub trait ChannelAllocator {
    /// Take the lowest free channel.
    ///
    /// # Errors
    /// [`EncoderError::ResourceExhausted`] if every channel is allocated.
    fn allocate(&self) -> Result<Channel, EncoderError>;

    /// Return a channel to the pool.
    ///
    /// # Errors
    /// [`EncoderError::DoubleRelease`] if the pool does not hold the channel
    /// as allocated (released twice, or handed out by a different pool).
    fn release(&self, channel: Channel) -> Result<(), EncoderError>;

    /// Returns `true` if the pool currently holds `channel` as allocated.
    fn is_allocated(&self, channel: &Channel) -> bool;
}

/// Fixed pool of `N` interconnect channels (`1 <= N <= 32`).
///
/// Safe to share between threads and interrupt contexts; put it in a
/// `static` or a `StaticCell` and pass `&pool` to every driver.
///
/// # Example
///
/// ```
/// use pulse_counter::{ChannelAllocator, ChannelPool, EncoderError};
///
/// let pool: ChannelPool<2> = ChannelPool::new();
/// let a = pool.allocate().unwrap();
/// let _b = pool.allocate().unwrap();
/// assert_eq!(pool.allocate(), Err(EncoderError::ResourceExhausted));
///
/// pool.release(a).unwrap();
/// assert_eq!(pool.allocate().unwrap().id(), 0);
/// ```
pub struct ChannelPool<const N: usize> {
    allocated: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl<const N: usize> ChannelPool<N> {
    const CAPACITY_OK: () = assert!(N > 0 && N <= 32, "pool size must be 1..=32");

    const FULL: u32 = if N >= 32 { u32::MAX } else { (1u32 << N) - 1 };

    /// Create a pool with every channel free.
    pub const fn new() -> Self {
        Self::with_reserved(0)
    }

    /// Create a pool with the channels in `reserved` (bit `n` = channel `n`)
    /// permanently marked as allocated, e.g. channels owned by a radio stack.
    pub const fn with_reserved(reserved: u32) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CAPACITY_OK;
        Self {
            allocated: Mutex::new(Cell::new(reserved & Self::FULL)),
        }
    }

    /// Total number of channels managed by the pool.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of channels currently free.
    pub fn available(&self) -> usize {
        self.allocated
            .lock(|allocated| (!allocated.get() & Self::FULL).count_ones() as usize)
    }

    fn bit(id: u8) -> Option<u32> {
        if (id as usize) < N {
            Some(1 << id)
        } else {
            None
        }
    }
}

impl<const N: usize> Default for ChannelPool<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ChannelAllocator for ChannelPool<N> {
    fn allocate(&self) -> Result<Channel, EncoderError> {
        self.allocated.lock(|allocated| {
            let mask = allocated.get();
            let free = !mask & Self::FULL;
            if free == 0 {
                return Err(EncoderError::ResourceExhausted);
            }
            let id = free.trailing_zeros() as u8;
            allocated.set(mask | (1 << id));
            Ok(Channel { id })
        })
    }

    fn release(&self, channel: Channel) -> Result<(), EncoderError> {
        let bit = Self::bit(channel.id).ok_or(EncoderError::DoubleRelease)?;
        self.allocated.lock(|allocated| {
            let mask = allocated.get();
            if mask & bit == 0 {
                return Err(EncoderError::DoubleRelease);
            }
            allocated.set(mask & !bit);
            Ok(())
        })
    }

    fn is_allocated(&self, channel: &Channel) -> bool {
        match Self::bit(channel.id) {
            Some(bit) => self.allocated.lock(|allocated| allocated.get() & bit != 0),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn allocates_lowest_free_id_first() {
        let pool: ChannelPool<4> = ChannelPool::new();
        let a = pool.allocate().unwrap();
        let b = pool.allocate().unwrap();
        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);

        pool.release(a).unwrap();
        assert_eq!(pool.allocate().unwrap().id(), 0);
    }

    #[test]
    fn exhaustion_then_release_then_retry() {
        let pool: ChannelPool<3> = ChannelPool::new();
        let _a = pool.allocate().unwrap();
        let b = pool.allocate().unwrap();
        let _c = pool.allocate().unwrap();
        assert_eq!(pool.available(), 0);
        assert_eq!(pool.allocate(), Err(EncoderError::ResourceExhausted));

        pool.release(b).unwrap();
        assert_eq!(pool.available(), 1);
        let retry = pool.allocate().unwrap();
        assert_eq!(retry.id(), 1);
    }

    #[test]
    fn release_of_unheld_channel_is_double_release() {
        let pool: ChannelPool<4> = ChannelPool::new();
        let other: ChannelPool<4> = ChannelPool::new();

        let ch = pool.allocate().unwrap();
        // `other` never handed out channel 0.
        assert_eq!(other.release(ch), Err(EncoderError::DoubleRelease));

        // The owning pool still counts it as allocated.
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn release_of_out_of_range_id_is_rejected() {
        let big: ChannelPool<8> = ChannelPool::new();
        let small: ChannelPool<2> = ChannelPool::with_reserved(0b11);
        for _ in 0..5 {
            big.allocate().unwrap();
        }
        let ch = big.allocate().unwrap();
        assert_eq!(ch.id(), 5);
        assert!(!small.is_allocated(&ch));
        assert_eq!(small.release(ch), Err(EncoderError::DoubleRelease));
    }

    #[test]
    fn reserved_channels_are_never_handed_out() {
        let pool: ChannelPool<4> = ChannelPool::with_reserved(0b0101);
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.allocate().unwrap().id(), 1);
        assert_eq!(pool.allocate().unwrap().id(), 3);
        assert_eq!(pool.allocate(), Err(EncoderError::ResourceExhausted));
    }

    #[test]
    fn reserved_bits_beyond_capacity_are_ignored() {
        let pool: ChannelPool<2> = ChannelPool::with_reserved(0xFFFF_FFFC);
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn full_width_pool() {
        let pool: ChannelPool<32> = ChannelPool::new();
        assert_eq!(pool.capacity(), 32);
        for expected in 0..32u8 {
            assert_eq!(pool.allocate().unwrap().id(), expected);
        }
        assert_eq!(pool.allocate(), Err(EncoderError::ResourceExhausted));
    }

    #[test]
    fn is_allocated_tracks_state() {
        let pool: ChannelPool<2> = ChannelPool::new();
        let ch = pool.allocate().unwrap();
        assert!(pool.is_allocated(&ch));
        let id = ch.id();
        pool.release(ch).unwrap();
        let again = pool.allocate().unwrap();
        assert_eq!(again.id(), id);
    }

    #[test]
    fn concurrent_allocation_never_hands_out_a_channel_twice() {
        use std::vec::Vec;

        let pool: ChannelPool<20> = ChannelPool::new();

        let ids: Vec<u8> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    s.spawn(|| {
                        (0..5)
                            .map(|_| pool.allocate().unwrap().id())
                            .collect::<Vec<u8>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let mut seen = 0u32;
        for id in ids {
            assert_eq!(seen & (1 << id), 0, "channel {} handed out twice", id);
            seen |= 1 << id;
        }
        assert_eq!(seen, 0x000F_FFFF);
        assert_eq!(pool.allocate(), Err(EncoderError::ResourceExhausted));
    }
}
