//! pulse-counter-app
//!
//! Two-encoder pulse counting firmware for the nRF52840. Each encoder pin is
//! wired GPIOTE → PPI → TIMER so edges are counted without any interrupt:
//!
//! 1. At boot both encoders are probed from static descriptors into one
//!    shared [`EncoderTable`]. An encoder that fails to come up stays in the
//!    table as faulted; the other keeps counting.
//! 2. The poll task wakes once a second, reads and resets every armed
//!    encoder, and logs the deltas over defmt-rtt.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use pulse_counter::{
    encoder_poll_task, ChannelPool, EncoderConfig, EncoderDescriptor, EncoderTable, NrfSoc,
    PollConfig, Pull, SharedTable,
};

// ---------------------------------------------------------------------------
// Encoder wiring
// ---------------------------------------------------------------------------

/// Encoders on this board.
///
/// TIMER0 is left free for radio stacks; RTC1 drives embassy-time.
const ENCODERS: [EncoderDescriptor; 2] = [
    EncoderDescriptor::new("encoder_left", EncoderConfig::new(3, 1)),
    EncoderDescriptor::new(
        "encoder_right",
        EncoderConfig::new(4, 2).with_pull(Pull::Up),
    ),
];

const ENCODER_COUNT: usize = ENCODERS.len();

// ---------------------------------------------------------------------------
// Static storage
// ---------------------------------------------------------------------------

/// All 20 programmable PPI channels. Nothing else in this firmware uses PPI.
static CHANNELS: ChannelPool<20> = ChannelPool::new();

static SOC: StaticCell<NrfSoc> = StaticCell::new();

/// Encoder table shared between the poll task and anything else that wants
/// the latest samples.
static TABLE: StaticCell<Table> = StaticCell::new();

// ---------------------------------------------------------------------------
// Type aliases
// ---------------------------------------------------------------------------

type Table = SharedTable<'static, NrfSoc, ChannelPool<20>, ENCODER_COUNT>;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Thin wrapper that monomorphises the generic `encoder_poll_task` so it can
/// be spawned as a concrete Embassy task.
#[embassy_executor::task]
async fn poll_task(table: &'static Table, config: PollConfig) {
    encoder_poll_task(table, config).await;
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Clocks and the RTC1 time driver. The peripheral singletons returned
    // here are not handed to any embassy-nrf driver.
    let _p = embassy_nrf::init(Default::default());
    info!("pulse-counter-app starting");

    // SAFETY: embassy-nrf was initialised without the `gpiote` feature and
    // no embassy-nrf driver claims PPI or TIMER1/2, so this is the only
    // code touching those peripherals.
    let soc: &'static NrfSoc = SOC.init(unsafe { NrfSoc::steal() });

    let table: EncoderTable<'static, NrfSoc, ChannelPool<20>, ENCODER_COUNT> =
        match EncoderTable::probe(soc, &CHANNELS, &ENCODERS) {
            Ok(table) => table,
            Err(e) => {
                error!("Encoder probe failed: {}", e);
                return;
            }
        };

    for sensor in table.iter() {
        match sensor.driver().last_fault() {
            None => info!("{}: ready", sensor.name()),
            Some(e) => warn!("{}: faulted ({})", sensor.name(), e),
        }
    }

    let table = TABLE.init(Mutex::new(table));

    spawner.spawn(unwrap!(poll_task(table, PollConfig::default())));

    info!("All tasks spawned");
}
