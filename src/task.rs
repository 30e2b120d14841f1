//! Periodic polling of an [`EncoderTable`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Timer};

use crate::channel::ChannelAllocator;
use crate::hal::Soc;
use crate::registry::EncoderTable;
use crate::sensor::{PollConfig, SensorChannel};

/// Shared encoder table as handed to [`encoder_poll_task`].
pub type SharedTable<'a, H, A, const N: usize> =
    Mutex<CriticalSectionRawMutex, EncoderTable<'a, H, A, N>>;

/// Fetch every armed encoder once per `config.period_ms` and log the deltas.
///
/// A plain `async fn`, since Embassy tasks cannot be generic. Wrap it in a
/// concrete task:
///
/// ```ignore
/// #[embassy_executor::task]
/// async fn poll_task(table: &'static SharedTable<'static, NrfSoc, ChannelPool<20>, 2>) {
///     encoder_poll_task(table, PollConfig::default()).await;
/// }
/// ```
///
/// The table lock is held only for the fetch itself, never across the
/// timer wait, so other tasks can read the latest samples in between.
pub async fn encoder_poll_task<H, A, const N: usize>(
    table: &'static SharedTable<'static, H, A, N>,
    config: PollConfig,
) where
    H: Soc,
    A: ChannelAllocator + ?Sized,
{
    let period = Duration::from_millis(config.period_ms);

    {
        let table = table.lock().await;
        info!(
            "encoder poll: {} of {} armed, every {} ms",
            table.ready_count(),
            table.len(),
            config.period_ms
        );
    }

    loop {
        Timer::after(period).await;

        let mut table = table.lock().await;
        table.poll_all();
        for sensor in table.iter().filter(|s| s.is_ready()) {
            if let Ok(delta) = sensor.channel_get(SensorChannel::PosDy) {
                info!("{} data {}", sensor.name(), delta);
            }
        }
    }
}
