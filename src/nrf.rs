//! Register-level nRF52840 backend.
//!
//! Maps the three HAL traits onto GPIOTE, PPI and TIMER0–4 through
//! `nrf52840-pac`. Only the bookkeeping the hardware cannot answer itself
//! is kept in software: which GPIOTE channel serves which pin, and which
//! TIMER instances are claimed.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use nrf52840_pac as pac;

use crate::hal::{
    BitWidth, CounterHal, EdgeHal, EventId, Frequency, HalError, InstanceId, InterconnectHal,
    PinId, Polarity, Pull, TaskId,
};
use crate::registers::{
    gpiote_event_address, timer_count_task_address, GPIOTE_CHANNELS, GPIOTE_MODE_DISABLED,
    GPIOTE_MODE_EVENT, GPIOTE_POLARITY_POS, GPIOTE_PORT_POS, GPIOTE_PSEL_POS, GPIO_PULL_POS,
    PIN_COUNT, PPI_CHANNELS, TIMER_INSTANCES, TIMER_MODE_COUNTER, TIMER_PRESCALER_MAX,
};

/// Run `$body` with `$t` bound to the register block of TIMER`$instance`.
/// Evaluates to `None` for an instance that does not exist.
macro_rules! with_timer {
    ($instance:expr, |$t:ident| $body:expr) => {
        match $instance {
            0 => {
                let $t = unsafe { &*pac::TIMER0::ptr() };
                Some($body)
            }
            1 => {
                let $t = unsafe { &*pac::TIMER1::ptr() };
                Some($body)
            }
            2 => {
                let $t = unsafe { &*pac::TIMER2::ptr() };
                Some($body)
            }
            3 => {
                let $t = unsafe { &*pac::TIMER3::ptr() };
                Some($body)
            }
            4 => {
                let $t = unsafe { &*pac::TIMER4::ptr() };
                Some($body)
            }
            _ => None,
        }
    };
}

/// GPIOTE, PPI and TIMER0–4 of one nRF52840.
pub struct NrfSoc {
    /// Pin served by each GPIOTE channel.
    gpiote: Mutex<CriticalSectionRawMutex, Cell<[Option<PinId>; GPIOTE_CHANNELS]>>,
    /// Bit `n` set = TIMER`n` claimed.
    timers: Mutex<CriticalSectionRawMutex, Cell<u8>>,
}

impl NrfSoc {
    /// # Safety
    /// The caller must ensure nothing else drives GPIOTE, PPI channels
    /// 0–19 or the TIMER instances this backend is asked to configure, and
    /// that only one `NrfSoc` exists.
    pub unsafe fn steal() -> Self {
        Self {
            gpiote: Mutex::new(Cell::new([None; GPIOTE_CHANNELS])),
            timers: Mutex::new(Cell::new(0)),
        }
    }

    fn gpiote_slot(&self, pin: PinId) -> Option<usize> {
        self.gpiote
            .lock(|slots| slots.get().iter().position(|p| *p == Some(pin)))
    }

    fn write_pin_cnf(pin: PinId, pull: Pull) {
        let pull = match pull {
            Pull::None => 0,
            Pull::Down => 1,
            Pull::Up => 3,
        };
        // DIR = input, INPUT = connect
        let cnf = pull << GPIO_PULL_POS;
        let index = (pin % 32) as usize;
        if pin < 32 {
            let port = unsafe { &*pac::P0::ptr() };
            port.pin_cnf[index].write(|w| unsafe { w.bits(cnf) });
        } else {
            let port = unsafe { &*pac::P1::ptr() };
            port.pin_cnf[index].write(|w| unsafe { w.bits(cnf) });
        }
    }
}

impl EdgeHal for NrfSoc {
    fn configure_input(
        &self,
        pin: PinId,
        pull: Pull,
        polarity: Polarity,
    ) -> Result<EventId, HalError> {
        if pin >= PIN_COUNT {
            return Err(HalError::InvalidPin);
        }

        let slot = self.gpiote.lock(|slots| {
            let mut table = slots.get();
            if table.contains(&Some(pin)) {
                return Err(HalError::PinInUse);
            }
            let slot = table
                .iter()
                .position(Option::is_none)
                .ok_or(HalError::NoEventChannel)?;
            table[slot] = Some(pin);
            slots.set(table);
            Ok(slot)
        })?;

        Self::write_pin_cnf(pin, pull);

        let polarity = match polarity {
            Polarity::LoToHi => 1,
            Polarity::HiToLo => 2,
            Polarity::Toggle => 3,
        };
        let config = GPIOTE_MODE_DISABLED
            | (u32::from(pin % 32) << GPIOTE_PSEL_POS)
            | (u32::from(pin / 32) << GPIOTE_PORT_POS)
            | (polarity << GPIOTE_POLARITY_POS);

        let gpiote = unsafe { &*pac::GPIOTE::ptr() };
        gpiote.intenclr.write(|w| unsafe { w.bits(1 << slot) });
        gpiote.config[slot].write(|w| unsafe { w.bits(config) });
        gpiote.events_in[slot].write(|w| unsafe { w.bits(0) });

        debug!("gpiote: pin {} on channel {}", pin, slot);
        Ok(EventId::from_raw(gpiote_event_address(slot)))
    }

    fn enable_input(&self, pin: PinId) -> Result<(), HalError> {
        let slot = self.gpiote_slot(pin).ok_or(HalError::InvalidPin)?;
        let gpiote = unsafe { &*pac::GPIOTE::ptr() };
        gpiote.config[slot].modify(|r, w| unsafe { w.bits(r.bits() | GPIOTE_MODE_EVENT) });
        Ok(())
    }

    fn disable_input(&self, pin: PinId) {
        let Some(slot) = self.gpiote_slot(pin) else {
            return;
        };
        let gpiote = unsafe { &*pac::GPIOTE::ptr() };
        gpiote.config[slot].write(|w| unsafe { w.bits(GPIOTE_MODE_DISABLED) });

        self.gpiote.lock(|slots| {
            let mut table = slots.get();
            table[slot] = None;
            slots.set(table);
        });
    }
}

impl CounterHal for NrfSoc {
    fn configure_counter(
        &self,
        instance: InstanceId,
        width: BitWidth,
        frequency: Frequency,
    ) -> Result<TaskId, HalError> {
        let index = instance as usize;
        if index >= TIMER_INSTANCES {
            return Err(HalError::InvalidInstance);
        }

        self.timers.lock(|claimed| {
            if claimed.get() & (1 << index) != 0 {
                return Err(HalError::InstanceInUse);
            }
            claimed.set(claimed.get() | (1 << index));
            Ok(())
        })?;

        let bitmode = match width {
            BitWidth::Bits16 => 0,
            BitWidth::Bits24 => 2,
            BitWidth::Bits32 => 3,
        };
        let prescaler = u32::from(frequency.prescaler().min(TIMER_PRESCALER_MAX));

        with_timer!(instance, |t| {
            t.tasks_stop.write(|w| unsafe { w.bits(1) });
            t.mode.write(|w| unsafe { w.bits(TIMER_MODE_COUNTER) });
            t.bitmode.write(|w| unsafe { w.bits(bitmode) });
            t.prescaler.write(|w| unsafe { w.bits(prescaler) });
            t.tasks_clear.write(|w| unsafe { w.bits(1) });
        });

        Ok(TaskId::from_raw(timer_count_task_address(index)))
    }

    fn start_counter(&self, instance: InstanceId) {
        with_timer!(instance, |t| t.tasks_start.write(|w| unsafe { w.bits(1) }));
    }

    fn stop_counter(&self, instance: InstanceId) {
        if with_timer!(instance, |t| t.tasks_stop.write(|w| unsafe { w.bits(1) })).is_some() {
            self.timers
                .lock(|claimed| claimed.set(claimed.get() & !(1 << instance)));
        }
    }

    fn capture_counter(&self, instance: InstanceId, cc: u8) -> u32 {
        let cc = cc as usize;
        with_timer!(instance, |t| {
            match (t.tasks_capture.get(cc), t.cc.get(cc)) {
                (Some(task), Some(reg)) => {
                    task.write(|w| unsafe { w.bits(1) });
                    reg.read().bits()
                }
                _ => 0,
            }
        })
        .unwrap_or(0)
    }

    fn clear_counter(&self, instance: InstanceId) {
        with_timer!(instance, |t| t.tasks_clear.write(|w| unsafe { w.bits(1) }));
    }
}

impl InterconnectHal for NrfSoc {
    fn assign_channel(&self, channel: u8, event: EventId, task: TaskId) -> Result<(), HalError> {
        let index = channel as usize;
        if index >= PPI_CHANNELS {
            return Err(HalError::InvalidChannel);
        }
        let ppi = unsafe { &*pac::PPI::ptr() };
        ppi.ch[index].eep.write(|w| unsafe { w.bits(event.raw()) });
        ppi.ch[index].tep.write(|w| unsafe { w.bits(task.raw()) });
        Ok(())
    }

    fn enable_channel(&self, channel: u8) {
        if (channel as usize) < PPI_CHANNELS {
            let ppi = unsafe { &*pac::PPI::ptr() };
            ppi.chenset.write(|w| unsafe { w.bits(1 << channel) });
        }
    }

    fn disable_channel(&self, channel: u8) {
        if (channel as usize) < PPI_CHANNELS {
            let ppi = unsafe { &*pac::PPI::ptr() };
            ppi.chenclr.write(|w| unsafe { w.bits(1 << channel) });
        }
    }
}
