//! Stopwatch that accumulates elapsed time and notifies observers on unit boundaries.

use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration as StdDuration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::duration::{Duration, RoundTo};

const TICK: StdDuration = StdDuration::from_secs(1);

type Listener = Box<dyn FnMut(Duration) + Send>;

#[derive(Default)]
struct Listeners {
    second: Vec<Listener>,
    minute: Vec<Listener>,
    hour: Vec<Listener>,
}

struct ClockState {
    time: Mutex<Duration>,
    listeners: Mutex<Listeners>,
}

impl ClockState {
    fn time(&self) -> MutexGuard<'_, Duration> {
        self.time.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Listeners run after the time lock is released, so they may read the clock.
    fn notify(&self, second: bool, minute: bool, hour: bool) {
        if !(second || minute || hour) {
            return;
        }
        let snapshot = *self.time();
        let mut listeners = self.listeners();
        if second {
            listeners.second.iter_mut().for_each(|listener| listener(snapshot));
        }
        if minute {
            listeners.minute.iter_mut().for_each(|listener| listener(snapshot));
        }
        if hour {
            listeners.hour.iter_mut().for_each(|listener| listener(snapshot));
        }
    }

    fn tick(&self) {
        let carry = {
            let mut time = self.time();
            time.tick()
        };
        self.notify(true, carry.minute, carry.hour);
    }
}

/// Elapsed-time stopwatch ticking once per second on the current tokio runtime.
///
/// Listeners must not register further listeners from inside a callback.
pub struct Clock {
    state: Arc<ClockState>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ClockState {
                time: Mutex::new(Duration::ZERO),
                listeners: Mutex::new(Listeners::default()),
            }),
            ticker: Mutex::new(None),
        }
    }

    fn ticker(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_running(&self) -> bool {
        self.ticker().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Starts ticking. Does nothing when already running, so only one timer ever exists.
    ///
    /// Must be called from within a tokio runtime; otherwise the clock stays stopped.
    pub fn start(&self) {
        let mut ticker = self.ticker();
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            warn!("Clock cannot start outside of a tokio runtime");
            return;
        };
        if self.state.time().is_zero() {
            self.reset();
        }

        let state = Arc::clone(&self.state);
        *ticker = Some(runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                state.tick();
            }
        }));
        debug!("Clock started");
    }

    /// Stops ticking, optionally zeroing the time. Does nothing when not running.
    pub fn stop(&self, reset_after: bool) {
        let Some(handle) = self.ticker().take() else {
            return;
        };
        handle.abort();
        if reset_after {
            self.reset();
        }
        debug!("Clock stopped");
    }

    /// Zeroes the time without touching the running state.
    pub fn reset(&self) {
        *self.state.time() = Duration::ZERO;
    }

    /// Zeroes the time and (re)starts ticking.
    pub fn restart(&self) {
        self.stop(true);
        self.reset();
        self.start();
    }

    /// Current time, or a rounded copy of it.
    pub fn get_time(&self, round_to: Option<RoundTo>) -> Duration {
        let time = *self.state.time();
        match round_to {
            Some(unit) => time.rounded(unit),
            None => time,
        }
    }

    pub fn set_time(&self, time: Duration) {
        *self.state.time() = time.normalized();
    }

    /// Removes `amount` from the time, never going below zero; listeners of changed units fire.
    pub fn deduct(&self, amount: &Duration) {
        let changed = {
            let mut time = self.state.time();
            time.deduct(amount)
        };
        self.state.notify(changed.sec, changed.min, changed.hour);
    }

    /// Advances one second as the timer would.
    pub fn tick(&self) {
        self.state.tick();
    }

    pub fn on_second(&self, listener: impl FnMut(Duration) + Send + 'static) {
        self.state.listeners().second.push(Box::new(listener));
    }

    pub fn on_minute(&self, listener: impl FnMut(Duration) + Send + 'static) {
        self.state.listeners().minute.push(Box::new(listener));
    }

    pub fn on_hour(&self, listener: impl FnMut(Duration) + Send + 'static) {
        self.state.listeners().hour.push(Box::new(listener));
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker().take() {
            handle.abort();
        }
    }
}
