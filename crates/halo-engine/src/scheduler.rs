//! Recurring tick sources.
//!
//! A [`Scheduler`] owns every timer it starts. Stopping a timer is
//! synchronous: once [`Scheduler::stop`] returns, its callback will not run
//! again.

use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, Sender};
use thiserror::Error;

/// Work run on every tick.
pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

/// Identifies one running timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("timer period must be positive")]
    ZeroPeriod,
    #[error("failed to spawn timer thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("unknown timer {0:?}")]
    UnknownTimer(TimerHandle),
}

pub trait Scheduler {
    /// Run `callback` every `period` until the returned handle is stopped.
    fn start(&mut self, period: Duration, callback: TickCallback) -> Result<TimerHandle, SchedulerError>;

    /// Stop a timer and wait until its callback can no longer run.
    fn stop(&mut self, handle: TimerHandle) -> Result<(), SchedulerError>;

    fn is_running(&self, handle: TimerHandle) -> bool;

    fn running_count(&self) -> usize;
}

struct TimerThread {
    stop_tx: Sender<()>,
    thread: thread::JoinHandle<()>,
}

/// Runs each timer on its own named thread.
///
/// The thread waits on a crossbeam `tick` channel and a stop channel, so a
/// stop request never waits for the next tick.
#[derive(Default)]
pub struct ThreadScheduler {
    timers: HashMap<TimerHandle, TimerThread>,
    next_id: u64,
}

impl ThreadScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for ThreadScheduler {
    fn start(&mut self, period: Duration, mut callback: TickCallback) -> Result<TimerHandle, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod);
        }
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        let (stop_tx, stop_rx) = channel::bounded::<()>(1);
        let thread = thread::Builder::new()
            .name(format!("halo-timer-{}", handle.0))
            .spawn(move || {
                let ticker = channel::tick(period);
                loop {
                    crossbeam::select! {
                        // A stop message or a dropped sender both end the timer.
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => callback(),
                    }
                }
            })?;

        log::debug!("timer {} started, period {:?}", handle.0, period);
        self.timers.insert(handle, TimerThread { stop_tx, thread });
        Ok(handle)
    }

    fn stop(&mut self, handle: TimerHandle) -> Result<(), SchedulerError> {
        let timer = self.timers.remove(&handle).ok_or(SchedulerError::UnknownTimer(handle))?;
        let _ = timer.stop_tx.send(());
        if timer.thread.join().is_err() {
            log::warn!("timer {} callback panicked", handle.0);
        }
        log::debug!("timer {} stopped", handle.0);
        Ok(())
    }

    fn is_running(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    fn running_count(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        let handles: Vec<TimerHandle> = self.timers.keys().copied().collect();
        for handle in handles {
            let _ = self.stop(handle);
        }
    }
}

/// Fires callbacks only when asked to.
///
/// Used for deterministic tests and for offline rendering, where frames are
/// produced as fast as possible rather than in real time.
#[derive(Default)]
pub struct ManualScheduler {
    timers: Vec<(TimerHandle, Duration, TickCallback)>,
    next_id: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every running timer once. Returns the number fired.
    pub fn fire(&mut self) -> usize {
        for (_, _, callback) in self.timers.iter_mut() {
            callback();
        }
        self.timers.len()
    }

    /// Fire every running timer `n` times.
    pub fn fire_n(&mut self, n: usize) {
        for _ in 0..n {
            self.fire();
        }
    }

    /// Period a timer was started with.
    pub fn period(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers.iter().find(|(h, _, _)| *h == handle).map(|(_, period, _)| *period)
    }
}

impl Scheduler for ManualScheduler {
    fn start(&mut self, period: Duration, callback: TickCallback) -> Result<TimerHandle, SchedulerError> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod);
        }
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.push((handle, period, callback));
        Ok(handle)
    }

    fn stop(&mut self, handle: TimerHandle) -> Result<(), SchedulerError> {
        let index = self
            .timers
            .iter()
            .position(|(h, _, _)| *h == handle)
            .ok_or(SchedulerError::UnknownTimer(handle))?;
        drop(self.timers.remove(index));
        Ok(())
    }

    fn is_running(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|(h, _, _)| *h == handle)
    }

    fn running_count(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, TickCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn test_manual_fire() {
        let mut scheduler = ManualScheduler::new();
        let (count, callback) = counter();
        let handle = scheduler.start(Duration::from_millis(10), callback).unwrap();
        scheduler.fire_n(5);
        assert_eq!(count.load(Ordering::SeqCst), 5);
        assert_eq!(scheduler.period(handle), Some(Duration::from_millis(10)));

        scheduler.stop(handle).unwrap();
        assert_eq!(scheduler.fire(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_unknown_handle() {
        let mut scheduler = ManualScheduler::new();
        let (_, callback) = counter();
        let handle = scheduler.start(Duration::from_millis(1), callback).unwrap();
        scheduler.stop(handle).unwrap();
        assert!(matches!(scheduler.stop(handle), Err(SchedulerError::UnknownTimer(_))));
    }

    #[test]
    fn test_zero_period_rejected() {
        let (_, callback) = counter();
        let err = ThreadScheduler::new().start(Duration::ZERO, callback).unwrap_err();
        assert!(matches!(err, SchedulerError::ZeroPeriod));
    }

    #[test]
    fn test_thread_timer_ticks_then_stops() {
        let mut scheduler = ThreadScheduler::new();
        let (count, callback) = counter();
        let handle = scheduler.start(Duration::from_millis(2), callback).unwrap();
        thread::sleep(Duration::from_millis(50));
        scheduler.stop(handle).unwrap();

        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop > 0);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
        assert_eq!(scheduler.running_count(), 0);
    }
}
