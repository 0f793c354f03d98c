use crate::command::UiCommand;
use crate::controller::Controller;
use crate::scheduler::{Scheduler, SchedulerError, TimerHandle};
use halo_core::{EffectConfig, FrameInputs};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Lock the controller, recovering the data if a previous holder panicked.
pub fn lock_controller(controller: &Mutex<Controller>) -> MutexGuard<'_, Controller> {
    controller.lock().unwrap_or_else(|poisoned: PoisonError<MutexGuard<'_, Controller>>| {
        log::warn!("controller lock poisoned; recovering");
        poisoned.into_inner()
    })
}

/// The running effect: a controller plus the timer that drives it.
///
/// At most one timer is live. Activation and deactivation are idempotent,
/// and dropping the effect deactivates it, so the timer can never outlive
/// the effect.
pub struct Effect<S: Scheduler> {
    controller: Arc<Mutex<Controller>>,
    scheduler: S,
    timer: Option<TimerHandle>,
    period: Duration,
}

impl<S: Scheduler> Effect<S> {
    pub fn new(config: &EffectConfig, scheduler: S) -> Self {
        Self {
            controller: Arc::new(Mutex::new(Controller::new(config))),
            scheduler,
            timer: None,
            period: config.tick_period(),
        }
    }

    /// Shared handle to the controller, for renderers and input threads.
    pub fn controller(&self) -> Arc<Mutex<Controller>> {
        Arc::clone(&self.controller)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Start ticking. Does nothing if already active.
    pub fn activate(&mut self) -> Result<(), SchedulerError> {
        if self.timer.is_some() {
            return Ok(());
        }
        lock_controller(&self.controller).on_activate();

        let controller = Arc::clone(&self.controller);
        let handle = self.scheduler.start(
            self.period,
            Box::new(move || lock_controller(&controller).tick()),
        )?;
        self.timer = Some(handle);
        log::info!("effect activated, tick every {:?}", self.period);
        Ok(())
    }

    /// Stop ticking. Does nothing if already inactive.
    pub fn deactivate(&mut self) {
        let Some(handle) = self.timer.take() else {
            return;
        };
        if let Err(err) = self.scheduler.stop(handle) {
            log::warn!("failed to stop effect timer: {err}");
        }
        log::info!("effect deactivated");
    }

    /// Activate for the lifetime of the returned guard.
    pub fn activated(&mut self) -> Result<ActiveGuard<'_, S>, SchedulerError> {
        self.activate()?;
        Ok(ActiveGuard { effect: self })
    }

    pub fn handle(&self, command: UiCommand) {
        lock_controller(&self.controller).handle(command);
    }

    pub fn snapshot(&self) -> FrameInputs {
        lock_controller(&self.controller).snapshot()
    }
}

impl<S: Scheduler> Drop for Effect<S> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Keeps an [`Effect`] active until dropped.
pub struct ActiveGuard<'a, S: Scheduler> {
    effect: &'a mut Effect<S>,
}

impl<S: Scheduler> Deref for ActiveGuard<'_, S> {
    type Target = Effect<S>;

    fn deref(&self) -> &Self::Target {
        self.effect
    }
}

impl<S: Scheduler> DerefMut for ActiveGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.effect
    }
}

impl<S: Scheduler> Drop for ActiveGuard<'_, S> {
    fn drop(&mut self) {
        self.effect.deactivate();
    }
}
