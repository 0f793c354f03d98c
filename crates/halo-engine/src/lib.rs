pub mod command;
pub mod controller;
pub mod scheduler;
pub mod effect;

pub use command::UiCommand;
pub use controller::Controller;
pub use scheduler::{ManualScheduler, Scheduler, SchedulerError, ThreadScheduler, TickCallback, TimerHandle};
pub use effect::{lock_controller, ActiveGuard, Effect};
