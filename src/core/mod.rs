pub mod driver;
pub mod event;
pub mod observer;
pub mod state;

pub use driver::SchedCore;
pub use event::MlfqEvent;
pub use state::{IoLedger, Job, JobId, Level, MlfqCtx, QueueSet, Ticks, Wakeup};
