use crate::core::{JobId, Level, Ticks, Wakeup};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MlfqEvent {
    Boost {
        time: Ticks,
        every: Ticks,
    },
    Wakeup {
        time: Ticks,
        job: JobId,
        reason: Wakeup,
    },
    // No runnable job at any level
    Idle {
        time: Ticks,
    },
    // Counters are as they stand after the tick was consumed
    Run {
        time: Ticks,
        job: JobId,
        priority: Level,
        ticks_left: Ticks,
        allotment_left: u64,
        time_left: Ticks,
        run_time: Ticks,
    },
    Finished {
        time: Ticks,
        job: JobId,
    },
    IoStart {
        time: Ticks,
        job: JobId,
    },
}

impl MlfqEvent {
    pub fn time(&self) -> Ticks {
        match self {
            Self::Boost { time, .. }
            | Self::Wakeup { time, .. }
            | Self::Idle { time }
            | Self::Run { time, .. }
            | Self::Finished { time, .. }
            | Self::IoStart { time, .. } => *time,
        }
    }
}
