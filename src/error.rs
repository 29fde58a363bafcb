use thiserror::Error;

use crate::core::{JobId, Level, Ticks};

/// Rejected before the tick loop starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("at least one queue level is required")]
    NoLevels,

    #[error("number of allotments ({allotments}) must match number of quantums ({quantums})")]
    LevelListMismatch { quantums: usize, allotments: usize },

    #[error("invalid {list} entry '{entry}': expected a non-negative integer")]
    BadListEntry { list: &'static str, entry: String },

    #[error("quantum for queue {level} must be a positive integer")]
    ZeroQuantum { level: Level },

    #[error("allotment for queue {level} must be a positive integer")]
    ZeroAllotment { level: Level },

    #[error("job string '{0}' is in wrong format, should be x1,y1,z1:x2,y2,z2:...")]
    MalformedJob(String),

    #[error("job {job} must have a positive run time")]
    ZeroRunTime { job: JobId },

    #[error("the workload contains no jobs")]
    NoJobs,

    #[error("I/O time {io_time} overflows the simulation clock for this workload")]
    IoTimeOverflow { io_time: Ticks },
}

/// Engine bookkeeping diverged from its invariants; the run is aborted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("invariant violation at time {time}: {detail}")]
    InvariantViolation { time: u64, detail: String },
}
