pub mod levels;

pub use levels::{LevelPolicy, LevelTable};

use crate::core::Ticks;

pub const DEFAULT_NUM_QUEUES: usize = 3;
pub const DEFAULT_QUANTUM: Ticks = 10;
pub const DEFAULT_ALLOTMENT: u64 = 1;
pub const DEFAULT_IO_TIME: Ticks = 5;

/// Policy switches that sit beside the level table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MlfqOptions {
    /// Boost every `boost` ticks; 0 disables boosting.
    pub boost: Ticks,
    pub io_time: Ticks,
    /// Refill quantum and allotment when a job issues I/O.
    pub stay_after_io: bool,
    /// Jobs returning from I/O go to the front of their queue.
    pub io_bump: bool,
}

impl Default for MlfqOptions {
    fn default() -> Self {
        Self {
            boost: 0,
            io_time: DEFAULT_IO_TIME,
            stay_after_io: false,
            io_bump: false,
        }
    }
}

impl MlfqOptions {
    pub fn is_boost_tick(&self, now: Ticks) -> bool {
        self.boost > 0 && now != 0 && now % self.boost == 0
    }
}
