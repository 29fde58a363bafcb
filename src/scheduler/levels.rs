use crate::{
    core::{Level, Ticks},
    error::ConfigError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPolicy {
    pub quantum: Ticks,
    /// Quantum slices a job may use at this level before demotion.
    pub allotment: u64,
}

/// Per-level policy, indexed so that 0 is the lowest priority and
/// `num_levels() - 1` the highest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelTable {
    levels: Vec<LevelPolicy>,
}

impl LevelTable {
    pub fn uniform(num_levels: usize, quantum: Ticks, allotment: u64) -> Result<Self, ConfigError> {
        Self::from_lowest_first(vec![LevelPolicy { quantum, allotment }; num_levels])
    }

    /// Input order is highest priority first, as typed on the command line.
    pub fn from_highest_first(policies: Vec<LevelPolicy>) -> Result<Self, ConfigError> {
        let mut levels = policies;
        levels.reverse();
        Self::from_lowest_first(levels)
    }

    fn from_lowest_first(levels: Vec<LevelPolicy>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }

        for (level, policy) in levels.iter().enumerate() {
            if policy.quantum == 0 {
                return Err(ConfigError::ZeroQuantum { level });
            }
            // Exhausting the lowest level's allotment has nowhere to demote to
            if level != 0 && policy.allotment == 0 {
                return Err(ConfigError::ZeroAllotment { level });
            }
        }

        Ok(Self { levels })
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    pub fn highest(&self) -> Level {
        self.levels.len() - 1
    }

    pub fn policy(&self, level: Level) -> LevelPolicy {
        self.levels[level]
    }

    pub fn quantum(&self, level: Level) -> Ticks {
        self.levels[level].quantum
    }

    pub fn allotment(&self, level: Level) -> u64 {
        self.levels[level].allotment
    }

    /// Levels from highest to lowest priority, paired with their index.
    pub fn iter_highest_first(&self) -> impl Iterator<Item = (Level, LevelPolicy)> + '_ {
        self.levels.iter().copied().enumerate().rev()
    }
}
