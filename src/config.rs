use clap::Parser;

use crate::{
    core::Ticks,
    error::ConfigError,
    scheduler::{
        DEFAULT_ALLOTMENT, DEFAULT_IO_TIME, DEFAULT_NUM_QUEUES, DEFAULT_QUANTUM, LevelPolicy,
        LevelTable, MlfqOptions,
    },
    sim::{JobSpec, parse_job_list, random_jobs, validate_jobs},
};

#[derive(Parser, Debug, Clone)]
#[command(name = "mlfq_model")]
#[command(about = "Multi-level feedback queue scheduling simulator")]
pub struct Args {
    /// The random seed
    #[arg(short = 's', long, default_value_t = 0)]
    pub seed: u64,

    /// Number of queues in MLFQ (if not using -Q or -A)
    #[arg(short = 'n', long, default_value_t = DEFAULT_NUM_QUEUES)]
    pub num_queues: usize,

    /// Length of time slice (if not using -Q)
    #[arg(short = 'q', long, default_value_t = DEFAULT_QUANTUM)]
    pub quantum: Ticks,

    /// Length of allotment (if not using -A)
    #[arg(short = 'a', long, default_value_t = DEFAULT_ALLOTMENT)]
    pub allotment: u64,

    /// Time slice per queue level as x,y,z,... from the highest priority queue down
    #[arg(short = 'Q', long, default_value = "")]
    pub quantum_list: String,

    /// Number of time slices per queue level as x,y,z,... from the highest priority queue down
    #[arg(short = 'A', long, default_value = "")]
    pub allotment_list: String,

    /// Number of jobs in the system (if not using -l)
    #[arg(short = 'j', long, default_value_t = 3)]
    pub num_jobs: usize,

    /// Max run time of a randomly generated job
    #[arg(short = 'm', long, default_value_t = 100)]
    pub max_len: Ticks,

    /// Max I/O frequency of a randomly generated job
    #[arg(short = 'M', long, default_value_t = 10)]
    pub max_io: Ticks,

    /// How often to boost every job back to the highest priority (0 disables)
    #[arg(short = 'B', long, default_value_t = 0)]
    pub boost: Ticks,

    /// How long an I/O lasts
    #[arg(short = 'i', long, default_value_t = DEFAULT_IO_TIME)]
    pub io_time: Ticks,

    /// Reset and stay at the same priority level when issuing I/O
    #[arg(short = 'S', long)]
    pub stay: bool,

    /// Jobs that finish I/O move to the front of their queue
    #[arg(short = 'I', long)]
    pub io_bump: bool,

    /// Jobs to run as x1,y1,z1:x2,y2,z2:... where x is start time, y is run
    /// time and z is how often the job issues an I/O
    #[arg(short = 'l', long, default_value = "")]
    pub job_list: String,

    /// Compute answers: print the full execution trace and statistics
    #[arg(short = 'c', long = "compute")]
    pub solve: bool,
}

/// Validated inputs for one run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub levels: LevelTable,
    pub options: MlfqOptions,
    pub jobs: Vec<JobSpec>,
    pub solve: bool,
}

impl Args {
    pub fn into_config(self) -> Result<SimConfig, ConfigError> {
        let levels = self.level_table()?;

        let jobs = if self.job_list.is_empty() {
            let jobs = random_jobs(self.num_jobs, self.max_len, self.max_io, self.seed);
            validate_jobs(&jobs)?;
            jobs
        } else {
            parse_job_list(&self.job_list)?
        };
        check_clock_horizon(&jobs, self.io_time)?;

        Ok(SimConfig {
            levels,
            options: MlfqOptions {
                boost: self.boost,
                io_time: self.io_time,
                stay_after_io: self.stay,
                io_bump: self.io_bump,
            },
            jobs,
            solve: self.solve,
        })
    }

    fn level_table(&self) -> Result<LevelTable, ConfigError> {
        let quantums = parse_list("quantum", &self.quantum_list)?;
        let allotments = parse_list("allotment", &self.allotment_list)?;

        match (quantums, allotments) {
            (None, None) => LevelTable::uniform(self.num_queues, self.quantum, self.allotment),
            (Some(quantums), None) => LevelTable::from_highest_first(
                quantums
                    .into_iter()
                    .map(|quantum| LevelPolicy {
                        quantum,
                        allotment: self.allotment,
                    })
                    .collect(),
            ),
            (None, Some(allotments)) => LevelTable::from_highest_first(
                allotments
                    .into_iter()
                    .map(|allotment| LevelPolicy {
                        quantum: self.quantum,
                        allotment,
                    })
                    .collect(),
            ),
            (Some(quantums), Some(allotments)) => {
                if quantums.len() != allotments.len() {
                    return Err(ConfigError::LevelListMismatch {
                        quantums: quantums.len(),
                        allotments: allotments.len(),
                    });
                }
                LevelTable::from_highest_first(
                    quantums
                        .into_iter()
                        .zip(allotments)
                        .map(|(quantum, allotment)| LevelPolicy { quantum, allotment })
                        .collect(),
                )
            }
        }
    }
}

/// The clock never passes the last arrival plus, for every job, one tick per
/// unit of run time and at most one I/O per tick.
fn check_clock_horizon(jobs: &[JobSpec], io_time: Ticks) -> Result<(), ConfigError> {
    let overflow = ConfigError::IoTimeOverflow { io_time };
    let per_tick = io_time.checked_add(1).ok_or(overflow.clone())?;
    let last_start = jobs.iter().map(|job| job.start_time).max().unwrap_or(0);

    jobs.iter()
        .try_fold(last_start, |horizon, job| {
            job.run_time
                .checked_mul(per_tick)
                .and_then(|busy| horizon.checked_add(busy))
        })
        .map(|_| ())
        .ok_or(overflow)
}

// An empty list means "not given"
fn parse_list(list: &'static str, raw: &str) -> Result<Option<Vec<u64>>, ConfigError> {
    if raw.is_empty() {
        return Ok(None);
    }

    raw.split(',')
        .map(|entry| {
            entry
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::BadListEntry {
                    list,
                    entry: entry.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Result<SimConfig, ConfigError> {
        let argv = std::iter::once("mlfq_model").chain(args.iter().copied());
        Args::try_parse_from(argv).unwrap().into_config()
    }

    #[test]
    fn defaults_match_the_classic_tool() {
        let config = config(&[]).unwrap();
        assert_eq!(config.levels.num_levels(), 3);
        assert_eq!(config.levels.quantum(2), 10);
        assert_eq!(config.levels.allotment(2), 1);
        assert_eq!(config.options, MlfqOptions::default());
        assert_eq!(config.jobs.len(), 3);
        assert!(!config.solve);
    }

    #[test]
    fn explicit_lists_override_level_count() {
        let config = config(&["-n", "5", "-Q", "1,2,4", "-A", "3,2,1"]).unwrap();
        assert_eq!(config.levels.num_levels(), 3);
        assert_eq!(config.levels.policy(2), LevelPolicy { quantum: 1, allotment: 3 });
        assert_eq!(config.levels.policy(0), LevelPolicy { quantum: 4, allotment: 1 });
    }

    #[test]
    fn allotment_list_alone_uses_uniform_quantum() {
        let config = config(&["-q", "7", "-A", "2,1"]).unwrap();
        assert_eq!(config.levels.num_levels(), 2);
        assert_eq!(config.levels.policy(1), LevelPolicy { quantum: 7, allotment: 2 });
    }

    #[test]
    fn mismatched_lists_are_rejected() {
        assert_eq!(
            config(&["-Q", "10,10", "-A", "1,1,1"]).unwrap_err(),
            ConfigError::LevelListMismatch {
                quantums: 2,
                allotments: 3,
            }
        );
    }

    #[test]
    fn bad_list_entries_are_rejected() {
        assert_eq!(
            config(&["-Q", "10,x"]).unwrap_err(),
            ConfigError::BadListEntry {
                list: "quantum",
                entry: "x".to_string(),
            }
        );
        assert_eq!(
            config(&["-A", "0,1"]).unwrap_err(),
            ConfigError::ZeroAllotment { level: 1 }
        );
    }

    #[test]
    fn job_list_overrides_synthesis() {
        let config = config(&[
            "-j", "10", "-l", "0,5,0:2,3,1", "-c", "-S", "-I", "-B", "20",
        ])
        .unwrap();
        assert_eq!(config.jobs, vec![JobSpec::new(0, 5, 0), JobSpec::new(2, 3, 1)]);
        assert!(config.solve);
        assert!(config.options.stay_after_io);
        assert!(config.options.io_bump);
        assert_eq!(config.options.boost, 20);
    }

    #[test]
    fn empty_synthesized_workload_is_rejected() {
        assert_eq!(config(&["-j", "0"]).unwrap_err(), ConfigError::NoJobs);
    }

    #[test]
    fn io_time_past_the_clock_range_is_rejected() {
        let max = u64::MAX.to_string();
        assert_eq!(
            config(&["-l", "0,5,1", "-n", "1", "-i", &max, "-c"]).unwrap_err(),
            ConfigError::IoTimeOverflow { io_time: u64::MAX }
        );
        assert_eq!(
            config(&["-l", "0,5,1", "-i", "4611686018427387904"]).unwrap_err(),
            ConfigError::IoTimeOverflow { io_time: 1 << 62 }
        );

        let config = config(&["-l", "0,5,1:3,2,0", "-i", "1000000"]).unwrap();
        assert_eq!(config.options.io_time, 1_000_000);
    }
}
