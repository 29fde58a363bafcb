use rand::prelude::*;

use crate::{
    core::{Job, JobId, Ticks},
    error::ConfigError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSpec {
    pub start_time: Ticks,
    pub run_time: Ticks,
    pub io_freq: Ticks,
}

impl JobSpec {
    pub fn new(start_time: Ticks, run_time: Ticks, io_freq: Ticks) -> Self {
        Self {
            start_time,
            run_time,
            io_freq,
        }
    }
}

/// Parse `start,run,io_freq` triples separated by `:`.
pub fn parse_job_list(list: &str) -> Result<Vec<JobSpec>, ConfigError> {
    let jobs = list
        .split(':')
        .map(|descriptor| {
            let fields: Vec<Ticks> = descriptor
                .split(',')
                .map(|field| field.trim().parse::<Ticks>())
                .collect::<Result<_, _>>()
                .map_err(|_| ConfigError::MalformedJob(descriptor.to_string()))?;

            match fields[..] {
                [start_time, run_time, io_freq] => Ok(JobSpec::new(start_time, run_time, io_freq)),
                _ => Err(ConfigError::MalformedJob(descriptor.to_string())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_jobs(&jobs)?;
    Ok(jobs)
}

pub fn validate_jobs(jobs: &[JobSpec]) -> Result<(), ConfigError> {
    if jobs.is_empty() {
        return Err(ConfigError::NoJobs);
    }
    if let Some(job) = jobs.iter().position(|job| job.run_time == 0) {
        return Err(ConfigError::ZeroRunTime { job });
    }
    Ok(())
}

/// Jobs all start at 0; run time and I/O frequency are uniform in `[1, max)`.
pub fn random_jobs(num_jobs: usize, max_len: Ticks, max_io: Ticks, seed: u64) -> Vec<JobSpec> {
    let mut rng = StdRng::seed_from_u64(seed);

    (0..num_jobs)
        .map(|_| {
            let run_time = draw(&mut rng, max_len);
            let io_freq = draw(&mut rng, max_io);
            JobSpec::new(0, run_time, io_freq)
        })
        .collect()
}

fn draw(rng: &mut StdRng, max: Ticks) -> Ticks {
    if max <= 1 { 1 } else { rng.random_range(1..max) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobResult {
    pub id: JobId,
    pub start_time: Ticks,
    pub first_run: Ticks,
    pub end_time: Ticks,
}

impl JobResult {
    /// `None` until the job has finished.
    pub fn from_job(job: &Job) -> Option<Self> {
        Some(Self {
            id: job.id,
            start_time: job.start_time,
            first_run: job.first_run?,
            end_time: job.end_time?,
        })
    }

    pub fn response(&self) -> Ticks {
        self.first_run - self.start_time
    }

    pub fn turnaround(&self) -> Ticks {
        self.end_time - self.start_time
    }
}
