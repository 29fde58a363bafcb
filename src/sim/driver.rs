use average::{Estimate, Mean};
use tracing::info;

use super::job::{JobResult, JobSpec};
use crate::{
    core::{MlfqEvent, SchedCore},
    error::SimError,
    scheduler::{LevelTable, MlfqOptions},
};

pub struct Sim {
    pub core: SchedCore,
    jobs: Vec<JobSpec>,
}

impl Sim {
    /// Job ids follow the order of `jobs`; ties at the same arrival tick
    /// enter their queue in that order.
    pub fn new(jobs: Vec<JobSpec>, levels: LevelTable, options: MlfqOptions) -> Self {
        let mut core = SchedCore::new(levels, options);
        for job in &jobs {
            core.add_job(job.start_time, job.run_time, job.io_freq);
        }

        Self { core, jobs }
    }

    pub fn step(&mut self) -> Result<Vec<MlfqEvent>, SimError> {
        self.core.tick()
    }

    /// Tick until every job has finished, handing each event to `on_event`.
    pub fn run(&mut self, mut on_event: impl FnMut(&MlfqEvent)) -> Result<Summary, SimError> {
        while !self.all_jobs_completed() {
            for event in self.step()? {
                on_event(&event);
            }
        }

        info!(
            jobs = self.jobs.len(),
            ticks = self.core.now(),
            "all jobs completed"
        );
        Ok(Summary::new(self.results()))
    }

    pub fn all_jobs_completed(&self) -> bool {
        self.core.is_done()
    }

    /// Results for the jobs that have finished so far.
    pub fn results(&self) -> Vec<JobResult> {
        self.core
            .ctx
            .jobs
            .iter()
            .filter_map(JobResult::from_job)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Summary {
    pub jobs: Vec<JobResult>,
    pub avg_response: f64,
    pub avg_turnaround: f64,
}

impl Summary {
    pub fn new(jobs: Vec<JobResult>) -> Self {
        let avg_response = avg(jobs.iter().map(|job| job.response() as f64));
        let avg_turnaround = avg(jobs.iter().map(|job| job.turnaround() as f64));
        Self {
            jobs,
            avg_response,
            avg_turnaround,
        }
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<Mean>().estimate()
}
