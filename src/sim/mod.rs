pub mod driver;
pub mod job;

pub use driver::{Sim, Summary};
pub use job::{JobResult, JobSpec, parse_job_list, random_jobs, validate_jobs};
