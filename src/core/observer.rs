use super::state::MlfqCtx;

#[derive(Debug, Default)]
pub struct Observer {
    step: u64,
}

impl Observer {
    pub fn new() -> Self {
        Self { step: 0 }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    // Runs between ticks, when no job is mid-execution
    pub fn observe(&mut self, ctx: &MlfqCtx) {
        self.step += 1;

        for level in 0..ctx.queues.num_levels() {
            for job_id in ctx.queues.jobs(level) {
                debug_assert_eq!(
                    ctx.queues.level_of(job_id),
                    Some(level),
                    "Queue {level} holds job {job_id}, but membership disagrees"
                );
            }
        }

        for (job_id, level) in ctx.queues.memberships() {
            let job = ctx.job(job_id);
            debug_assert!(
                !job.is_finished(),
                "Finished job {job_id} still present in queue {level}"
            );
            debug_assert!(
                !job.doing_io,
                "Job {job_id} is blocked on I/O but sits in queue {level}"
            );
            debug_assert_eq!(
                job.priority, level,
                "Job {job_id} at priority {} filed in queue {level}",
                job.priority
            );
            debug_assert!(
                ctx.queues.jobs(level).any(|queued| queued == job_id),
                "Membership claims job {job_id} in queue {level}, but queue does not contain it"
            );
        }

        for job in &ctx.jobs {
            debug_assert!(
                job.time_left <= job.run_time,
                "Job {} has more time left than it started with",
                job.id
            );
            let runnable = !job.is_finished() && !job.doing_io && job.start_time < ctx.now;
            debug_assert_eq!(
                ctx.queues.level_of(job.id).is_some(),
                runnable,
                "Job {} queued state does not match runnable state",
                job.id
            );
        }
    }
}
