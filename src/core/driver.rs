use std::mem;

use tracing::{debug, trace};

use super::{
    event::MlfqEvent,
    observer::Observer,
    state::{JobId, Level, MlfqCtx, Ticks, Wakeup},
};
use crate::{
    error::SimError,
    scheduler::{LevelTable, MlfqOptions},
};

fn violation(time: Ticks, detail: String) -> SimError {
    SimError::InvariantViolation { time, detail }
}

/// The MLFQ tick loop. Each `tick()` runs the steps below in a fixed order:
///
/// 1. `boost()`
/// 2. `apply_io_completions()`
/// 3. `select_next()`, idling one tick when nothing is runnable
/// 4. `execute_tick()`
/// 5. `reconcile_post_execution()`: completion, then I/O, then quantum expiry
///
/// The running job stays at the head of its queue until step 5 files it.
pub struct SchedCore {
    pub ctx: MlfqCtx,
    levels: LevelTable,
    options: MlfqOptions,
    observer: Observer,
    events: Vec<MlfqEvent>,
}

impl SchedCore {
    pub fn new(levels: LevelTable, options: MlfqOptions) -> Self {
        let ctx = MlfqCtx::new(levels.num_levels());
        Self {
            ctx,
            levels,
            options,
            observer: Observer::new(),
            events: Vec::new(),
        }
    }

    /// Register a job; it starts at the highest level and arrives at `start_time`.
    pub fn add_job(&mut self, start_time: Ticks, run_time: Ticks, io_freq: Ticks) -> JobId {
        let highest = self.levels.highest();
        self.ctx.create_job(
            start_time,
            run_time,
            io_freq,
            highest,
            self.levels.policy(highest),
        )
    }

    pub fn tick(&mut self) -> Result<Vec<MlfqEvent>, SimError> {
        self.boost();
        self.apply_io_completions();

        match self.select_next()? {
            Some(job) => {
                self.execute_tick(job)?;
                self.reconcile_post_execution(job)?;
            }
            None => {
                self.events.push(MlfqEvent::Idle { time: self.ctx.now });
                self.ctx.advance_time(1);
            }
        }

        self.observer.observe(&self.ctx);
        Ok(self.take_events())
    }

    /// Events recorded by the step methods since the last call.
    pub fn take_events(&mut self) -> Vec<MlfqEvent> {
        mem::take(&mut self.events)
    }

    /// Returns whether a boost happened at the current time.
    pub fn boost(&mut self) -> bool {
        let now = self.ctx.now;
        if !self.options.is_boost_tick(now) {
            return false;
        }

        self.events.push(MlfqEvent::Boost {
            time: now,
            every: self.options.boost,
        });

        let highest = self.levels.highest();
        for level in 0..highest {
            for job in self.ctx.queues.drain(level) {
                if !self.ctx.job(job).doing_io {
                    self.ctx.queues.push_back(highest, job);
                }
            }
        }

        // Blocked jobs are promoted too, for when they return
        let policy = self.levels.policy(highest);
        for job in self.ctx.jobs.iter_mut().filter(|job| !job.is_finished()) {
            job.move_to(highest, policy);
        }

        debug!(time = now, level = highest, "boosted all jobs");
        true
    }

    pub fn apply_io_completions(&mut self) {
        let now = self.ctx.now;
        for (job_id, reason) in self.ctx.io_ledger.take_due(now) {
            let job = self.ctx.job_mut(job_id);
            job.doing_io = false;
            let level = job.priority;

            self.events.push(MlfqEvent::Wakeup {
                time: now,
                job: job_id,
                reason,
            });

            if self.options.io_bump && reason == Wakeup::IoDone {
                self.ctx.queues.push_front(level, job_id);
            } else {
                self.ctx.queues.push_back(level, job_id);
            }
        }
    }

    /// Head of the highest non-empty queue, or `None` when the CPU idles.
    pub fn select_next(&self) -> Result<Option<JobId>, SimError> {
        let Some((level, job_id)) = self.ctx.queues.peek_highest() else {
            return Ok(None);
        };

        let priority = self.ctx.job(job_id).priority;
        if priority != level {
            return Err(violation(
                self.ctx.now,
                format!("priority {priority} of job {job_id} does not match queue {level}"),
            ));
        }

        trace!(time = self.ctx.now, job = job_id, level, "selected");
        Ok(Some(job_id))
    }

    pub fn execute_tick(&mut self, job_id: JobId) -> Result<(), SimError> {
        let now = self.ctx.now;
        let job = self.ctx.job_mut(job_id);

        job.time_left = job
            .time_left
            .checked_sub(1)
            .ok_or_else(|| violation(now, format!("job {job_id} ran with no time left")))?;
        job.ticks_left = job.ticks_left.saturating_sub(1);
        job.first_run.get_or_insert(now);

        self.events.push(MlfqEvent::Run {
            time: now,
            job: job_id,
            priority: job.priority,
            ticks_left: job.ticks_left,
            allotment_left: job.allotment_left,
            time_left: job.time_left,
            run_time: job.run_time,
        });

        self.ctx.advance_time(1);
        Ok(())
    }

    /// Completion, I/O issuance and quantum expiry for the job that just ran.
    pub fn reconcile_post_execution(&mut self, job_id: JobId) -> Result<(), SimError> {
        let now = self.ctx.now;
        let job = self.ctx.job(job_id);
        let level = job.priority;
        let quantum_expired = job.ticks_left == 0;

        if job.is_finished() {
            self.dequeue_running(level, job_id)?;
            self.ctx.job_mut(job_id).end_time = Some(now);
            self.ctx.finished += 1;
            self.events.push(MlfqEvent::Finished {
                time: now,
                job: job_id,
            });
            return Ok(());
        }

        let io_issued = job.io_due();
        if io_issued {
            self.dequeue_running(level, job_id)?;
            let job = self.ctx.job_mut(job_id);
            job.doing_io = true;
            let io_done = now.saturating_add(self.options.io_time);
            self.ctx.io_ledger.schedule(io_done, job_id, Wakeup::IoDone);
            self.events.push(MlfqEvent::IoStart {
                time: now,
                job: job_id,
            });
            debug!(time = now, job = job_id, until = io_done, "I/O issued");

            // The refill supersedes a coincident quantum expiry
            if self.options.stay_after_io {
                self.ctx.job_mut(job_id).refill(self.levels.policy(level));
                return Ok(());
            }
        }

        if !quantum_expired {
            return Ok(());
        }

        if !io_issued {
            self.dequeue_running(level, job_id)?;
        }

        let job = self.ctx.job_mut(job_id);
        job.allotment_left = job.allotment_left.saturating_sub(1);

        let next_level = if job.allotment_left == 0 {
            let lower = level.saturating_sub(1);
            job.move_to(lower, self.levels.policy(lower));
            if lower != level {
                debug!(time = now, job = job_id, from = level, to = lower, "demoted");
            }
            lower
        } else {
            job.ticks_left = self.levels.quantum(level);
            level
        };

        if !io_issued {
            self.ctx.queues.push_back(next_level, job_id);
        }
        Ok(())
    }

    fn dequeue_running(&mut self, level: Level, job_id: JobId) -> Result<(), SimError> {
        match self.ctx.queues.pop_front(level) {
            Some(head) if head == job_id => Ok(()),
            head => Err(violation(
                self.ctx.now,
                format!("expected running job {job_id} at head of queue {level}, found {head:?}"),
            )),
        }
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn is_done(&self) -> bool {
        self.ctx.all_finished()
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }
}
