use rustc_hash::FxHashMap;
use std::collections::VecDeque;

use crate::scheduler::LevelPolicy;

// Index into Job Vec
pub type JobId = usize;
// 0 is the lowest priority
pub type Level = usize;
pub type Ticks = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wakeup {
    JobBegins,
    IoDone,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub start_time: Ticks,
    pub run_time: Ticks,
    pub time_left: Ticks,
    pub io_freq: Ticks,
    pub priority: Level,
    pub ticks_left: Ticks,
    pub allotment_left: u64,
    pub doing_io: bool,
    pub first_run: Option<Ticks>,
    pub end_time: Option<Ticks>,
}

impl Job {
    pub fn consumed(&self) -> Ticks {
        self.run_time - self.time_left
    }

    pub fn is_finished(&self) -> bool {
        self.time_left == 0
    }

    /// Due for I/O given the run time consumed so far.
    pub fn io_due(&self) -> bool {
        self.io_freq > 0 && self.consumed() % self.io_freq == 0
    }

    pub fn refill(&mut self, policy: LevelPolicy) {
        self.ticks_left = policy.quantum;
        self.allotment_left = policy.allotment;
    }

    pub fn move_to(&mut self, level: Level, policy: LevelPolicy) {
        self.priority = level;
        self.refill(policy);
    }
}

/// One FIFO run-queue per level.
#[derive(Debug)]
pub struct QueueSet {
    queues: Vec<VecDeque<JobId>>,
    job_to_level: FxHashMap<JobId, Level>,
}

impl QueueSet {
    pub fn new(num_levels: usize) -> Self {
        Self {
            queues: (0..num_levels).map(|_| VecDeque::new()).collect(),
            job_to_level: FxHashMap::default(),
        }
    }

    fn claim(&mut self, level: Level, job: JobId) {
        let prev = self.job_to_level.insert(job, level);
        assert!(prev.is_none(), "Job {job} already present in queue {prev:?}");
    }

    pub fn push_back(&mut self, level: Level, job: JobId) {
        self.claim(level, job);
        self.queues[level].push_back(job);
    }

    pub fn push_front(&mut self, level: Level, job: JobId) {
        self.claim(level, job);
        self.queues[level].push_front(job);
    }

    pub fn pop_front(&mut self, level: Level) -> Option<JobId> {
        let job = self.queues[level].pop_front()?;
        let removed = self.job_to_level.remove(&job);
        debug_assert_eq!(removed, Some(level), "Job {job} missing queue membership");
        Some(job)
    }

    /// Empty `level`, returning its jobs in queue order.
    pub fn drain(&mut self, level: Level) -> Vec<JobId> {
        let jobs: Vec<JobId> = self.queues[level].drain(..).collect();
        for job in &jobs {
            self.job_to_level.remove(job);
        }
        jobs
    }

    /// Head of the highest non-empty queue.
    pub fn peek_highest(&self) -> Option<(Level, JobId)> {
        self.queues
            .iter()
            .enumerate()
            .rev()
            .find_map(|(level, queue)| queue.front().map(|&job| (level, job)))
    }

    pub fn level_of(&self, job: JobId) -> Option<Level> {
        self.job_to_level.get(&job).copied()
    }

    pub fn jobs(&self, level: Level) -> impl Iterator<Item = JobId> + '_ {
        self.queues[level].iter().copied()
    }

    pub fn num_levels(&self) -> usize {
        self.queues.len()
    }

    pub fn memberships(&self) -> impl Iterator<Item = (JobId, Level)> + '_ {
        self.job_to_level.iter().map(|(&job, &level)| (job, level))
    }
}

/// Future tick -> unblock events due at that tick, in registration order.
#[derive(Debug, Default)]
pub struct IoLedger {
    pending: FxHashMap<Ticks, Vec<(JobId, Wakeup)>>,
}

impl IoLedger {
    pub fn schedule(&mut self, at: Ticks, job: JobId, reason: Wakeup) {
        self.pending.entry(at).or_default().push((job, reason));
    }

    /// Consume the events due at `now`; they are never returned again.
    pub fn take_due(&mut self, now: Ticks) -> Vec<(JobId, Wakeup)> {
        self.pending.remove(&now).unwrap_or_default()
    }

    pub fn due(&self, at: Ticks) -> &[(JobId, Wakeup)] {
        self.pending.get(&at).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[derive(Debug)]
pub struct MlfqCtx {
    pub now: Ticks,
    pub jobs: Vec<Job>,
    pub queues: QueueSet,
    pub io_ledger: IoLedger,
    pub finished: usize,
}

impl MlfqCtx {
    pub fn new(num_levels: usize) -> Self {
        Self {
            now: 0,
            jobs: Vec::new(),
            queues: QueueSet::new(num_levels),
            io_ledger: IoLedger::default(),
            finished: 0,
        }
    }

    /// New jobs enter at `level` and arrive through the ledger at `start_time`.
    pub fn create_job(
        &mut self,
        start_time: Ticks,
        run_time: Ticks,
        io_freq: Ticks,
        level: Level,
        policy: LevelPolicy,
    ) -> JobId {
        let id = self.jobs.len();
        self.jobs.push(Job {
            id,
            start_time,
            run_time,
            time_left: run_time,
            io_freq,
            priority: level,
            ticks_left: policy.quantum,
            allotment_left: policy.allotment,
            doing_io: false,
            first_run: None,
            end_time: None,
        });
        self.io_ledger.schedule(start_time, id, Wakeup::JobBegins);

        id
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn job(&self, job: JobId) -> &Job {
        &self.jobs[job]
    }

    pub fn job_mut(&mut self, job: JobId) -> &mut Job {
        &mut self.jobs[job]
    }

    pub fn all_finished(&self) -> bool {
        self.finished == self.jobs.len()
    }
}
