use mlfq_model::{JobSpec, LevelTable, MlfqEvent, MlfqOptions, SchedCore, Sim};
use proptest::prelude::*;

// Every generated workload finishes well within this many ticks
const TICK_LIMIT: u64 = 100_000;

fn workload() -> impl Strategy<Value = Vec<JobSpec>> {
    prop::collection::vec(
        (0u64..20, 1u64..30, 0u64..6).prop_map(|(start, run, io)| JobSpec::new(start, run, io)),
        1..6,
    )
}

fn options() -> impl Strategy<Value = MlfqOptions> {
    (0u64..30, 0u64..6, any::<bool>(), any::<bool>()).prop_map(
        |(boost, io_time, stay_after_io, io_bump)| MlfqOptions {
            boost,
            io_time,
            stay_after_io,
            io_bump,
        },
    )
}

fn level_table() -> impl Strategy<Value = LevelTable> {
    (1usize..5, 1u64..6, 1u64..4).prop_map(|(levels, quantum, allotment)| {
        LevelTable::uniform(levels, quantum, allotment).unwrap()
    })
}

/// Drive the engine through its step methods, checking queue invariants
/// right after each boost and at the end of each tick.
fn drive_checked(core: &mut SchedCore) {
    let highest = core.levels().highest();

    while !core.is_done() {
        assert!(core.now() < TICK_LIMIT, "simulation did not terminate");

        if core.boost() {
            for job in core.ctx.jobs.iter().filter(|job| !job.is_finished()) {
                assert_eq!(job.priority, highest);
                if !job.doing_io && job.start_time < core.now() {
                    assert_eq!(core.ctx.queues.level_of(job.id), Some(highest));
                }
            }
        }
        core.apply_io_completions();
        match core.select_next().unwrap() {
            Some(job) => {
                core.execute_tick(job).unwrap();
                core.reconcile_post_execution(job).unwrap();
            }
            None => core.ctx.advance_time(1),
        }
        core.take_events();

        for job in &core.ctx.jobs {
            if let Some(level) = core.ctx.queues.level_of(job.id) {
                assert!(!job.doing_io, "job {} queued while blocked", job.id);
                assert_eq!(job.priority, level);
            }
        }
    }
}

proptest! {
    #[test]
    fn every_job_gets_exactly_its_run_time(
        jobs in workload(),
        levels in level_table(),
        options in options(),
    ) {
        let mut sim = Sim::new(jobs.clone(), levels, options);
        let mut ran = vec![0u64; jobs.len()];
        let mut last_time = None;

        while !sim.all_jobs_completed() {
            prop_assert!(sim.core.now() < TICK_LIMIT);
            for event in sim.step().unwrap() {
                if let MlfqEvent::Run { job, time, .. } = event {
                    // One CPU: at most one job per tick
                    prop_assert_ne!(last_time, Some(time));
                    last_time = Some(time);
                    ran[job] += 1;
                }
            }
        }

        let expected: Vec<u64> = jobs.iter().map(|job| job.run_time).collect();
        prop_assert_eq!(ran, expected);

        for result in sim.results() {
            let spec = jobs[result.id];
            prop_assert!(result.first_run >= spec.start_time);
            prop_assert!(result.end_time > result.first_run);
            prop_assert!(result.turnaround() >= spec.run_time);
        }
        prop_assert_eq!(sim.results().len(), jobs.len());
    }

    #[test]
    fn queues_stay_consistent_through_every_step(
        jobs in workload(),
        levels in level_table(),
        options in options(),
    ) {
        let mut core = SchedCore::new(levels, options);
        for job in &jobs {
            core.add_job(job.start_time, job.run_time, job.io_freq);
        }
        drive_checked(&mut core);
        prop_assert!(core.ctx.io_ledger.is_empty());
    }

    #[test]
    fn cpu_bound_job_sinks_one_level_per_allotment(
        levels in 2usize..5,
        quantum in 1u64..5,
        allotment in 1u64..3,
    ) {
        let table = LevelTable::uniform(levels, quantum, allotment).unwrap();
        let per_level = quantum * allotment;
        let run_time = per_level * levels as u64 + 1;
        let mut sim = Sim::new(vec![JobSpec::new(0, run_time, 0)], table, MlfqOptions::default());

        let mut priorities = Vec::new();
        while !sim.all_jobs_completed() {
            for event in sim.step().unwrap() {
                if let MlfqEvent::Run { priority, .. } = event {
                    priorities.push(priority);
                }
            }
        }

        for (tick, priority) in priorities.iter().enumerate() {
            let expected = (levels - 1).saturating_sub(tick / per_level as usize);
            prop_assert_eq!(*priority, expected);
        }
    }
}
