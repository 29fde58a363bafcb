//! Human-readable rendering of a run: the input listing, one line per engine
//! event and the final per-job statistics. Nothing here feeds back into the
//! engine.

use std::{
    fmt,
    io::{self, Write},
};

use crate::{
    core::{MlfqEvent, Wakeup},
    scheduler::{LevelTable, MlfqOptions},
    sim::{JobSpec, Summary},
};

impl fmt::Display for Wakeup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JobBegins => f.write_str("JOB BEGINS"),
            Self::IoDone => f.write_str("IO_DONE"),
        }
    }
}

impl fmt::Display for MlfqEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ time {} ] ", self.time())?;
        match self {
            Self::Boost { every, .. } => write!(f, "BOOST ( every {every} )"),
            Self::Wakeup { job, reason, .. } => write!(f, "{reason} by JOB {job}"),
            Self::Idle { .. } => f.write_str("IDLE"),
            Self::Run {
                job,
                priority,
                ticks_left,
                allotment_left,
                time_left,
                run_time,
                ..
            } => write!(
                f,
                "Run JOB {job} at PRIORITY {priority} [ TICKS {ticks_left} ALLOT {allotment_left} TIME {time_left} (of {run_time}) ]"
            ),
            Self::Finished { job, .. } => write!(f, "FINISHED JOB {job}"),
            Self::IoStart { job, .. } => write!(f, "IO_START by JOB {job}"),
        }
    }
}

pub fn write_inputs(
    out: &mut impl Write,
    levels: &LevelTable,
    options: &MlfqOptions,
    jobs: &[JobSpec],
) -> io::Result<()> {
    writeln!(out, "Here is the list of inputs:")?;
    writeln!(out, "OPTIONS jobs {}", jobs.len())?;
    writeln!(out, "OPTIONS queues {}", levels.num_levels())?;
    for (level, policy) in levels.iter_highest_first() {
        writeln!(
            out,
            "OPTIONS allotments for queue {level:2} is {:3}",
            policy.allotment
        )?;
        writeln!(
            out,
            "OPTIONS quantum length for queue {level:2} is {:3}",
            policy.quantum
        )?;
    }
    writeln!(out, "OPTIONS boost {}", options.boost)?;
    writeln!(out, "OPTIONS ioTime {}", options.io_time)?;
    writeln!(out, "OPTIONS stayAfterIO {}", flag(options.stay_after_io))?;
    writeln!(out, "OPTIONS iobump {}", flag(options.io_bump))?;
    writeln!(out, "\n")?;

    writeln!(out, "For each job, three defining characteristics are given:")?;
    writeln!(out, "  startTime : at what time does the job enter the system")?;
    writeln!(out, "  runTime   : the total CPU time needed by the job to finish")?;
    writeln!(out, "  ioFreq    : every ioFreq time units, the job issues an I/O")?;
    writeln!(out, "              (the I/O takes ioTime units to complete)\n")?;

    writeln!(out, "Job List:")?;
    for (id, job) in jobs.iter().enumerate() {
        writeln!(
            out,
            "  Job {id:2}: startTime {:3} - runTime {:3} - ioFreq {:3}",
            job.start_time, job.run_time, job.io_freq
        )?;
    }
    writeln!(out)
}

fn flag(on: bool) -> &'static str {
    if on { "True" } else { "False" }
}

pub fn write_prompt(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "Compute the execution trace for the given workloads.")?;
    writeln!(out, "If you would like, also compute the response and turnaround")?;
    writeln!(out, "times for each of the jobs.")?;
    writeln!(out)?;
    writeln!(out, "Use the -c flag to get the exact results when you are finished.\n")
}

pub fn write_trace_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "\nExecution Trace:\n")
}

pub fn write_event(out: &mut impl Write, event: &MlfqEvent) -> io::Result<()> {
    writeln!(out, "{event}")
}

pub fn write_summary(out: &mut impl Write, summary: &Summary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Final stats:")?;
    for job in &summary.jobs {
        writeln!(
            out,
            "  Job {:2}: startTime {:3} - response {:3} - turnaround {:3}",
            job.id,
            job.start_time,
            job.response(),
            job.turnaround()
        )?;
    }
    writeln!(
        out,
        "\n  Avg response {:.2} - turnaround {:.2}",
        summary.avg_response, summary.avg_turnaround
    )?;
    writeln!(out, "\n")
}
