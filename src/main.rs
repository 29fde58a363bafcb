use std::io::{self, BufWriter, Write};

use anyhow::Context;
use clap::Parser;
use mlfq_model::{Args, Sim, logging::init_tracing, report};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Args::parse()
        .into_config()
        .context("invalid configuration")?;
    info!(
        jobs = config.jobs.len(),
        levels = config.levels.num_levels(),
        solve = config.solve,
        "configuration loaded"
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    report::write_inputs(&mut out, &config.levels, &config.options, &config.jobs)?;
    if !config.solve {
        report::write_prompt(&mut out)?;
        out.flush()?;
        return Ok(());
    }

    report::write_trace_header(&mut out)?;
    let mut sim = Sim::new(config.jobs, config.levels, config.options);

    let mut write_err = None;
    let outcome = sim.run(|event| {
        if write_err.is_none() {
            if let Err(err) = report::write_event(&mut out, event) {
                write_err = Some(err);
            }
        }
    });
    if let Some(err) = write_err {
        return Err(err).context("failed to write trace");
    }

    // Flush the partial trace before reporting an aborted run
    out.flush()?;
    let summary = outcome.context("simulation aborted")?;

    report::write_summary(&mut out, &summary)?;
    out.flush()?;
    Ok(())
}
