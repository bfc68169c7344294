use sched_sim::{
    Mode, Policy, Request, SimError,
    render::{render_request, render_run},
    sim::{WorkloadParams, bernoulli_processes},
};
use std::{
    io::{self, Read, Write},
    process::ExitCode,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const RANDOM_HORIZON: u64 = 30;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.as_slice() {
        [] => run_stdin(),
        [flag, seed] if flag == "--random" => match seed.parse::<u64>() {
            Ok(seed) => run_random(seed),
            Err(_) => {
                eprintln!("Error: invalid seed {seed:?}.");
                return ExitCode::FAILURE;
            }
        },
        _ => {
            eprintln!("Usage: sched_sim [--random <seed>] < request");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!(%e, "simulation failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Policies that fail are reported and skipped; the rest still run.
fn run_stdin() -> Result<ExitCode, SimError> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    let request: Request = text.parse()?;
    info!(
        policies = request.policies.len(),
        processes = request.processes.len(),
        horizon = request.horizon,
        "parsed request"
    );

    let mut code = ExitCode::SUCCESS;
    let mut stdout = io::stdout().lock();
    for (policy, out) in render_request(&request) {
        match out {
            Ok(out) => stdout.write_all(out.as_bytes())?,
            Err(e) => {
                error!(%policy, %e, "policy failed");
                stdout.flush()?;
                eprintln!("Error: {e}");
                code = ExitCode::FAILURE;
            }
        }
    }
    Ok(code)
}

fn run_random(seed: u64) -> Result<ExitCode, SimError> {
    let processes = bernoulli_processes(&WorkloadParams::default(), seed);
    info!(seed, processes = processes.len(), "generated workload");

    let policies = [
        Policy::Fcfs,
        Policy::RoundRobin { quantum: 1 },
        Policy::RoundRobin { quantum: 4 },
        Policy::Spn,
        Policy::Srt,
        Policy::Hrrn,
        Policy::Feedback1,
        Policy::Feedback2i,
        Policy::Aging { quantum: 1 },
    ];

    let mut stdout = io::stdout().lock();
    for policy in policies {
        let out = render_run(policy, Mode::Trace, &processes, RANDOM_HORIZON)?;
        stdout.write_all(out.as_bytes())?;
    }
    Ok(ExitCode::SUCCESS)
}
