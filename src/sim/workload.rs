use super::process::Process;
use crate::core::state::Ticks;
use rand::prelude::*;

const NAMES: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadParams {
    /// Ticks during which arrivals may happen.
    pub ticks: Ticks,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_ticks: Ticks,
    pub long_ticks: Ticks,
    pub max_priority: u64,
}

impl Default for WorkloadParams {
    fn default() -> Self {
        Self {
            ticks: 12,
            p_arrival: 0.4,
            p_short: 0.4,
            short_ticks: 2,
            long_ticks: 5,
            max_priority: 4,
        }
    }
}

/// At most one arrival per tick with probability `p_arrival`; each arrival
/// is short with probability `p_short`. Stops once names run out.
pub fn bernoulli_processes(params: &WorkloadParams, seed: u64) -> Vec<Process> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut processes = Vec::new();
    let mut names = NAMES.chars();

    for t in 0..params.ticks {
        if rng.random::<f64>() >= params.p_arrival {
            continue;
        }
        let Some(name) = names.next() else {
            break;
        };

        let service_time = if rng.random::<f64>() < params.p_short {
            params.short_ticks
        } else {
            params.long_ticks
        };
        let priority = rng.random_range(1..=params.max_priority.max(1));

        processes.push(Process::new(name, t, service_time).with_priority(priority));
    }

    processes
}
