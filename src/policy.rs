use crate::{
    core::Ticks,
    error::InputError,
    scheduler::{Aging, Fcfs, Feedback, Hrrn, QuantumRule, RoundRobin, Spn, Srt},
    sim::{Process, RunReport, Sim},
};
use std::{fmt, str::FromStr};
use tracing::info;

/// Which discipline to simulate, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fcfs,
    RoundRobin { quantum: Ticks },
    Spn,
    Srt,
    Hrrn,
    Feedback1,
    Feedback2i,
    Aging { quantum: Ticks },
}

impl Policy {
    /// Aging tasks never finish, so they have no turnaround to report.
    pub fn supports_stats(&self) -> bool {
        !matches!(self, Policy::Aging { .. })
    }

    /// Simulates ticks `0..horizon` on a private copy of `processes`.
    pub fn run(&self, processes: &[Process], horizon: Ticks, record_trace: bool) -> RunReport {
        info!(policy = %self, horizon, processes = processes.len(), "running policy");

        let report = match *self {
            Policy::Fcfs => Sim::<Fcfs>::new(processes, (), horizon, record_trace).run(),
            Policy::RoundRobin { quantum } => {
                Sim::<RoundRobin>::new(processes, quantum, horizon, record_trace).run()
            }
            Policy::Spn => Sim::<Spn>::new(processes, (), horizon, record_trace).run(),
            Policy::Srt => Sim::<Srt>::new(processes, (), horizon, record_trace).run(),
            Policy::Hrrn => Sim::<Hrrn>::new(processes, (), horizon, record_trace).run(),
            Policy::Feedback1 => {
                Sim::<Feedback>::new(processes, QuantumRule::Fixed(1), horizon, record_trace).run()
            }
            Policy::Feedback2i => {
                Sim::<Feedback>::new(processes, QuantumRule::Doubling, horizon, record_trace).run()
            }
            Policy::Aging { quantum } => {
                Sim::<Aging>::new(processes, quantum, horizon, record_trace).run()
            }
        };

        let completed = report.records.iter().filter(|r| r.is_complete()).count();
        info!(policy = %self, completed, total = report.records.len(), "policy finished");
        report
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Fcfs => write!(f, "FCFS"),
            Policy::RoundRobin { quantum } => write!(f, "RR-{quantum}"),
            Policy::Spn => write!(f, "SPN"),
            Policy::Srt => write!(f, "SRT"),
            Policy::Hrrn => write!(f, "HRRN"),
            Policy::Feedback1 => write!(f, "FB-1"),
            Policy::Feedback2i => write!(f, "FB-2i"),
            Policy::Aging { .. } => write!(f, "Aging"),
        }
    }
}

fn parse_quantum(policy: &str, value: Option<&str>) -> Result<Ticks, InputError> {
    let raw = value.unwrap_or_default().trim();
    match raw.parse::<Ticks>() {
        Ok(quantum) if quantum > 0 => Ok(quantum),
        _ => Err(InputError::InvalidQuantum {
            policy: policy.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Policy codes: `1` FCFS, `2-q` RR, `3` SPN, `4` SRT, `5` HRRN, `6` FB-1,
/// `7` FB-2i, `8-q` Aging.
impl FromStr for Policy {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (code, quantum) = match s.split_once('-') {
            Some((code, quantum)) => (code.trim(), Some(quantum)),
            None => (s, None),
        };

        let policy = match (code, quantum) {
            ("1", None) => Policy::Fcfs,
            ("2", q) => Policy::RoundRobin {
                quantum: parse_quantum("RR", q)?,
            },
            ("3", None) => Policy::Spn,
            ("4", None) => Policy::Srt,
            ("5", None) => Policy::Hrrn,
            ("6", None) => Policy::Feedback1,
            ("7", None) => Policy::Feedback2i,
            ("8", q) => Policy::Aging {
                quantum: parse_quantum("Aging", q)?,
            },
            _ => return Err(InputError::UnknownPolicy(s.to_string())),
        };
        Ok(policy)
    }
}
