use crate::{core::Ticks, error::InputError, policy::Policy, sim::Process};
use rustc_hash::FxHashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Trace,
    Stats,
}

impl FromStr for Mode {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "trace" => Ok(Mode::Trace),
            "stats" => Ok(Mode::Stats),
            other => Err(InputError::UnknownMode(other.to_string())),
        }
    }
}

/// A fully validated simulation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub mode: Mode,
    pub policies: Vec<Policy>,
    pub horizon: Ticks,
    pub processes: Vec<Process>,
}

fn parse_number(field: &'static str, raw: &str) -> Result<u64, InputError> {
    let raw = raw.trim();
    raw.parse().map_err(|_| InputError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn parse_process(line: usize, text: &str) -> Result<Process, InputError> {
    let fail = |reason: &str| InputError::ProcessLine {
        line,
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    let [name, arrival, value] = fields[..] else {
        return Err(fail("expected name,arrival,service"));
    };

    let mut chars = name.chars();
    let (Some(name), None) = (chars.next(), chars.next()) else {
        return Err(fail("name must be a single character"));
    };

    let arrival_time = parse_number("arrival time", arrival)?;
    let service_time = parse_number("service time", value)?;
    if service_time == 0 {
        return Err(InputError::ZeroDemand(name));
    }
    Ok(Process::new(name, arrival_time, service_time))
}

impl FromStr for Request {
    type Err = InputError;

    /// Mode, comma-separated policy codes, horizon, process count, then one
    /// `name,arrival,service` line per process. Horizon and count may share
    /// a line; blank lines are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (_, mode) = lines.next().ok_or(InputError::Missing("mode"))?;
        let mode = mode.parse::<Mode>()?;

        let (_, policies) = lines.next().ok_or(InputError::Missing("policies"))?;
        let policies = policies
            .split(',')
            .map(str::parse::<Policy>)
            .collect::<Result<Vec<_>, _>>()?;

        let (_, numbers) = lines.next().ok_or(InputError::Missing("horizon"))?;
        let mut numbers = numbers.split_whitespace();
        let horizon = parse_number("horizon", numbers.next().unwrap_or_default())?;
        let count = match numbers.next() {
            Some(count) => count,
            None => lines.next().ok_or(InputError::Missing("process count"))?.1,
        };
        let count = parse_number("process count", count)?;

        let mut processes = Vec::new();
        let mut seen: FxHashMap<char, usize> = FxHashMap::default();
        for _ in 0..count {
            let (line, text) = lines.next().ok_or(InputError::Missing("process line"))?;
            let process = parse_process(line, text)?;
            if seen.insert(process.name, line).is_some() {
                return Err(InputError::DuplicateName(process.name));
            }
            processes.push(process);
        }

        if processes.is_empty() {
            return Err(InputError::EmptyWorkload);
        }

        Ok(Request {
            mode,
            policies,
            horizon,
            processes,
        })
    }
}
