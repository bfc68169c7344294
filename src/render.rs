use crate::{
    core::{Ticks, Timeline},
    error::SimError,
    input::{Mode, Request},
    policy::Policy,
    sim::{Process, ProcessRecord},
    stats::StatsReport,
};
use std::fmt;

/// Character grid: `*` running, `.` waiting, blank idle.
pub struct TraceView<'a> {
    pub label: &'a str,
    pub records: &'a [ProcessRecord],
    pub timeline: &'a Timeline,
}

impl fmt::Display for TraceView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let horizon = self.timeline.horizon();
        let rule = "-".repeat(horizon as usize * 2 + 8);

        write!(f, "{:<6}", self.label)?;
        for t in 0..=horizon {
            write!(f, "{} ", t % 10)?;
        }
        writeln!(f)?;
        writeln!(f, "{rule}")?;

        for (task, record) in self.records.iter().enumerate() {
            write!(f, "{}     ", record.process.name)?;
            for cell in self.timeline.row(task) {
                write!(f, "|{}", cell.symbol())?;
            }
            if horizon > 0 {
                write!(f, "| ")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{rule}")?;
        writeln!(f)
    }
}

/// Fixed-width turnaround table; unfinished processes show `-`.
pub struct StatsView<'a> {
    pub label: &'a str,
    pub report: &'a StatsReport,
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn fixed2_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

impl fmt::Display for StatsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = &self.report.rows;
        writeln!(f, "{}", self.label)?;

        write!(f, "Process    |")?;
        for row in rows {
            write!(f, "  {}  |", row.name)?;
        }
        writeln!(f)?;

        write!(f, "Arrival    |")?;
        for row in rows {
            write!(f, "  {}  |", row.arrival_time)?;
        }
        writeln!(f)?;

        write!(f, "Service    |")?;
        for row in rows {
            write!(f, "  {}  |", row.service_time)?;
        }
        writeln!(f, " Mean|")?;

        write!(f, "Finish     |")?;
        for row in rows {
            write!(f, "{:>3}  |", or_dash(row.finish_time))?;
        }
        writeln!(f, "-----|")?;

        write!(f, "Turnaround |")?;
        for row in rows {
            write!(f, "{:>3}  |", or_dash(row.turnaround))?;
        }
        writeln!(f, "{:>5}|", fixed2_or_dash(self.report.mean_turnaround))?;

        write!(f, "NormTurn   |")?;
        for row in rows {
            write!(f, "{:>5}|", fixed2_or_dash(row.normalized_turnaround))?;
        }
        writeln!(f, "{:>5}|", fixed2_or_dash(self.report.mean_normalized_turnaround))?;
        writeln!(f)
    }
}

pub fn render_trace(label: &str, records: &[ProcessRecord], timeline: &Timeline) -> String {
    TraceView {
        label,
        records,
        timeline,
    }
    .to_string()
}

pub fn render_stats(label: &str, report: &StatsReport) -> String {
    StatsView { label, report }.to_string()
}

/// Runs one policy and renders it in the requested mode.
pub fn render_run(
    policy: Policy,
    mode: Mode,
    processes: &[Process],
    horizon: Ticks,
) -> Result<String, SimError> {
    let label = policy.to_string();
    match mode {
        Mode::Trace => {
            let report = policy.run(processes, horizon, true);
            let timeline = report
                .timeline
                .as_ref()
                .expect("Trace run must record a timeline");
            Ok(render_trace(&label, &report.records, timeline))
        }
        Mode::Stats => {
            if !policy.supports_stats() {
                return Err(SimError::StatsUnsupported(label));
            }
            let report = policy.run(processes, horizon, false);
            Ok(render_stats(&label, &StatsReport::from_records(&report.records)))
        }
    }
}

/// Renders every policy of `request` in order. A policy that fails does not
/// stop the ones listed after it.
pub fn render_request(request: &Request) -> Vec<(Policy, Result<String, SimError>)> {
    request
        .policies
        .iter()
        .map(|&policy| {
            let out = render_run(policy, request.mode, &request.processes, request.horizon);
            (policy, out)
        })
        .collect()
}
