use crate::{core::Ticks, sim::ProcessRecord};
use average::{Estimate, Mean};

#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
    pub name: char,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub finish_time: Option<Ticks>,
    pub turnaround: Option<Ticks>,
    pub normalized_turnaround: Option<f64>,
}

/// Turnaround figures for one policy run. Processes that did not finish
/// before the horizon have no figures and are left out of the means.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub rows: Vec<StatsRow>,
    pub mean_turnaround: Option<f64>,
    pub mean_normalized_turnaround: Option<f64>,
}

impl StatsReport {
    pub fn from_records(records: &[ProcessRecord]) -> Self {
        let rows: Vec<StatsRow> = records
            .iter()
            .map(|record| StatsRow {
                name: record.process.name,
                arrival_time: record.process.arrival_time,
                service_time: record.process.service_time,
                finish_time: record.finish_time,
                turnaround: record.turnaround(),
                normalized_turnaround: record.normalized_turnaround(),
            })
            .collect();

        let mean_turnaround = mean(rows.iter().filter_map(|r| r.turnaround.map(|t| t as f64)));
        let mean_normalized_turnaround =
            mean(rows.iter().filter_map(|r| r.normalized_turnaround));

        Self {
            rows,
            mean_turnaround,
            mean_normalized_turnaround,
        }
    }

    pub fn completed(&self) -> usize {
        self.rows.iter().filter(|r| r.finish_time.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.completed() == self.rows.len()
    }
}

fn mean(iter: impl Iterator<Item = f64>) -> Option<f64> {
    let mean: Mean = iter.collect();
    (!mean.is_empty()).then(|| mean.estimate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Process;

    fn record(name: char, arrival: Ticks, service: Ticks, finish: Option<Ticks>) -> ProcessRecord {
        ProcessRecord {
            process: Process::new(name, arrival, service),
            finish_time: finish,
        }
    }

    #[test]
    fn turnaround_and_means() {
        let records = vec![
            record('A', 0, 3, Some(3)),
            record('B', 2, 6, Some(9)),
            record('C', 4, 4, Some(13)),
        ];
        let report = StatsReport::from_records(&records);

        assert_eq!(report.rows[1].turnaround, Some(7));
        assert_eq!(report.rows[2].normalized_turnaround, Some(2.25));
        assert!((report.mean_turnaround.unwrap() - 19.0 / 3.0).abs() < 1e-9);
        let expected = (1.0 + 7.0 / 6.0 + 2.25) / 3.0;
        assert!((report.mean_normalized_turnaround.unwrap() - expected).abs() < 1e-9);
        assert!(report.is_complete());
    }

    #[test]
    fn unfinished_processes_have_no_figures() {
        let records = vec![record('A', 0, 3, Some(3)), record('B', 1, 4, None)];
        let report = StatsReport::from_records(&records);

        assert_eq!(report.rows[1].turnaround, None);
        assert_eq!(report.rows[1].normalized_turnaround, None);
        assert_eq!(report.mean_turnaround, Some(3.0));
        assert_eq!(report.completed(), 1);
        assert!(!report.is_complete());

        let none = StatsReport::from_records(&[record('Z', 0, 2, None)]);
        assert_eq!(none.mean_turnaround, None);
        assert_eq!(none.mean_normalized_turnaround, None);
    }

    #[test]
    fn deriving_twice_is_identical() {
        let records = vec![record('A', 0, 3, Some(4)), record('B', 1, 2, Some(6))];
        let first = StatsReport::from_records(&records);
        let second = StatsReport::from_records(&records);
        assert_eq!(first, second);
    }
}
