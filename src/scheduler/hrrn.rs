use super::{Dispatch, EnqueueFlags, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, Task, Ticks};

/// `(waiting + service) / service`, compared exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseRatio {
    pub waiting: Ticks,
    pub service: Ticks,
}

impl ResponseRatio {
    pub fn of(task: &Task, now: Ticks) -> Self {
        Self {
            waiting: now.saturating_sub(task.arrival_time),
            service: task.service_time,
        }
    }

    pub fn exceeds(&self, other: &Self) -> bool {
        let lhs = u128::from(self.waiting + self.service) * u128::from(other.service);
        let rhs = u128::from(other.waiting + other.service) * u128::from(self.service);
        lhs > rhs
    }

    pub fn value(&self) -> f64 {
        (self.waiting + self.service) as f64 / self.service as f64
    }
}

/// Highest-response-ratio-next: non-preemptive; the first candidate in
/// admission order wins ties.
pub struct Hrrn {
    ready: DsqId,
}

impl Scheduler for Hrrn {
    type Params = ();

    fn init(ctx: &mut SimCtx, _params: ()) -> Self {
        Self {
            ready: ctx.create_dsq_list(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, _flags: EnqueueFlags) {
        ctx.dsq_push_back(self.ready, task);
    }

    fn select_next(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let now = ctx.now;
        let mut best: Option<(usize, ResponseRatio)> = None;
        for (index, task) in ctx.dsq_tasks(self.ready).into_iter().enumerate() {
            let ratio = ResponseRatio::of(ctx.task(task), now);
            if best.is_none_or(|(_, top)| ratio.exceeds(&top)) {
                best = Some((index, ratio));
            }
        }

        let (index, _) = best?;
        ctx.dsq_remove_at(self.ready, index)
            .map(Dispatch::to_completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Process, Sim};

    fn ratio(waiting: Ticks, service: Ticks) -> ResponseRatio {
        ResponseRatio { waiting, service }
    }

    #[test]
    fn ratio_grows_with_waiting() {
        for waiting in 0..20 {
            assert!(ratio(waiting + 1, 4).exceeds(&ratio(waiting, 4)));
        }
        assert!(!ratio(2, 2).exceeds(&ratio(4, 4)));
        assert_eq!(ratio(3, 2).value(), 2.5);
    }

    #[test]
    fn old_long_process_overtakes_fresh_short_one() {
        // At t=6, A waited 6 on 3 of service (ratio 3.0); B just arrived (1.0).
        let processes = vec![
            Process::new('L', 0, 6),
            Process::new('A', 0, 3),
            Process::new('B', 6, 1),
        ];
        let report = Sim::<Hrrn>::new(&processes, (), 12, false).run();
        let finish: Vec<_> = report.records.iter().map(|r| r.finish_time).collect();
        assert_eq!(finish, vec![Some(6), Some(9), Some(10)]);
    }

    #[test]
    fn higher_ratio_beats_earlier_admission() {
        let processes = vec![
            Process::new('A', 0, 5),
            Process::new('B', 1, 4),
            Process::new('C', 2, 2),
        ];
        let report = Sim::<Hrrn>::new(&processes, (), 14, true).run();
        let timeline = report.timeline.expect("trace requested");
        assert_eq!(timeline.row_string(1), " ......****   ");
        assert_eq!(timeline.row_string(2), "  ...**       ");
    }
}
