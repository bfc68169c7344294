use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, Ticks};
use tracing::debug;

/// Quantum granted at each feedback level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantumRule {
    /// Same quantum at every level (FB-1 uses 1).
    Fixed(Ticks),
    /// `2^level` ticks (FB-2i).
    Doubling,
}

impl QuantumRule {
    pub fn quantum(self, level: usize) -> Ticks {
        match self {
            QuantumRule::Fixed(quantum) => quantum,
            QuantumRule::Doubling => u32::try_from(level)
                .ok()
                .and_then(|shift| 1u64.checked_shl(shift))
                .unwrap_or(Ticks::MAX),
        }
    }
}

/// Multilevel feedback: FIFO per level, level 0 first. Arrivals enter
/// level 0; a task whose quantum expires drops one level. Levels are
/// created on first use.
pub struct Feedback {
    rule: QuantumRule,
    levels: Vec<DsqId>,
    running_level: usize,
    admitted: usize,
}

impl Feedback {
    fn level(&mut self, ctx: &mut SimCtx, index: usize) -> DsqId {
        while self.levels.len() <= index {
            self.levels.push(ctx.create_dsq_fifo());
        }
        self.levels[index]
    }

    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    // While the system has only ever seen one process, it is pulled back
    // from level 1 to level 0 instead of sinking with every quantum.
    fn promote_lone_process(&mut self, ctx: &mut SimCtx) {
        if self.admitted != 1 {
            return;
        }
        let [top, next, ..] = self.levels[..] else {
            return;
        };
        if !ctx.dsq_is_empty(top) {
            return;
        }
        if let Some(task) = ctx.dsq_pop_front(next) {
            debug!(task, "promoting lone process back to level 0");
            ctx.dsq_push_back(top, task);
        }
    }
}

impl Scheduler for Feedback {
    type Params = QuantumRule;

    fn init(_ctx: &mut SimCtx, rule: QuantumRule) -> Self {
        if let QuantumRule::Fixed(quantum) = rule {
            assert!(quantum > 0, "Feedback quantum must be at least one tick");
        }
        Self {
            rule,
            levels: Vec::new(),
            running_level: 0,
            admitted: 0,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        let index = if flags & ENQ_PREEMPT != 0 {
            self.running_level + 1
        } else {
            self.admitted += 1;
            0
        };
        let dsq = self.level(ctx, index);
        ctx.dsq_push_back(dsq, task);
    }

    fn select_next(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        self.promote_lone_process(ctx);

        for level in 0..self.levels.len() {
            if let Some(task) = ctx.dsq_pop_front(self.levels[level]) {
                self.running_level = level;
                return Some(Dispatch::with_slice(task, self.rule.quantum(level)));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Process, Sim};

    #[test]
    fn doubling_quanta() {
        assert_eq!(QuantumRule::Doubling.quantum(0), 1);
        assert_eq!(QuantumRule::Doubling.quantum(3), 8);
        assert_eq!(QuantumRule::Doubling.quantum(64), Ticks::MAX);
        assert_eq!(QuantumRule::Fixed(1).quantum(5), 1);
    }

    #[test]
    fn lone_process_stays_near_the_top() {
        let processes = vec![Process::new('A', 0, 10), Process::new('B', 5, 3)];
        let report = Sim::<Feedback>::new(&processes, QuantumRule::Doubling, 20, true).run();
        let timeline = report.timeline.expect("trace requested");

        // A sits at level 1 when B arrives, so it gets a two-tick slice next.
        assert_eq!(timeline.row_string(0), "*****.**..***       ");
        assert_eq!(timeline.row_string(1), "     *..**          ");
    }

    #[test]
    fn lone_process_that_finished_leaves_cpu_idle() {
        let processes = vec![Process::new('A', 1, 3)];
        let report = Sim::<Feedback>::new(&processes, QuantumRule::Fixed(1), 6, true).run();
        assert_eq!(report.records[0].finish_time, Some(4));
        assert_eq!(report.timeline.expect("trace requested").row_string(0), " ***  ");
    }

    #[test]
    fn expired_tasks_sink_one_level() {
        let processes = vec![Process::new('A', 0, 3), Process::new('B', 0, 3)];
        let mut sim = Sim::<Feedback>::new(&processes, QuantumRule::Fixed(1), 6, false);
        for _ in 0..4 {
            sim.step();
        }
        assert_eq!(sim.core.scheduler.num_levels(), 3);
        let report = sim.run();
        let finish: Vec<_> = report.records.iter().map(|r| r.finish_time).collect();
        assert_eq!(finish, vec![Some(5), Some(6)]);
    }
}
