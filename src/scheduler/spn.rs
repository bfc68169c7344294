use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, ShortestFirst};

/// Shortest-process-next: non-preemptive, least total service first,
/// earliest admission on ties.
pub struct Spn {
    ready: DsqId,
    next_seq: u64,
}

impl Scheduler for Spn {
    type Params = ();

    fn init(ctx: &mut SimCtx, _params: ()) -> Self {
        Self {
            ready: ctx.create_dsq_priq(),
            next_seq: 0,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        debug_assert_eq!(flags & ENQ_PREEMPT, 0, "SPN never preempts");
        let key = ShortestFirst {
            service: ctx.task(task).service_time,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        ctx.dsq_push_priq(self.ready, task, key);
    }

    fn select_next(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        ctx.dsq_pop_front(self.ready).map(Dispatch::to_completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Process, Sim};

    #[test]
    fn shortest_waiting_process_runs_next() {
        let processes = vec![
            Process::new('A', 0, 3),
            Process::new('B', 1, 5),
            Process::new('C', 2, 1),
        ];
        let report = Sim::<Spn>::new(&processes, (), 10, true).run();
        let finish: Vec<_> = report.records.iter().map(|r| r.finish_time).collect();
        assert_eq!(finish, vec![Some(3), Some(9), Some(4)]);
    }

    #[test]
    fn equal_service_goes_to_earlier_admission() {
        let processes = vec![
            Process::new('A', 0, 2),
            Process::new('B', 1, 2),
            Process::new('C', 1, 2),
        ];
        let report = Sim::<Spn>::new(&processes, (), 6, false).run();
        let finish: Vec<_> = report.records.iter().map(|r| r.finish_time).collect();
        assert_eq!(finish, vec![Some(2), Some(4), Some(6)]);
    }
}
