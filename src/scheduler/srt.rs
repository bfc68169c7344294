use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, Scheduler, SimCtx, TaskId};
use crate::core::DsqId;

/// Shortest-remaining-time. The running task gets a one-tick slice and goes
/// back to the head of the candidate list, which is stable-sorted by
/// remaining service before every pick: a newcomer only takes the CPU with
/// strictly less remaining service.
pub struct Srt {
    ready: DsqId,
}

impl Scheduler for Srt {
    type Params = ();

    fn init(ctx: &mut SimCtx, _params: ()) -> Self {
        Self {
            ready: ctx.create_dsq_list(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        if flags & ENQ_PREEMPT != 0 {
            ctx.dsq_push_front(self.ready, task);
        } else {
            ctx.dsq_push_back(self.ready, task);
        }
    }

    fn select_next(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        ctx.dsq_reorder(self.ready, |order, tasks| {
            order.sort_by_key(|&t| tasks[t].remaining_service)
        });
        ctx.dsq_pop_front(self.ready)
            .map(|task| Dispatch::with_slice(task, 1))
    }
}
