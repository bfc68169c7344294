use super::{Dispatch, EnqueueFlags, Scheduler, SimCtx, TaskId};
use crate::core::DsqId;

/// First-come-first-served: one FIFO, every task runs to completion.
pub struct Fcfs {
    queue: DsqId,
}

impl Scheduler for Fcfs {
    type Params = ();

    fn init(ctx: &mut SimCtx, _params: ()) -> Self {
        Self {
            queue: ctx.create_dsq_fifo(),
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, _flags: EnqueueFlags) {
        ctx.dsq_push_back(self.queue, task);
    }

    fn select_next(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        ctx.dsq_pop_front(self.queue).map(Dispatch::to_completion)
    }
}
