use super::{Dispatch, EnqueueFlags, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, Ticks};

/// Round-robin over one FIFO with a fixed quantum.
///
/// A task whose quantum expires is re-enqueued at the tail on the next
/// tick, after that tick's arrivals, so newcomers that showed up during
/// (or exactly at the end of) its slice run first.
pub struct RoundRobin {
    queue: DsqId,
    quantum: Ticks,
}

impl Scheduler for RoundRobin {
    type Params = Ticks;

    fn init(ctx: &mut SimCtx, quantum: Ticks) -> Self {
        assert!(quantum > 0, "Round-robin quantum must be at least one tick");
        Self {
            queue: ctx.create_dsq_fifo(),
            quantum,
        }
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, _flags: EnqueueFlags) {
        ctx.dsq_push_back(self.queue, task);
    }

    fn select_next(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        ctx.dsq_pop_front(self.queue)
            .map(|task| Dispatch::with_slice(task, self.quantum))
    }
}
