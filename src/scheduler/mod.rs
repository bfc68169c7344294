pub mod aging;
pub mod fcfs;
pub mod feedback;
pub mod hrrn;
pub mod round_robin;
pub mod spn;
pub mod srt;

use crate::core::{
    Ticks,
    state::{SimCtx, TaskId},
};
pub use aging::Aging;
pub use fcfs::Fcfs;
pub use feedback::{Feedback, QuantumRule};
pub use hrrn::Hrrn;
pub use round_robin::RoundRobin;
pub use spn::Spn;
pub use srt::Srt;

pub type EnqueueFlags = u64;

pub const ENQ_WAKEUP: EnqueueFlags = 1 << 0;
pub const ENQ_PREEMPT: EnqueueFlags = 1 << 1;

/// The task a policy picked and how long it may hold the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub task: TaskId,
    /// `None` runs the task to completion.
    pub slice: Option<Ticks>,
}

impl Dispatch {
    pub fn to_completion(task: TaskId) -> Self {
        Self { task, slice: None }
    }

    pub fn with_slice(task: TaskId, slice: Ticks) -> Self {
        Self {
            task,
            slice: Some(slice),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continues,
    Preempts,
    Completes,
}

pub trait Scheduler {
    type Params;

    fn init(ctx: &mut SimCtx, params: Self::Params) -> Self;

    /// Whether running draws down remaining service.
    fn consumes_service(&self) -> bool {
        true
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags);

    /// Only called while the CPU is idle.
    fn select_next(&mut self, ctx: &mut SimCtx) -> Option<Dispatch>;

    fn on_tick_consumed(&mut self, ctx: &SimCtx, task: TaskId) -> TickOutcome {
        let task = ctx.task(task);
        if self.consumes_service() && task.remaining_service == 0 {
            TickOutcome::Completes
        } else if task
            .allocated_slice
            .is_some_and(|slice| task.consumed_slice >= slice)
        {
            TickOutcome::Preempts
        } else {
            TickOutcome::Continues
        }
    }
}
