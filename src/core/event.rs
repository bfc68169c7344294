use crate::core::{TaskId, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedCoreEvent {
    Admitted {
        task: TaskId,
    },
    Dispatched {
        task: TaskId,
        slice: Option<Ticks>,
    },
    // Slice used up with service left
    Preempted {
        task: TaskId,
    },
    Completed {
        task: TaskId,
        finish_time: Ticks,
    },
    // CPU idle even after select_next()
    CpuIdle,
}
