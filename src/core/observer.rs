use super::state::{SimCtx, TaskState, Ticks};
use super::timeline::{Cell, Timeline};

/// Checks core invariants once per tick and, when tracing, records the
/// tick into the timeline.
#[derive(Debug)]
pub struct Observer {
    step: u64,
    timeline: Option<Timeline>,
}

impl Observer {
    pub fn new(num_tasks: usize, horizon: Ticks, record_trace: bool) -> Self {
        Self {
            step: 0,
            timeline: record_trace.then(|| Timeline::new(num_tasks, horizon)),
        }
    }

    pub fn observe(&mut self, ctx: &SimCtx) {
        self.step += 1;

        if let Some(task_id) = ctx.current {
            let task = ctx.task(task_id);
            debug_assert_eq!(
                task.state,
                TaskState::Running,
                "cpu.current task {task_id} must be Running"
            );
        }

        for task in &ctx.tasks {
            let enqueued = ctx.task_in_any_dsq(task.id);
            match task.state {
                TaskState::Pending | TaskState::Completed => debug_assert!(
                    !enqueued,
                    "Task {} in state {:?} present in a DSQ",
                    task.id,
                    task.state
                ),
                TaskState::Running => debug_assert!(
                    !enqueued && ctx.current == Some(task.id),
                    "Running task {} must be current and not appear in any DSQ",
                    task.id
                ),
                TaskState::Ready => debug_assert!(
                    enqueued,
                    "Ready task {} missing from every DSQ",
                    task.id
                ),
            }
        }

        for (&task_id, &dsq_id) in &ctx.task_to_dsq {
            if let Some(dsq) = ctx.dsqs.get(dsq_id) {
                debug_assert!(
                    dsq.contains(task_id),
                    "task_to_dsq claims task {task_id} in DSQ {dsq_id:?}, but queue does not contain it"
                );
            } else {
                debug_assert!(false, "task_to_dsq references unknown DSQ {dsq_id:?}");
            }
        }

        if let Some(timeline) = self.timeline.as_mut() {
            for task in &ctx.tasks {
                let cell = if ctx.current == Some(task.id) {
                    Cell::Running
                } else if ctx.task_in_any_dsq(task.id) {
                    Cell::Waiting
                } else {
                    Cell::Idle
                };
                timeline.set(task.id, ctx.now, cell);
            }
        }
    }

    pub fn steps(&self) -> u64 {
        self.step
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn into_timeline(self) -> Option<Timeline> {
        self.timeline
    }
}
