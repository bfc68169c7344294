use super::process::{Process, ProcessRecord};
use crate::{
    core::{
        SchedCoreEvent, Timeline,
        driver::SchedCore,
        state::{SimCtx, TaskId, Ticks},
    },
    scheduler::Scheduler,
};
use tracing::trace;

/// Finish times for every process (input order) and, if requested, the trace.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub records: Vec<ProcessRecord>,
    pub timeline: Option<Timeline>,
}

impl RunReport {
    pub fn all_completed(&self) -> bool {
        self.records.iter().all(ProcessRecord::is_complete)
    }
}

pub struct Sim<S: Scheduler> {
    pub core: SchedCore<S>,
    pub processes: Vec<Process>,
    // Task ids by arrival time, input order breaking ties
    arrival_order: Vec<TaskId>,
    arrival_cursor: usize,
    horizon: Ticks,
}

impl<S: Scheduler> Sim<S> {
    /// Builds a fresh task table from `processes`; nothing is shared with
    /// other runs over the same process set.
    pub fn new(processes: &[Process], params: S::Params, horizon: Ticks, record_trace: bool) -> Self {
        let mut ctx = SimCtx::new();
        for process in processes {
            ctx.create_task(
                process.name,
                process.arrival_time,
                process.service_time,
                process.priority,
            );
        }

        let mut arrival_order: Vec<TaskId> = (0..processes.len()).collect();
        arrival_order.sort_by_key(|&id| processes[id].arrival_time);

        Self {
            core: SchedCore::<S>::new(ctx, params, horizon, record_trace),
            processes: processes.to_vec(),
            arrival_order,
            arrival_cursor: 0,
            horizon,
        }
    }

    pub fn step(&mut self) -> Vec<SchedCoreEvent> {
        let now = self.core.now();
        let mut events = self.handle_arrivals();
        events.extend(self.core.tick());

        for event in &events {
            trace!(tick = now, ?event, "core event");
        }
        events
    }

    fn handle_arrivals(&mut self) -> Vec<SchedCoreEvent> {
        let now = self.core.now();
        let arrived = self.arrival_order[self.arrival_cursor..]
            .iter()
            .take_while(|&&id| self.processes[id].arrival_time <= now) // Contiguous, since sorted
            .count();

        let mut events = Vec::with_capacity(arrived);
        for i in self.arrival_cursor..self.arrival_cursor + arrived {
            let task = self.arrival_order[i];
            events.push(self.core.admit(task));
        }
        self.arrival_cursor += arrived;
        events
    }

    pub fn finished(&self) -> bool {
        self.core.now() >= self.horizon
    }

    pub fn all_processes_completed(&self) -> bool {
        self.core.ctx.tasks.iter().all(|t| t.finish_time.is_some())
    }

    /// Step until the horizon; unfinished processes keep no finish time.
    pub fn run(mut self) -> RunReport {
        while !self.finished() {
            self.step();
        }
        self.into_report()
    }

    pub fn into_report(self) -> RunReport {
        let (ctx, timeline) = self.core.into_parts();
        let records = self
            .processes
            .into_iter()
            .zip(ctx.tasks)
            .map(|(process, task)| ProcessRecord {
                process,
                finish_time: task.finish_time,
            })
            .collect();

        RunReport { records, timeline }
    }
}
