use super::{
    event::SchedCoreEvent,
    observer::Observer,
    state::{SimCtx, TaskId, Ticks},
    timeline::Timeline,
};
use crate::scheduler::{Dispatch, ENQ_PREEMPT, ENQ_WAKEUP, Scheduler, TickOutcome};
use tracing::debug;

pub struct SchedCore<S: Scheduler> {
    pub ctx: SimCtx,
    pub scheduler: S,
    observer: Observer,
    // Preempted at the end of the previous tick; re-enqueued after this tick's arrivals
    requeue: Option<TaskId>,
}

impl<S: Scheduler> SchedCore<S> {
    pub fn new(mut ctx: SimCtx, params: S::Params, horizon: Ticks, record_trace: bool) -> Self {
        let scheduler = S::init(&mut ctx, params);
        let observer = Observer::new(ctx.tasks.len(), horizon, record_trace);
        Self {
            ctx,
            scheduler,
            observer,
            requeue: None,
        }
    }

    /// Hand a newly arrived task to the scheduler.
    pub fn admit(&mut self, task: TaskId) -> SchedCoreEvent {
        self.ctx.mark_ready(task);
        self.scheduler.enqueue(&mut self.ctx, task, ENQ_WAKEUP);
        SchedCoreEvent::Admitted { task }
    }

    /// Run the current tick, then advance the clock.
    pub fn tick(&mut self) -> Vec<SchedCoreEvent> {
        let mut events = Vec::new();

        if let Some(task) = self.requeue.take() {
            self.scheduler.enqueue(&mut self.ctx, task, ENQ_PREEMPT);
        }

        if self.ctx.cpu_is_idle() {
            if let Some(event) = self.try_dispatch() {
                events.push(event);
            }
        }

        self.observer.observe(&self.ctx);

        match self.ctx.current {
            Some(task) => events.extend(self.run_current(task)),
            None => events.push(SchedCoreEvent::CpuIdle),
        }

        self.ctx.advance_time(1);
        events
    }

    fn try_dispatch(&mut self) -> Option<SchedCoreEvent> {
        let Dispatch { task, slice } = self.scheduler.select_next(&mut self.ctx)?;
        self.ctx.set_running(task, slice);
        debug!(now = self.ctx.now, task, ?slice, "dispatched");
        Some(SchedCoreEvent::Dispatched { task, slice })
    }

    fn run_current(&mut self, task: TaskId) -> Option<SchedCoreEvent> {
        self.ctx
            .consume_tick(task, self.scheduler.consumes_service());

        match self.scheduler.on_tick_consumed(&self.ctx, task) {
            TickOutcome::Continues => None,
            TickOutcome::Completes => {
                let finish_time = self.ctx.now + 1;
                self.ctx.clear_cpu();
                self.ctx.mark_completed(task, finish_time);
                debug!(now = self.ctx.now, task, finish_time, "completed");
                Some(SchedCoreEvent::Completed { task, finish_time })
            }
            TickOutcome::Preempts => {
                self.ctx.clear_cpu();
                self.ctx.mark_ready(task);
                self.requeue = Some(task);
                debug!(now = self.ctx.now, task, "preempted");
                Some(SchedCoreEvent::Preempted { task })
            }
        }
    }

    pub fn now(&self) -> Ticks {
        self.ctx.now
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn into_parts(self) -> (SimCtx, Option<Timeline>) {
        (self.ctx, self.observer.into_timeline())
    }
}
