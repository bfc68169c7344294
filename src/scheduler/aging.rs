use super::{Dispatch, ENQ_PREEMPT, EnqueueFlags, Scheduler, SimCtx, TaskId};
use crate::core::{DsqId, Priority, Ticks};
use std::cmp::Reverse;

/// Priority scheduling with aging.
///
/// The queue head runs for a full quantum; tasks never complete. When the
/// quantum ends every other resident task gains one priority point, the
/// task that ran drops back to its initial priority, and the queue is
/// stable-sorted by descending priority with [`resolve_ties`] picking among
/// the tasks tied for the top.
pub struct Aging {
    ready: DsqId,
    quantum: Ticks,
    // Every dispatch, oldest first
    history: Vec<TaskId>,
}

impl Aging {
    fn age(&self, ctx: &mut SimCtx, ran: TaskId) {
        for task_id in ctx.dsq_tasks(self.ready) {
            let task = ctx.task_mut(task_id);
            if task_id == ran {
                task.priority = task.initial_priority;
            } else {
                task.priority = task.priority.saturating_add(1);
            }
        }

        let history = &self.history;
        ctx.dsq_reorder(self.ready, |order, tasks| {
            order.sort_by_key(|&t| Reverse(tasks[t].priority));
            resolve_ties(order, |t| tasks[t].priority, history);
        });
    }

    pub fn history(&self) -> &[TaskId] {
        &self.history
    }
}

impl Scheduler for Aging {
    type Params = Ticks;

    fn init(ctx: &mut SimCtx, quantum: Ticks) -> Self {
        assert!(quantum > 0, "Aging quantum must be at least one tick");
        Self {
            ready: ctx.create_dsq_list(),
            quantum,
            history: Vec::new(),
        }
    }

    fn consumes_service(&self) -> bool {
        false
    }

    fn enqueue(&mut self, ctx: &mut SimCtx, task: TaskId, flags: EnqueueFlags) {
        if flags & ENQ_PREEMPT != 0 {
            // The task that just ran held the head position during its quantum
            ctx.dsq_push_front(self.ready, task);
            self.age(ctx, task);
        } else {
            ctx.dsq_push_back(self.ready, task);
        }
    }

    fn select_next(&mut self, ctx: &mut SimCtx) -> Option<Dispatch> {
        let task = ctx.dsq_pop_front(self.ready)?;
        self.history.push(task);
        Some(Dispatch::with_slice(task, self.quantum))
    }
}

/// Reorders the tasks tied for the top priority of an already sorted queue.
///
/// Two tied: if the head ran more recently than the runner-up, the head
/// moves to the tail of the whole queue. More than two tied: the tied tasks
/// that have run are placed first, least recently run first, followed by
/// tied tasks that never ran in their current order.
pub fn resolve_ties(
    order: &mut Vec<TaskId>,
    priority_of: impl Fn(TaskId) -> Priority,
    history: &[TaskId],
) {
    let Some(&head) = order.first() else {
        return;
    };
    let top = priority_of(head);
    let tied = order.iter().take_while(|&&t| priority_of(t) == top).count();
    assert!(tied > 0, "Tie-break found no task at the top priority");

    match tied {
        1 => {}
        2 => {
            let (first, second) = (order[0], order[1]);
            let most_recent = history.iter().rev().find(|&&t| t == first || t == second);
            if most_recent == Some(&first) {
                let head = order.remove(0);
                order.push(head);
            }
        }
        _ => {
            let mut ran: Vec<TaskId> = Vec::with_capacity(tied);
            for &task in history.iter().rev() {
                if order[..tied].contains(&task) && !ran.contains(&task) {
                    ran.push(task);
                }
            }
            if ran.is_empty() {
                return;
            }

            let never_ran: Vec<TaskId> = order[..tied]
                .iter()
                .copied()
                .filter(|t| !ran.contains(t))
                .collect();
            let resolved: Vec<TaskId> = ran.into_iter().rev().chain(never_ran).collect();
            order[..tied].copy_from_slice(&resolved);
        }
    }

    assert!(!order.is_empty(), "Tie-break left the ready queue without a head");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Process, Sim};

    fn prio(table: &[Priority]) -> impl Fn(TaskId) -> Priority + '_ {
        move |t| table[t]
    }

    #[test]
    fn single_top_priority_is_left_alone() {
        let mut order = vec![2, 0, 1];
        resolve_ties(&mut order, prio(&[1, 1, 5]), &[0, 1, 2]);
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn two_way_tie_sends_recent_runner_to_tail() {
        let mut order = vec![0, 1, 2];
        resolve_ties(&mut order, prio(&[3, 3, 1]), &[1, 0]);
        assert_eq!(order, vec![1, 2, 0]);

        let mut order = vec![0, 1, 2];
        resolve_ties(&mut order, prio(&[3, 3, 1]), &[0, 1]);
        assert_eq!(order, vec![0, 1, 2]);

        let mut order = vec![0, 1];
        resolve_ties(&mut order, prio(&[3, 3]), &[]);
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn three_way_tie_orders_least_recent_first() {
        let mut order = vec![0, 1, 2, 3];
        // Most recent: 1, then 2, then 0
        resolve_ties(&mut order, prio(&[4, 4, 4, 1]), &[0, 2, 0, 1]);
        assert_eq!(order, vec![2, 0, 1, 3]);
    }

    #[test]
    fn three_way_tie_never_loses_or_duplicates_tasks() {
        let mut order = vec![0, 1, 2, 3];
        resolve_ties(&mut order, prio(&[2, 2, 2, 2]), &[2, 1]);
        assert_eq!(order, vec![2, 1, 0, 3]);

        let mut order = vec![0, 1, 2];
        resolve_ties(&mut order, prio(&[2, 2, 2]), &[]);
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn rotates_equal_priorities() {
        let processes = vec![
            Process::new('A', 0, 1),
            Process::new('B', 0, 1),
            Process::new('C', 0, 1),
        ];
        let report = Sim::<Aging>::new(&processes, 1, 10, true).run();
        let timeline = report.timeline.as_ref().expect("trace requested");

        assert_eq!(timeline.row_string(0), "*..*..*..*");
        assert_eq!(timeline.row_string(1), ".*..*..*..");
        assert_eq!(timeline.row_string(2), "..*..*..*.");
        assert!(!report.all_completed());
    }

    #[test]
    fn boundary_arrival_is_aged_with_residents() {
        let processes = vec![
            Process::new('A', 0, 1),
            Process::new('B', 2, 2),
            Process::new('C', 4, 3),
        ];
        let report = Sim::<Aging>::new(&processes, 1, 20, true).run();
        let timeline = report.timeline.expect("trace requested");

        assert_eq!(timeline.row_string(0), "**.*...*..*..*..*..*");
        assert_eq!(timeline.row_string(1), "  *..*..*..*..*..*..");
        assert_eq!(timeline.row_string(2), "    *.*..*..*..*..*.");
    }

    #[test]
    fn alternates_with_full_quanta() {
        let processes = vec![Process::new('A', 0, 2), Process::new('B', 1, 2)];
        let mut sim = Sim::<Aging>::new(&processes, 2, 12, true);
        while !sim.finished() {
            sim.step();
        }
        assert_eq!(sim.core.scheduler.history(), &[0, 1, 0, 1, 0, 1]);

        let report = sim.into_report();
        let timeline = report.timeline.expect("trace requested");
        assert_eq!(timeline.row_string(0), "**..**..**..");
        assert_eq!(timeline.row_string(1), " .**..**..**");
    }
}
