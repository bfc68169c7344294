use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

// Index into Task Vec, which follows input order
pub type TaskId = usize;
pub type Ticks = u64;
pub type Priority = u64;
new_key_type! {
    pub struct DsqId;
}

/// Ordering key for shortest-first queues: less service first, then earlier admission.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct ShortestFirst {
    pub service: Ticks,
    pub seq: u64,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop the ordering
impl PartialOrd for ShortestFirst {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShortestFirst {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .service
            .cmp(&self.service)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not arrived yet; invisible to the scheduler.
    Pending,
    Ready,
    Running,
    Completed,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub name: char,
    pub state: TaskState,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub remaining_service: Ticks,
    pub initial_priority: Priority,
    pub priority: Priority,
    pub allocated_slice: Option<Ticks>,
    pub consumed_slice: Ticks,
    pub finish_time: Option<Ticks>,
}

#[derive(Debug)]
pub enum Dsq {
    Fifo {
        tasks: VecDeque<TaskId>,
    },
    Priq {
        tasks: KeyedPriorityQueue<TaskId, ShortestFirst>,
    },
    /// Ordered candidate list the owning policy may re-sort.
    List {
        tasks: Vec<TaskId>,
    },
}

impl Dsq {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            tasks: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    pub fn new_list() -> Self {
        Self::List { tasks: Vec::new() }
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        match self {
            Self::Fifo { tasks } => tasks.contains(&task_id),
            Self::Priq { tasks } => tasks.iter().any(|t| *t.0 == task_id),
            Self::List { tasks } => tasks.contains(&task_id),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { tasks } => tasks.len(),
            Self::Priq { tasks } => tasks.len(),
            Self::List { tasks } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one policy run owns: the clock, the task table, the ready
/// structures and the single CPU.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub current: Option<TaskId>,
    pub tasks: Vec<Task>,
    pub dsqs: SlotMap<DsqId, Dsq>,
    pub task_to_dsq: FxHashMap<TaskId, DsqId>,
}

enum End {
    Front,
    Back,
}

impl SimCtx {
    pub fn new() -> Self {
        Self {
            now: 0,
            current: None,
            tasks: Vec::new(),
            dsqs: SlotMap::with_key(),
            task_to_dsq: FxHashMap::default(),
        }
    }

    /// `priority` doubles as the initial priority for priority-driven policies.
    pub fn create_task(
        &mut self,
        name: char,
        arrival_time: Ticks,
        service_time: Ticks,
        priority: Priority,
    ) -> TaskId {
        let id = self.tasks.len();
        self.tasks.push(Task {
            id,
            name,
            state: TaskState::Pending,
            arrival_time,
            service_time,
            remaining_service: service_time,
            initial_priority: priority,
            priority,
            allocated_slice: None,
            consumed_slice: 0,
            finish_time: None,
        });
        id
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        self.now = self.now.saturating_add(delta);
    }

    pub fn create_dsq_fifo(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_fifo())
    }

    pub fn create_dsq_priq(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_priq())
    }

    pub fn create_dsq_list(&mut self) -> DsqId {
        self.dsqs.insert(Dsq::new_list())
    }

    fn dsq_push(&mut self, dsq_id: DsqId, task_id: TaskId, end: End, key: Option<ShortestFirst>) {
        assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Task {task_id} already present in some DSQ"
        );

        let task = self.task(task_id);
        debug_assert_eq!(
            task.state,
            TaskState::Ready,
            "Task {task_id} must be Ready when enqueued"
        );

        let dsq = self.dsqs.get_mut(dsq_id).expect("Unknown DSQ");
        match (dsq, end) {
            (Dsq::Fifo { tasks }, End::Back) => tasks.push_back(task_id),
            (Dsq::Fifo { tasks }, End::Front) => tasks.push_front(task_id),
            (Dsq::List { tasks }, End::Back) => tasks.push(task_id),
            (Dsq::List { tasks }, End::Front) => tasks.insert(0, task_id),
            (Dsq::Priq { tasks }, _) => {
                tasks.push(
                    task_id,
                    key.expect("Attempted to push to a priority DSQ with no key"),
                );
            }
        };

        self.task_to_dsq.insert(task_id, dsq_id);
    }

    pub fn dsq_push_back(&mut self, dsq_id: DsqId, task_id: TaskId) {
        self.dsq_push(dsq_id, task_id, End::Back, None);
    }

    pub fn dsq_push_front(&mut self, dsq_id: DsqId, task_id: TaskId) {
        self.dsq_push(dsq_id, task_id, End::Front, None);
    }

    pub fn dsq_push_priq(&mut self, dsq_id: DsqId, task_id: TaskId, key: ShortestFirst) {
        self.dsq_push(dsq_id, task_id, End::Back, Some(key));
    }

    /// Head of a FIFO or list; best key of a priority DSQ.
    pub fn dsq_pop_front(&mut self, dsq_id: DsqId) -> Option<TaskId> {
        let dsq = self.dsqs.get_mut(dsq_id)?;
        let task = match dsq {
            Dsq::Fifo { tasks } => tasks.pop_front(),
            Dsq::Priq { tasks } => tasks.pop().map(|t| t.0),
            Dsq::List { tasks } => (!tasks.is_empty()).then(|| tasks.remove(0)),
        }?;

        let removed = self.task_to_dsq.remove(&task);
        debug_assert!(removed.is_some(), "Task {task} missing DSQ membership");

        Some(task)
    }

    pub fn dsq_remove_at(&mut self, dsq_id: DsqId, index: usize) -> Option<TaskId> {
        let dsq = self.dsqs.get_mut(dsq_id)?;
        let task = match dsq {
            Dsq::Fifo { tasks } => tasks.remove(index),
            Dsq::List { tasks } => (index < tasks.len()).then(|| tasks.remove(index)),
            Dsq::Priq { .. } => panic!("Priority DSQs have no positional removal"),
        }?;

        let removed = self.task_to_dsq.remove(&task);
        debug_assert!(removed.is_some(), "Task {task} missing DSQ membership");

        Some(task)
    }

    /// Snapshot of a DSQ in queue order (heap order for priority DSQs).
    pub fn dsq_tasks(&self, dsq_id: DsqId) -> Vec<TaskId> {
        match self.dsqs.get(dsq_id) {
            Some(Dsq::Fifo { tasks }) => tasks.iter().copied().collect(),
            Some(Dsq::Priq { tasks }) => tasks.iter().map(|t| *t.0).collect(),
            Some(Dsq::List { tasks }) => tasks.clone(),
            None => Vec::new(),
        }
    }

    pub fn dsq_len(&self, dsq_id: DsqId) -> usize {
        self.dsqs.get(dsq_id).map_or(0, Dsq::len)
    }

    pub fn dsq_is_empty(&self, dsq_id: DsqId) -> bool {
        self.dsq_len(dsq_id) == 0
    }

    /// Lets a policy permute a list DSQ in place. Membership must not change.
    pub fn dsq_reorder(&mut self, dsq_id: DsqId, reorder: impl FnOnce(&mut Vec<TaskId>, &[Task])) {
        let table = &self.tasks;
        let members = &self.task_to_dsq;
        match self.dsqs.get_mut(dsq_id).expect("Unknown DSQ") {
            Dsq::List { tasks } => {
                let before = tasks.len();
                reorder(tasks, table);
                debug_assert_eq!(tasks.len(), before, "Reorder changed DSQ {dsq_id:?} length");
                debug_assert!(
                    tasks.iter().all(|t| members.get(t) == Some(&dsq_id)),
                    "Reorder introduced a task foreign to DSQ {dsq_id:?}"
                );
                debug_assert!(
                    {
                        let mut ids = tasks.clone();
                        ids.sort_unstable();
                        ids.dedup();
                        ids.len() == before
                    },
                    "Reorder duplicated a task in DSQ {dsq_id:?}"
                );
            }
            _ => panic!("Only list DSQs can be reordered"),
        }
    }

    pub fn task_in_any_dsq(&self, task_id: TaskId) -> bool {
        self.task_to_dsq.contains_key(&task_id)
    }

    pub fn task(&self, task_id: TaskId) -> &Task {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Task {
        &mut self.tasks[task_id]
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn mark_ready(&mut self, task_id: TaskId) {
        let task = self.task_mut(task_id);
        debug_assert!(
            task.state != TaskState::Completed,
            "Completed task {} cannot be ready",
            task.id
        );
        task.state = TaskState::Ready;
    }

    pub fn mark_completed(&mut self, task_id: TaskId, finish_time: Ticks) {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Completing task {task_id} that is still enqueued"
        );

        let task = &mut self.tasks[task_id];
        debug_assert!(
            task.state == TaskState::Running,
            "Task {task_id} must have been running before marked complete"
        );
        debug_assert!(
            task.finish_time.is_none(),
            "Task {task_id} already has a finish time"
        );

        task.state = TaskState::Completed;
        task.remaining_service = 0;
        task.finish_time = Some(finish_time);
    }

    // Return previous state
    pub fn set_running(&mut self, task_id: TaskId, slice: Option<Ticks>) -> TaskState {
        debug_assert!(
            !self.task_to_dsq.contains_key(&task_id),
            "Running task {task_id} must not be enqueued"
        );
        debug_assert!(self.current.is_none(), "CPU already running a task");

        self.current = Some(task_id);
        let task = self.task_mut(task_id);
        let prev_state = task.state;
        task.state = TaskState::Running;
        task.allocated_slice = slice;
        task.consumed_slice = 0;
        prev_state
    }

    /// One tick of CPU for `task_id`; `draw_service` is false for policies
    /// that never complete by service.
    pub fn consume_tick(&mut self, task_id: TaskId, draw_service: bool) {
        let task = self.task_mut(task_id);
        if draw_service {
            task.remaining_service = task.remaining_service.saturating_sub(1);
        }
        task.consumed_slice = task.consumed_slice.saturating_add(1);
    }

    pub fn clear_cpu(&mut self) {
        self.current = None;
    }
}

impl Default for SimCtx {
    fn default() -> Self {
        Self::new()
    }
}
