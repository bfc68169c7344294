use crate::core::state::{Priority, Ticks};

/// One process definition as read from input; never mutated by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub name: char,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    /// Initial priority under Aging. Input carries a single demand column,
    /// so this starts out equal to `service_time`.
    pub priority: Priority,
}

impl Process {
    pub fn new(name: char, arrival_time: Ticks, service_time: Ticks) -> Self {
        Self {
            name,
            arrival_time,
            service_time,
            priority: service_time,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}

/// A process together with what one policy run did to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub process: Process,
    pub finish_time: Option<Ticks>,
}

impl ProcessRecord {
    pub fn is_complete(&self) -> bool {
        self.finish_time.is_some()
    }

    pub fn turnaround(&self) -> Option<Ticks> {
        self.finish_time
            .map(|finish| finish.saturating_sub(self.process.arrival_time))
    }

    pub fn normalized_turnaround(&self) -> Option<f64> {
        if self.process.service_time == 0 {
            return None;
        }
        self.turnaround()
            .map(|t| t as f64 / self.process.service_time as f64)
    }
}
