pub mod core;
pub mod error;
pub mod input;
pub mod policy;
pub mod render;
pub mod scheduler;
pub mod sim;
pub mod stats;

pub use crate::core::{Cell, SchedCoreEvent, Timeline};
pub use error::{InputError, SimError};
pub use input::{Mode, Request};
pub use policy::Policy;
pub use scheduler::Scheduler;
pub use sim::{Process, ProcessRecord, RunReport, Sim};
pub use stats::StatsReport;
