pub mod driver;
pub mod process;
pub mod workload;

pub use driver::{RunReport, Sim};
pub use process::{Process, ProcessRecord};
pub use workload::{WorkloadParams, bernoulli_processes};
