use thiserror::Error;

/// Problems with the text request; reported before any simulation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Failed to read {0} from input.")]
    Missing(&'static str),

    #[error("Unknown mode {0}.")]
    UnknownMode(String),

    #[error("Unknown policy {0:?}.")]
    UnknownPolicy(String),

    #[error("Policy {policy} needs a quantum of at least 1, got {value:?}.")]
    InvalidQuantum { policy: String, value: String },

    #[error("Invalid {field} {value:?}.")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Failed to parse process line {line}: {reason}.")]
    ProcessLine { line: usize, reason: String },

    #[error("Duplicate process name {0}.")]
    DuplicateName(char),

    #[error("Process {0} needs a service time (or priority) of at least 1.")]
    ZeroDemand(char),

    #[error("No processes to schedule.")]
    EmptyWorkload,
}

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Statistics are not defined for {0}.")]
    StatsUnsupported(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
