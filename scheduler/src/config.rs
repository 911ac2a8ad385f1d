use std::error::Error;
use std::fmt;

use crate::policies::Algorithm;

/// The highest priority value a process may carry (0 is the most urgent)
pub const MAX_PRIORITY: u8 = 4;

/// The immutable description of one synthetic process
///
/// `burst_times` alternates CPU and I/O durations: even indices are CPU
/// bursts, odd indices are I/O bursts, so a valid list always has an odd
/// number of entries and both ends are CPU work.
#[derive(Clone, Debug)]
pub struct ProcessDetails {
    /// Process identifier, echoed in the status table
    pub pid: u16,
    /// Priority in `0..=4`, only meaningful under PP
    pub priority: u8,
    /// Milliseconds after program start at which the process becomes ready
    pub start_time: u64,
    /// Alternating CPU/I-O burst durations in milliseconds
    pub burst_times: Vec<u64>,
}

/// Everything a simulation run needs, as produced by the configuration parser
#[derive(Clone, Debug)]
pub struct SchedulerConfig {
    /// Number of virtual CPU cores, at least 1
    pub cores: u8,
    /// The scheduling policy to reproduce
    pub algorithm: Algorithm,
    /// Simulated context-switch delay in milliseconds
    pub context_switch: u64,
    /// Round-robin time slice in milliseconds, ignored by other policies
    pub time_slice: u64,
    /// The workload, in arrival-tie insertion order
    pub processes: Vec<ProcessDetails>,
}

impl SchedulerConfig {
    /// Checks the semantic rules the file format cannot express
    ///
    /// Rejects a zero core count, an empty workload, an even (or empty)
    /// burst list, an out-of-range priority, and a zero time slice under
    /// round robin.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cores == 0 {
            return Err(ConfigError::NoCores);
        }
        if self.processes.is_empty() {
            return Err(ConfigError::NoProcesses);
        }
        if self.algorithm.uses_time_slice() && self.time_slice == 0 {
            return Err(ConfigError::ZeroTimeSlice);
        }
        for details in &self.processes {
            if details.burst_times.len() % 2 == 0 {
                return Err(ConfigError::EvenBurstCount {
                    pid: details.pid,
                    count: details.burst_times.len(),
                });
            }
            if details.priority > MAX_PRIORITY {
                return Err(ConfigError::PriorityOutOfRange {
                    pid: details.pid,
                    priority: details.priority,
                });
            }
        }
        Ok(())
    }
}

/// A semantically invalid configuration, fatal at startup
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `cores` was 0
    NoCores,
    /// The workload contained no processes
    NoProcesses,
    /// Round robin was selected with a zero time slice
    ZeroTimeSlice,
    /// A process declared an even (or empty) number of bursts
    EvenBurstCount { pid: u16, count: usize },
    /// A process declared a priority above [`MAX_PRIORITY`]
    PriorityOutOfRange { pid: u16, priority: u8 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoCores => write!(f, "core count must be at least 1"),
            ConfigError::NoProcesses => write!(f, "workload contains no processes"),
            ConfigError::ZeroTimeSlice => {
                write!(f, "round robin requires a time slice of at least 1 ms")
            }
            ConfigError::EvenBurstCount { pid, count } => write!(
                f,
                "process {pid} declares {count} bursts; the count must be odd and at least 1"
            ),
            ConfigError::PriorityOutOfRange { pid, priority } => write!(
                f,
                "process {pid} declares priority {priority}; the range is 0..={MAX_PRIORITY}"
            ),
        }
    }
}

impl Error for ConfigError {}
