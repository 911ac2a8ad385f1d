use std::cmp::Ordering;

use crate::process::Process;

/// The scheduling policies the simulator reproduces
///
/// FCFS and RR keep the ready queue in insertion order; SJF and PP ask the
/// coordinator to re-sort it after every sweep. RR is the only policy with a
/// time slice, PP the only one that preempts on priority.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Algorithm {
    /// First come, first served
    Fcfs,
    /// Shortest job first, non-preemptive, keyed on residual CPU budget
    Sjf,
    /// Round robin with a fixed time slice
    RoundRobin,
    /// Preemptive priority, lower number runs first
    PreemptivePriority,
}

impl Algorithm {
    /// Parses an algorithm name from a configuration file
    ///
    /// * `name` - one of `fcfs`, `sjf`, `rr`, `pp`, case-insensitive
    pub fn from_name(name: &str) -> Option<Algorithm> {
        match name.to_ascii_lowercase().as_str() {
            "fcfs" => Some(Algorithm::Fcfs),
            "sjf" => Some(Algorithm::Sjf),
            "rr" => Some(Algorithm::RoundRobin),
            "pp" => Some(Algorithm::PreemptivePriority),
            _ => None,
        }
    }

    /// Returns the canonical lowercase name of the algorithm
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Fcfs => "fcfs",
            Algorithm::Sjf => "sjf",
            Algorithm::RoundRobin => "rr",
            Algorithm::PreemptivePriority => "pp",
        }
    }

    /// True if the ready queue must be re-sorted after each coordinator sweep
    pub fn needs_sorting(self) -> bool {
        matches!(self, Algorithm::Sjf | Algorithm::PreemptivePriority)
    }

    /// True if a running process is preempted when its time slice expires
    pub fn uses_time_slice(self) -> bool {
        matches!(self, Algorithm::RoundRobin)
    }

    /// True if a higher-priority arrival preempts a running process
    pub fn preempts_on_priority(self) -> bool {
        matches!(self, Algorithm::PreemptivePriority)
    }
}

/// SJF ordering: ascending residual CPU budget
///
/// Ties are left to the caller's stable sort, which preserves FIFO order.
pub fn sjf_order(a: &Process, b: &Process) -> Ordering {
    a.remain_time().cmp(&b.remain_time())
}

/// PP ordering: ascending priority value (0 is the most urgent)
///
/// Ties are left to the caller's stable sort, which preserves FIFO order.
pub fn pp_order(a: &Process, b: &Process) -> Ordering {
    a.priority().cmp(&b.priority())
}
