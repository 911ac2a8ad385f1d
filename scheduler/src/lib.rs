//! A multi-core CPU scheduling simulator.
//!
//! This library emulates the passage of wall-clock time across a
//! configurable number of virtual CPU cores, dispatching a fixed workload of
//! synthetic processes (alternating CPU and I/O bursts) under one of four
//! textbook policies: FCFS, non-preemptive SJF, round robin, and preemptive
//! priority.
//!
//! A run is one [`Coordinator`] on the calling thread plus one [`CoreWorker`]
//! thread per core, all sharing a single mutex-guarded [`SchedulerState`].
//! Workers drain the ready queue, simulate execution, and route each process
//! to the I/O phase, back to the ready queue, or to the terminated list; the
//! coordinator gates arrivals, completes I/O bursts, keeps the ready queue
//! sorted for the ordering policies, and detects global termination. A
//! [`Reporter`] receives one consistent snapshot of the workload per frame.

mod clock;
pub use clock::Clock;

mod config;
pub use config::{ConfigError, ProcessDetails, SchedulerConfig, MAX_PRIORITY};

mod policies;
pub use policies::Algorithm;

mod process;
pub use process::{Process, ProcessState};

mod scheduler_state;
pub use scheduler_state::SchedulerState;

mod core_worker;
pub use core_worker::CoreWorker;

mod coordinator;
pub use coordinator::{Coordinator, RunReport};

mod collector;
pub use collector::{collect, collect_final, ProcessSnapshot, Reporter, SilentReporter};
