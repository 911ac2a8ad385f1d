use crate::process::{Process, ProcessState};
use crate::scheduler_state::SchedulerState;

/// One row of the status table, copied out under the scheduler mutex
///
/// All durations are in milliseconds; the renderer is responsible for the
/// 1-decimal seconds formatting.
#[derive(Clone, Debug)]
pub struct ProcessSnapshot {
    pub pid: u16,
    pub priority: u8,
    pub state: ProcessState,
    /// The core the process runs on, `None` when it holds no core
    pub core: Option<u8>,
    pub turn_time: u64,
    pub wait_time: u64,
    pub cpu_time: u64,
    pub remain_time: u64,
    /// Forced Running→Ready transitions suffered so far
    pub preemptions: u32,
}

/// The protocol by which an external renderer receives consistent snapshots
///
/// Rows are collected under the scheduler mutex and handed over outside it,
/// once per coordinator sweep (roughly one render frame).
pub trait Reporter {
    /// Presents one frame of the run
    ///
    /// * `rows` - the visible processes, in configuration order
    fn render(&mut self, rows: &[ProcessSnapshot]);
}

/// A reporter that discards every frame; used by headless runs and tests
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn render(&mut self, _rows: &[ProcessSnapshot]) {}
}

/// Snapshots every process that has entered the simulation
///
/// NotStarted processes are omitted, matching the status table contract.
/// Must be called with the scheduler mutex held.
pub fn collect(state: &SchedulerState) -> Vec<ProcessSnapshot> {
    state
        .processes()
        .iter()
        .filter(|p| p.state() != ProcessState::NotStarted)
        .map(snapshot_of)
        .collect()
}

/// Snapshots every process unconditionally, for the end-of-run report
pub fn collect_final(state: &SchedulerState) -> Vec<ProcessSnapshot> {
    state.processes().iter().map(snapshot_of).collect()
}

fn snapshot_of(process: &Process) -> ProcessSnapshot {
    ProcessSnapshot {
        pid: process.pid(),
        priority: process.priority(),
        state: process.state(),
        core: process.core(),
        turn_time: process.turn_time(),
        wait_time: process.wait_time(),
        cpu_time: process.cpu_time(),
        remain_time: process.remain_time(),
        preemptions: process.preemptions(),
    }
}
