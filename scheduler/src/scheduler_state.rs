use std::collections::VecDeque;

use crate::config::SchedulerConfig;
use crate::policies::{self, Algorithm};
use crate::process::{Process, ProcessState};

/// The shared coordination record, one instance per run
///
/// Everything the coordinator and the core workers agree on lives here: the
/// canonical list of processes, the ready queue and terminated list (both
/// holding indices into that list, never owning handles), the configuration
/// scalars, and the global termination flag. The whole record sits behind a
/// single `parking_lot::Mutex`; any access happens with that mutex held.
///
/// All mutating operations are O(1) pushes and pops at the ends, except
/// [`sort_ready`](SchedulerState::sort_ready), which is O(n log n) and called
/// only by the coordinator.
pub struct SchedulerState {
    /// The scheduling policy of the run
    algorithm: Algorithm,
    /// Simulated context-switch delay in milliseconds
    context_switch: u64,
    /// Round-robin time slice in milliseconds
    time_slice: u64,
    /// The canonical process list; owned here for the run's lifetime
    processes: Vec<Process>,
    /// Indices of processes eligible for dispatch, in policy order
    ready_queue: VecDeque<usize>,
    /// Indices of finished processes, append-only, in completion order
    terminated: Vec<usize>,
    /// Set once every process has terminated; workers poll it to exit
    all_terminated: bool,
}

impl SchedulerState {
    /// Builds the run state from a validated configuration
    ///
    /// Processes arriving at offset 0 are seeded into the ready queue in
    /// configuration order, which is the FIFO tie-break every policy relies
    /// on. The seed is then policy-sorted once, so the first dispatch already
    /// respects SJF/PP order even before the coordinator's first sweep.
    ///
    /// * `config` - the validated run configuration
    /// * `now` - current clock reading
    pub fn new(config: &SchedulerConfig, now: u64) -> SchedulerState {
        let processes: Vec<Process> = config
            .processes
            .iter()
            .map(|details| Process::new(details, now))
            .collect();

        let ready_queue = processes
            .iter()
            .enumerate()
            .filter(|(_, p)| p.state() == ProcessState::Ready)
            .map(|(idx, _)| idx)
            .collect();

        let mut state = SchedulerState {
            algorithm: config.algorithm,
            context_switch: config.context_switch,
            time_slice: config.time_slice,
            processes,
            ready_queue,
            terminated: Vec::new(),
            all_terminated: false,
        };
        state.sort_ready();
        state
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn context_switch(&self) -> u64 {
        self.context_switch
    }

    pub fn time_slice(&self) -> u64 {
        self.time_slice
    }

    pub fn process_count(&self) -> usize {
        self.processes.len()
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn process(&self, idx: usize) -> &Process {
        &self.processes[idx]
    }

    pub fn process_mut(&mut self, idx: usize) -> &mut Process {
        &mut self.processes[idx]
    }

    /// Takes the next process index off the front of the ready queue
    pub fn pop_ready(&mut self) -> Option<usize> {
        self.ready_queue.pop_front()
    }

    /// Puts a process index at the back of the ready queue
    ///
    /// * `idx` - index of the process being requeued
    pub fn push_ready(&mut self, idx: usize) {
        self.ready_queue.push_back(idx);
    }

    /// The process at the front of the ready queue, if any
    ///
    /// PP preemption decisions are taken against this head, under the same
    /// lock that protects the queue.
    pub fn ready_head(&self) -> Option<&Process> {
        self.ready_queue.front().map(|&idx| &self.processes[idx])
    }

    pub fn ready_len(&self) -> usize {
        self.ready_queue.len()
    }

    /// Appends a finished process to the terminated list
    ///
    /// * `idx` - index of the process that reached Terminated
    pub fn mark_terminated(&mut self, idx: usize) {
        self.terminated.push(idx);
    }

    pub fn terminated_count(&self) -> usize {
        self.terminated.len()
    }

    pub fn all_terminated(&self) -> bool {
        self.all_terminated
    }

    pub fn set_all_terminated(&mut self) {
        self.all_terminated = true;
    }

    /// Re-sorts the ready queue for the policies that demand ordering
    ///
    /// SJF orders by residual CPU budget, PP by priority; both sorts are
    /// stable so FIFO order breaks ties. FCFS and RR never reorder.
    pub fn sort_ready(&mut self) {
        let processes = &self.processes;
        match self.algorithm {
            Algorithm::Sjf => self
                .ready_queue
                .make_contiguous()
                .sort_by(|&a, &b| policies::sjf_order(&processes[a], &processes[b])),
            Algorithm::PreemptivePriority => self
                .ready_queue
                .make_contiguous()
                .sort_by(|&a, &b| policies::pp_order(&processes[a], &processes[b])),
            Algorithm::Fcfs | Algorithm::RoundRobin => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessDetails;

    fn config(algorithm: Algorithm, processes: Vec<ProcessDetails>) -> SchedulerConfig {
        SchedulerConfig {
            cores: 1,
            algorithm,
            context_switch: 0,
            time_slice: 50,
            processes,
        }
    }

    fn details(pid: u16, priority: u8, start_time: u64, bursts: &[u64]) -> ProcessDetails {
        ProcessDetails {
            pid,
            priority,
            start_time,
            burst_times: bursts.to_vec(),
        }
    }

    #[test]
    fn seeds_only_immediate_arrivals() {
        let state = SchedulerState::new(
            &config(
                Algorithm::Fcfs,
                vec![
                    details(1, 0, 0, &[100]),
                    details(2, 0, 50, &[100]),
                    details(3, 0, 0, &[100]),
                ],
            ),
            0,
        );
        assert_eq!(state.ready_len(), 2);
        assert_eq!(state.process(1).state(), ProcessState::NotStarted);
    }

    #[test]
    fn ready_queue_is_fifo() {
        let mut state = SchedulerState::new(
            &config(
                Algorithm::Fcfs,
                vec![details(1, 0, 0, &[100]), details(2, 0, 0, &[100])],
            ),
            0,
        );
        assert_eq!(state.pop_ready(), Some(0));
        state.push_ready(0);
        assert_eq!(state.pop_ready(), Some(1));
        assert_eq!(state.pop_ready(), Some(0));
        assert_eq!(state.pop_ready(), None);
    }

    #[test]
    fn sjf_sort_orders_by_residual_budget() {
        let mut state = SchedulerState::new(
            &config(
                Algorithm::Sjf,
                vec![
                    details(1, 0, 0, &[100]),
                    details(2, 0, 0, &[50]),
                    details(3, 0, 0, &[75]),
                ],
            ),
            0,
        );
        state.sort_ready();
        assert_eq!(state.pop_ready(), Some(1));
        assert_eq!(state.pop_ready(), Some(2));
        assert_eq!(state.pop_ready(), Some(0));
    }

    #[test]
    fn pp_sort_is_stable_on_ties() {
        let mut state = SchedulerState::new(
            &config(
                Algorithm::PreemptivePriority,
                vec![
                    details(1, 2, 0, &[100]),
                    details(2, 2, 0, &[100]),
                    details(3, 0, 0, &[100]),
                ],
            ),
            0,
        );
        state.sort_ready();
        // sorting twice must not change anything further
        state.sort_ready();
        assert_eq!(state.pop_ready(), Some(2));
        assert_eq!(state.pop_ready(), Some(0));
        assert_eq!(state.pop_ready(), Some(1));
    }

    #[test]
    fn fcfs_never_reorders() {
        let mut state = SchedulerState::new(
            &config(
                Algorithm::Fcfs,
                vec![details(1, 4, 0, &[100]), details(2, 0, 0, &[10])],
            ),
            0,
        );
        state.sort_ready();
        assert_eq!(state.pop_ready(), Some(0));
    }

    #[test]
    fn termination_bookkeeping() {
        let mut state = SchedulerState::new(
            &config(Algorithm::Fcfs, vec![details(1, 0, 0, &[100])]),
            0,
        );
        assert_eq!(state.terminated_count(), 0);
        assert!(!state.all_terminated());
        state.mark_terminated(0);
        assert_eq!(state.terminated_count(), 1);
        state.set_all_terminated();
        assert!(state.all_terminated());
    }
}
