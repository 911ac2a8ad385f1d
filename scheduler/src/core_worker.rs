use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, trace};
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::policies::Algorithm;
use crate::process::ProcessState;
use crate::scheduler_state::SchedulerState;

/// How long an idle worker sleeps before polling the ready queue again
const IDLE_POLL: Duration = Duration::from_millis(1);

/// The run loop of one virtual CPU core
///
/// A worker owns at most one process index at a time: between the pop under
/// the lock and the matching re-insert (or terminated append) under the lock,
/// the process belongs to this core and to nothing else. All decisions about
/// the running process are taken under the scheduler mutex; the lock is never
/// held across a sleep or a busy-wait.
pub struct CoreWorker {
    /// Id of this core, reported in the status table while running
    core_id: u8,
    shared: Arc<Mutex<SchedulerState>>,
    clock: Clock,
    /// Copies of the run configuration, taken once at construction
    algorithm: Algorithm,
    context_switch: u64,
    time_slice: u64,
    /// The process this core is currently running
    current: Option<usize>,
    /// Clock reading at which the current dispatch began
    slice_start: u64,
}

impl CoreWorker {
    /// Creates the worker for one core
    ///
    /// * `core_id` - id of the core, dense from 0
    /// * `shared` - the scheduler state shared with the coordinator
    /// * `clock` - the run's clock
    pub fn new(core_id: u8, shared: Arc<Mutex<SchedulerState>>, clock: Clock) -> CoreWorker {
        let (algorithm, context_switch, time_slice) = {
            let state = shared.lock();
            (state.algorithm(), state.context_switch(), state.time_slice())
        };
        CoreWorker {
            core_id,
            shared,
            clock,
            algorithm,
            context_switch,
            time_slice,
            current: None,
            slice_start: 0,
        }
    }

    /// Runs until every process has terminated
    ///
    /// With a process on the core the loop body is a bare yield between
    /// polls; without one the worker sleeps [`IDLE_POLL`] between attempts
    /// to drain the ready queue.
    pub fn run(mut self) {
        debug!("core {} online", self.core_id);
        loop {
            match self.current {
                None => {
                    if !self.acquire() {
                        break;
                    }
                }
                Some(idx) => {
                    if self.drive(idx) {
                        self.context_switch_wait();
                    } else {
                        thread::yield_now();
                    }
                }
            }
        }
        debug!("core {} offline", self.core_id);
    }

    /// Tries to take the front of the ready queue; false means shut down
    fn acquire(&mut self) -> bool {
        let mut state = self.shared.lock();
        if state.all_terminated() {
            return false;
        }
        match state.pop_ready() {
            Some(idx) => {
                let now = self.clock.now();
                state.process_mut(idx).dispatch(self.core_id, now);
                trace!(
                    "core {}: dispatched process {}",
                    self.core_id,
                    state.process(idx).pid()
                );
                self.current = Some(idx);
                self.slice_start = now;
            }
            None => {
                drop(state);
                thread::sleep(IDLE_POLL);
            }
        }
        true
    }

    /// One observation of the running process; true if the core released it
    ///
    /// The yield conditions are evaluated strictly in this order: burst
    /// completion first, then RR time-slice expiry, then PP preemption.
    fn drive(&mut self, idx: usize) -> bool {
        let mut state = self.shared.lock();
        let now = self.clock.now();
        state.process_mut(idx).observe(now);

        if state.process(idx).burst_complete(now) {
            if state.process(idx).has_more_bursts() {
                let process = state.process_mut(idx);
                process.transition(ProcessState::Io, now);
                process.advance_burst();
            } else {
                state.process_mut(idx).transition(ProcessState::Terminated, now);
                state.mark_terminated(idx);
                debug!(
                    "core {}: process {} terminated",
                    self.core_id,
                    state.process(idx).pid()
                );
            }
            self.current = None;
            return true;
        }

        if self.algorithm.uses_time_slice()
            && now.saturating_sub(self.slice_start) >= self.time_slice
        {
            Self::requeue(&mut state, idx, now, self.slice_start);
            self.current = None;
            return true;
        }

        if self.algorithm.preempts_on_priority() {
            let current_priority = state.process(idx).priority();
            let outranked = state
                .ready_head()
                .is_some_and(|head| head.priority() < current_priority);
            if outranked {
                Self::requeue(&mut state, idx, now, self.slice_start);
                self.current = None;
                return true;
            }
        }

        false
    }

    /// Forced Running→Ready: preserve the burst remainder and push back
    fn requeue(state: &mut SchedulerState, idx: usize, now: u64, slice_start: u64) {
        let process = state.process_mut(idx);
        process.reduce_current_burst(now.saturating_sub(slice_start));
        process.transition(ProcessState::Ready, now);
        state.push_ready(idx);
    }

    /// Emulates the context-switch delay with a bounded busy-wait
    ///
    /// No process and no lock is held here; the termination flag is still
    /// polled so a long switch never delays shutdown.
    fn context_switch_wait(&self) {
        let deadline = self.clock.now() + self.context_switch;
        while self.clock.now() < deadline {
            if self.shared.lock().all_terminated() {
                break;
            }
            thread::yield_now();
        }
    }
}
