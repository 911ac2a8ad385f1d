use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::{debug, info};
use parking_lot::Mutex;

use crate::clock::Clock;
use crate::collector::{collect, collect_final, ProcessSnapshot, Reporter};
use crate::config::SchedulerConfig;
use crate::core_worker::CoreWorker;
use crate::process::ProcessState;
use crate::scheduler_state::SchedulerState;

/// Delay between coordinator sweeps, roughly one render frame
const FRAME: Duration = Duration::from_millis(16);

/// What a finished run hands back to the caller
///
/// All timestamps are milliseconds relative to the run origin.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Number of cores the run was simulated on
    pub cores: u8,
    /// Wall-clock length of the run
    pub total_runtime: u64,
    /// When half the workload (rounded up) had terminated
    pub half_done_at: Option<u64>,
    /// Final snapshot of every process
    pub processes: Vec<ProcessSnapshot>,
}

/// The single thread that drives a run from launch to join
///
/// The coordinator owns the scheduler state (through the shared mutex),
/// spawns one worker per core, and between render frames performs the sweep
/// that starts arrived processes, completes I/O bursts, re-sorts the ready
/// queue for the ordering policies, and detects global termination.
pub struct Coordinator {
    shared: Arc<Mutex<SchedulerState>>,
    clock: Clock,
    cores: u8,
    process_count: usize,
    /// Clock reading at construction; arrival offsets are relative to it
    origin: u64,
    half_done_at: Option<u64>,
    end_at: Option<u64>,
}

impl Coordinator {
    /// Allocates the run state for a validated configuration
    ///
    /// * `config` - the validated run configuration
    /// * `clock` - the clock every thread of the run will share
    pub fn new(config: &SchedulerConfig, clock: Clock) -> Coordinator {
        let origin = clock.now();
        let state = SchedulerState::new(config, origin);
        Coordinator {
            shared: Arc::new(Mutex::new(state)),
            clock,
            cores: config.cores,
            process_count: config.processes.len(),
            origin,
            half_done_at: None,
            end_at: None,
        }
    }

    /// Runs the simulation to completion
    ///
    /// Spawns the core workers, sweeps once per frame, hands each frame's
    /// snapshot to the reporter outside the lock, and joins the workers once
    /// every process has terminated.
    ///
    /// * `reporter` - receives one consistent snapshot per frame
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> RunReport {
        info!(
            "simulating {} processes on {} cores",
            self.process_count, self.cores
        );

        let mut workers = Vec::with_capacity(self.cores as usize);
        for core_id in 0..self.cores {
            let worker = CoreWorker::new(core_id, Arc::clone(&self.shared), self.clock);
            workers.push(
                thread::Builder::new()
                    .name(format!("core-{core_id}"))
                    .spawn(move || worker.run())
                    .expect("failed to spawn core worker thread"),
            );
        }

        loop {
            let rows = self.sweep();
            reporter.render(&rows);
            if self.end_at.is_some() {
                break;
            }
            thread::sleep(FRAME);
        }

        for handle in workers {
            let _ = handle.join();
        }

        let total_runtime = self.end_at.unwrap_or(0);
        info!("run complete after {} ms", total_runtime);

        let state = self.shared.lock();
        RunReport {
            cores: self.cores,
            total_runtime,
            half_done_at: self.half_done_at,
            processes: collect_final(&state),
        }
    }

    /// One sweep under the mutex
    ///
    /// Starts processes whose arrival offset has been reached, moves
    /// processes whose I/O burst finished back to Ready, refreshes every
    /// process's aggregates, re-sorts the ready queue when the policy
    /// demands order, and updates the half-way and termination marks.
    fn sweep(&mut self) -> Vec<ProcessSnapshot> {
        let mut state = self.shared.lock();
        let now = self.clock.now();

        for idx in 0..state.process_count() {
            match state.process(idx).state() {
                ProcessState::NotStarted => {
                    if now.saturating_sub(self.origin) >= state.process(idx).start_time() {
                        state.process_mut(idx).transition(ProcessState::Ready, now);
                        state.push_ready(idx);
                        debug!("process {} arrived", state.process(idx).pid());
                    }
                }
                ProcessState::Io => {
                    if state.process(idx).burst_complete(now) {
                        let process = state.process_mut(idx);
                        process.advance_burst();
                        process.transition(ProcessState::Ready, now);
                        state.push_ready(idx);
                    }
                }
                _ => {}
            }
            state.process_mut(idx).observe(now);
        }

        if state.algorithm().needs_sorting() {
            state.sort_ready();
        }

        let elapsed = now.saturating_sub(self.origin);
        if self.half_done_at.is_none()
            && state.terminated_count() >= self.process_count.div_ceil(2)
        {
            self.half_done_at = Some(elapsed);
        }
        if state.terminated_count() == self.process_count {
            state.set_all_terminated();
            if self.end_at.is_none() {
                self.end_at = Some(elapsed);
            }
        }

        collect(&state)
    }
}
