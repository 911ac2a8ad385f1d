use crate::config::ProcessDetails;

/// The state of a simulated process
///
/// Exactly one state at a time. The allowed transitions are:
/// NotStarted→Ready, Ready→Running, Running→{Ready, Io, Terminated},
/// Io→Ready. Terminated is absorbing.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProcessState {
    NotStarted,
    Ready,
    Running,
    Io,
    Terminated,
}

impl ProcessState {
    /// The label shown in the status table
    pub fn label(self) -> &'static str {
        match self {
            ProcessState::NotStarted => "not started",
            ProcessState::Ready => "ready",
            ProcessState::Running => "running",
            ProcessState::Io => "i/o",
            ProcessState::Terminated => "terminated",
        }
    }
}

/// One simulated process: identity, burst plan, state machine and accounting
///
/// The burst plan alternates CPU and I/O durations (even indices CPU, odd
/// I/O). `current_burst` always points at the burst being executed or just
/// finished, so it is even while the process runs or waits for a core and odd
/// while it is in I/O.
///
/// Timing is kept as two episode accumulators (`cpu_accum`, `wait_accum`)
/// folded in on every transition out of Running or Ready, plus the derived
/// aggregates recomputed by [`observe`](Process::observe). Splitting a CPU
/// burst across preemptions therefore needs no policy-specific bookkeeping:
/// the running episode adds `now - burst_phase_start` to the CPU total and
/// [`reduce_current_burst`](Process::reduce_current_burst) subtracts the same
/// delta from the burst remainder.
pub struct Process {
    /// Process identifier
    pid: u16,
    /// Priority 0..=4, lower runs first under PP
    priority: u8,
    /// Milliseconds after program start at which the process becomes ready
    start_time: u64,
    /// Alternating CPU/I-O burst durations in milliseconds
    bursts: Vec<u64>,

    /// Current state of the process
    state: ProcessState,
    /// Index into `bursts` of the burst being executed or just finished
    current_burst: usize,
    /// Milliseconds still owed on the current burst
    ///
    /// Preemption subtracts the elapsed run time, so the next dispatch
    /// resumes the remainder instead of restarting the burst.
    remaining_in_burst: u64,
    /// The core the process runs on; `None` whenever it is not Running
    core: Option<u8>,
    /// True after the first dispatch
    launched: bool,
    /// Wall-clock ms of the first transition to Ready, anchor for turnaround
    launch_time: u64,
    /// Wall-clock ms the current execution slice or I/O slice began
    burst_phase_start: u64,
    /// Wall-clock ms the process most recently entered the ready queue
    enqueue_time: u64,
    /// Count of forced Running→Ready transitions (RR slice, PP preemption)
    preemptions: u32,

    /// CPU time from finished running episodes
    cpu_accum: u64,
    /// Ready-queue time from finished waiting episodes
    wait_accum: u64,

    /// Total time since launch; frozen on termination
    turn_time: u64,
    /// Total time spent in the ready queue
    wait_time: u64,
    /// Total time spent running on a core
    cpu_time: u64,
    /// CPU time remaining until termination
    remain_time: u64,
}

impl Process {
    /// Creates a process from its descriptor
    ///
    /// A process arriving at offset 0 starts out Ready and is launched
    /// against `now`; any other process starts NotStarted and gets its
    /// launch anchor on the first Ready transition.
    ///
    /// * `details` - the immutable workload descriptor
    /// * `now` - current clock reading, in ms since program start
    pub fn new(details: &ProcessDetails, now: u64) -> Process {
        let state = if details.start_time == 0 {
            ProcessState::Ready
        } else {
            ProcessState::NotStarted
        };
        let launch_time = if state == ProcessState::Ready { now } else { 0 };
        let remaining_in_burst = details.burst_times.first().copied().unwrap_or(0);

        let mut process = Process {
            pid: details.pid,
            priority: details.priority,
            start_time: details.start_time,
            bursts: details.burst_times.clone(),
            state,
            current_burst: 0,
            remaining_in_burst,
            core: None,
            launched: false,
            launch_time,
            burst_phase_start: 0,
            enqueue_time: now,
            preemptions: 0,
            cpu_accum: 0,
            wait_accum: 0,
            turn_time: 0,
            wait_time: 0,
            cpu_time: 0,
            remain_time: 0,
        };
        process.remain_time = process.residual_cpu();
        process
    }

    pub fn pid(&self) -> u16 {
        self.pid
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn start_time(&self) -> u64 {
        self.start_time
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn core(&self) -> Option<u8> {
        self.core
    }

    pub fn launched(&self) -> bool {
        self.launched
    }

    pub fn current_burst(&self) -> usize {
        self.current_burst
    }

    pub fn preemptions(&self) -> u32 {
        self.preemptions
    }

    pub fn turn_time(&self) -> u64 {
        self.turn_time
    }

    pub fn wait_time(&self) -> u64 {
        self.wait_time
    }

    pub fn cpu_time(&self) -> u64 {
        self.cpu_time
    }

    pub fn remain_time(&self) -> u64 {
        self.remain_time
    }

    /// True if an I/O burst follows the CPU burst being executed
    pub fn has_more_bursts(&self) -> bool {
        self.current_burst + 1 < self.bursts.len()
    }

    /// Milliseconds elapsed in the current execution or I/O slice
    pub fn burst_elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.burst_phase_start)
    }

    /// True once the current burst has received its full duration
    pub fn burst_complete(&self, now: u64) -> bool {
        self.burst_elapsed(now) >= self.remaining_in_burst
    }

    /// Recomputes the derived aggregates for the current state
    ///
    /// * `now` - current clock reading
    pub fn observe(&mut self, now: u64) {
        match self.state {
            ProcessState::NotStarted => {}
            ProcessState::Ready => {
                self.turn_time = now.saturating_sub(self.launch_time);
                self.wait_time = self.wait_accum + now.saturating_sub(self.enqueue_time);
                self.cpu_time = self.cpu_accum;
                self.remain_time = self.residual_cpu();
            }
            ProcessState::Running => {
                let run = now.saturating_sub(self.burst_phase_start);
                self.turn_time = now.saturating_sub(self.launch_time);
                self.wait_time = self.wait_accum;
                self.cpu_time = self.cpu_accum + run;
                self.remain_time = self.residual_cpu().saturating_sub(run);
            }
            ProcessState::Io => {
                self.turn_time = now.saturating_sub(self.launch_time);
                self.wait_time = self.wait_accum;
                self.cpu_time = self.cpu_accum;
                self.remain_time = self.residual_cpu();
            }
            ProcessState::Terminated => {
                self.remain_time = 0;
            }
        }
    }

    /// Moves the process to `new_state`, stamping accounting with `now`
    ///
    /// Leaving Running folds the episode into `cpu_accum`; leaving Ready
    /// folds it into `wait_accum`. Entering Ready stamps `enqueue_time`,
    /// entering Running or Io stamps `burst_phase_start`, the first Ready
    /// entry stamps `launch_time`, and Terminated freezes the aggregates.
    ///
    /// A forbidden transition is a programming defect and aborts the
    /// simulation.
    ///
    /// * `new_state` - the state to enter
    /// * `now` - current clock reading
    pub fn transition(&mut self, new_state: ProcessState, now: u64) {
        match (self.state, new_state) {
            (ProcessState::NotStarted, ProcessState::Ready) => {
                self.launch_time = now;
                self.enqueue_time = now;
            }
            (ProcessState::Ready, ProcessState::Running) => {
                self.wait_accum += now.saturating_sub(self.enqueue_time);
                self.burst_phase_start = now;
            }
            (ProcessState::Running, ProcessState::Ready) => {
                self.cpu_accum += now.saturating_sub(self.burst_phase_start);
                self.core = None;
                self.enqueue_time = now;
                self.preemptions += 1;
            }
            (ProcessState::Running, ProcessState::Io) => {
                self.cpu_accum += now.saturating_sub(self.burst_phase_start);
                self.core = None;
                self.burst_phase_start = now;
            }
            (ProcessState::Running, ProcessState::Terminated) => {
                self.cpu_accum += now.saturating_sub(self.burst_phase_start);
                self.core = None;
                self.remaining_in_burst = 0;
                self.turn_time = now.saturating_sub(self.launch_time);
                self.wait_time = self.wait_accum;
                self.cpu_time = self.cpu_accum;
                self.remain_time = 0;
            }
            (ProcessState::Io, ProcessState::Ready) => {
                self.enqueue_time = now;
            }
            (from, to) => panic!(
                "process {}: forbidden state transition {:?} -> {:?}",
                self.pid, from, to
            ),
        }
        self.state = new_state;
    }

    /// Dispatches the process onto a core
    ///
    /// Transitions Ready→Running and assigns the core in one step, so the
    /// `core.is_some() ⇔ Running` invariant never has a visible gap.
    ///
    /// * `core` - the id of the core taking the process
    /// * `now` - current clock reading
    pub fn dispatch(&mut self, core: u8, now: u64) {
        self.transition(ProcessState::Running, now);
        self.core = Some(core);
        self.launched = true;
    }

    /// Steps onto the next burst of the plan
    ///
    /// Called once per burst completion: on Running→Io it moves onto the
    /// I/O burst, on I/O completion onto the next CPU burst.
    pub fn advance_burst(&mut self) {
        self.current_burst += 1;
        self.remaining_in_burst = self.bursts.get(self.current_burst).copied().unwrap_or(0);
    }

    /// Subtracts elapsed run time from the current CPU burst's remainder
    ///
    /// Called at each preemption point (RR slice expiry, PP preemption) so
    /// the next dispatch resumes the burst where it stopped. Saturating:
    /// never produces a negative remainder.
    ///
    /// * `delta` - milliseconds actually spent running this episode
    pub fn reduce_current_burst(&mut self, delta: u64) {
        self.remaining_in_burst = self.remaining_in_burst.saturating_sub(delta);
    }

    /// CPU milliseconds still owed: the current CPU burst's remainder plus
    /// every CPU burst not yet begun
    fn residual_cpu(&self) -> u64 {
        let future: u64 = self
            .bursts
            .iter()
            .enumerate()
            .skip(self.current_burst + 1)
            .filter(|(i, _)| i % 2 == 0)
            .map(|(_, t)| t)
            .sum();
        if self.current_burst % 2 == 0 {
            future + self.remaining_in_burst
        } else {
            future
        }
    }
}
