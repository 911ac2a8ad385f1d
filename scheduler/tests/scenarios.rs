//! End-to-end scenario tests, run against the real thread pool.
//!
//! Simulated time is wall-clock time, so every assertion carries a generous
//! tolerance: arrivals and I/O completions are gated by the ~16 ms
//! coordinator frame, idle cores poll every millisecond, and the host may be
//! loaded. The tolerances are wide enough that a scenario only fails when
//! the scheduling behavior itself is wrong.

use scheduler::{
    Algorithm, Clock, Coordinator, ProcessDetails, ProcessSnapshot, ProcessState, RunReport,
    SchedulerConfig, SilentReporter,
};

/// Upper bound on scheduling latency noise, in ms
///
/// Scenario tests run concurrently with each other under the default test
/// harness, so dispatch latency can stretch well past the 1 ms idle poll.
const SLACK: u64 = 100;

fn details(pid: u16, priority: u8, start_time: u64, bursts: &[u64]) -> ProcessDetails {
    ProcessDetails {
        pid,
        priority,
        start_time,
        burst_times: bursts.to_vec(),
    }
}

fn run(
    cores: u8,
    algorithm: Algorithm,
    context_switch: u64,
    time_slice: u64,
    processes: Vec<ProcessDetails>,
) -> RunReport {
    let config = SchedulerConfig {
        cores,
        algorithm,
        context_switch,
        time_slice,
        processes,
    };
    config.validate().expect("scenario config must be valid");
    let mut coordinator = Coordinator::new(&config, Clock::start());
    coordinator.run(&mut SilentReporter)
}

fn process<'a>(report: &'a RunReport, pid: u16) -> &'a ProcessSnapshot {
    report
        .processes
        .iter()
        .find(|p| p.pid == pid)
        .expect("pid missing from report")
}

fn assert_all_terminated(report: &RunReport) {
    for p in &report.processes {
        assert_eq!(p.state, ProcessState::Terminated, "pid {}", p.pid);
        assert_eq!(p.remain_time, 0, "pid {}", p.pid);
        assert_eq!(p.core, None, "pid {}", p.pid);
    }
}

/// No more than one CPU-second per core per wall-second, with frame slop
fn assert_cpu_capacity(report: &RunReport) {
    let total_cpu: u64 = report.processes.iter().map(|p| p.cpu_time).sum();
    let capacity = report.cores as u64 * (report.total_runtime + SLACK);
    assert!(
        total_cpu <= capacity,
        "cpu {total_cpu} ms exceeds capacity {capacity} ms"
    );
}

#[test]
fn s1_fcfs_single_process() {
    let report = run(1, Algorithm::Fcfs, 0, 0, vec![details(1, 0, 0, &[100])]);
    assert_all_terminated(&report);
    assert_cpu_capacity(&report);

    let p = process(&report, 1);
    assert!(p.cpu_time >= 100 && p.cpu_time <= 100 + SLACK, "cpu {}", p.cpu_time);
    assert!(p.wait_time <= SLACK, "wait {}", p.wait_time);
    assert!(p.turn_time >= 100 && p.turn_time <= 100 + SLACK, "turn {}", p.turn_time);
    assert_eq!(p.preemptions, 0);
    assert!(report.total_runtime >= 100);
}

#[test]
fn s2_fcfs_runs_in_insertion_order() {
    let report = run(
        1,
        Algorithm::Fcfs,
        0,
        0,
        vec![details(1, 0, 0, &[100]), details(2, 0, 0, &[50])],
    );
    assert_all_terminated(&report);
    assert_cpu_capacity(&report);

    let a = process(&report, 1);
    let b = process(&report, 2);
    assert!(a.wait_time <= SLACK, "wait_a {}", a.wait_time);
    assert!(
        b.wait_time >= 100 - 20 && b.wait_time <= 100 + SLACK,
        "wait_b {}",
        b.wait_time
    );
    assert!(b.turn_time >= 150 - 20, "turn_b {}", b.turn_time);
    assert!(report.total_runtime >= 150 && report.total_runtime <= 150 + 2 * SLACK);
}

#[test]
fn s3_sjf_runs_shortest_budget_first() {
    let report = run(
        1,
        Algorithm::Sjf,
        0,
        0,
        vec![details(1, 0, 0, &[100]), details(2, 0, 0, &[50])],
    );
    assert_all_terminated(&report);

    let a = process(&report, 1);
    let b = process(&report, 2);
    // B holds the smaller budget and must go first; running A first would
    // leave B waiting ~100 ms.
    assert!(b.wait_time <= 60, "wait_b {}", b.wait_time);
    assert!(
        a.wait_time >= 50 - 20 && a.wait_time <= 50 + SLACK,
        "wait_a {}",
        a.wait_time
    );
    assert!(b.turn_time < a.turn_time);
}

#[test]
fn s4_rr_preempts_on_the_time_slice() {
    let report = run(1, Algorithm::RoundRobin, 0, 30, vec![details(1, 0, 0, &[100])]);
    assert_all_terminated(&report);

    let p = process(&report, 1);
    assert!(p.preemptions >= 3, "preemptions {}", p.preemptions);
    assert!(p.cpu_time >= 100 && p.cpu_time <= 100 + 2 * SLACK, "cpu {}", p.cpu_time);
    assert!(report.total_runtime >= 100 && report.total_runtime <= 400);
}

#[test]
fn s5_pp_urgent_arrival_with_a_free_core() {
    let report = run(
        2,
        Algorithm::PreemptivePriority,
        0,
        0,
        vec![details(1, 2, 0, &[200]), details(2, 0, 50, &[50])],
    );
    assert_all_terminated(&report);
    assert_cpu_capacity(&report);

    let p1 = process(&report, 1);
    let p2 = process(&report, 2);
    // Whether P2 lands on the idle core or briefly displaces P1 is a benign
    // race; either way it barely waits and finishes first.
    assert!(p2.wait_time <= 60, "wait_p2 {}", p2.wait_time);
    assert!(p2.turn_time < p1.turn_time);
    assert!(p1.cpu_time >= 200 && p1.cpu_time <= 200 + 2 * SLACK, "cpu_p1 {}", p1.cpu_time);
    assert!(p2.cpu_time >= 50 && p2.cpu_time <= 50 + SLACK, "cpu_p2 {}", p2.cpu_time);
}

#[test]
fn s6_pp_preempts_on_a_single_core() {
    let report = run(
        1,
        Algorithm::PreemptivePriority,
        0,
        0,
        vec![details(1, 2, 0, &[200]), details(2, 0, 50, &[50])],
    );
    assert_all_terminated(&report);

    let p1 = process(&report, 1);
    let p2 = process(&report, 2);
    assert!(p1.preemptions >= 1, "preemptions {}", p1.preemptions);
    // Without preemption P2 would sit behind P1's 200 ms burst
    assert!(p2.wait_time <= 60, "wait_p2 {}", p2.wait_time);
    // P1's CPU time spans both running episodes around the preemption
    assert!(p1.cpu_time >= 200 && p1.cpu_time <= 200 + 2 * SLACK, "cpu_p1 {}", p1.cpu_time);
    assert!(p1.turn_time >= 250 - 20, "turn_p1 {}", p1.turn_time);
    assert!(p2.turn_time < p1.turn_time);
}

#[test]
fn rr_with_an_oversized_slice_degenerates_to_fcfs() {
    let report = run(
        1,
        Algorithm::RoundRobin,
        0,
        1000,
        vec![details(1, 0, 0, &[100]), details(2, 0, 0, &[50])],
    );
    assert_all_terminated(&report);

    let a = process(&report, 1);
    let b = process(&report, 2);
    assert_eq!(a.preemptions, 0);
    assert_eq!(b.preemptions, 0);
    assert!(
        b.wait_time >= 100 - 20 && b.wait_time <= 100 + SLACK,
        "wait_b {}",
        b.wait_time
    );
}

#[test]
fn enough_cores_means_nobody_queues() {
    let report = run(
        2,
        Algorithm::Fcfs,
        0,
        0,
        vec![details(1, 0, 0, &[80]), details(2, 0, 0, &[80])],
    );
    assert_all_terminated(&report);
    assert_cpu_capacity(&report);

    // With a core per process, nobody queues: a serialized run would leave
    // the second process waiting ~80 ms, well past this bound.
    for p in &report.processes {
        assert!(p.wait_time <= 40, "pid {} wait {}", p.pid, p.wait_time);
        assert!(p.cpu_time >= 80, "pid {} cpu {}", p.pid, p.cpu_time);
    }
    assert!(report.total_runtime <= 80 + 2 * SLACK);
}

#[test]
fn io_bursts_round_trip_through_the_ready_queue() {
    let report = run(
        1,
        Algorithm::Fcfs,
        0,
        0,
        vec![details(1, 0, 0, &[60, 40, 60])],
    );
    assert_all_terminated(&report);

    let p = process(&report, 1);
    // 120 ms of CPU around a 40 ms I/O burst
    assert!(p.cpu_time >= 120 && p.cpu_time <= 120 + 2 * SLACK, "cpu {}", p.cpu_time);
    assert!(p.turn_time >= 160, "turn {}", p.turn_time);
    assert_eq!(p.preemptions, 0);
}

#[test]
fn context_switch_spaces_out_dispatches() {
    let report = run(
        1,
        Algorithm::Fcfs,
        50,
        0,
        vec![details(1, 0, 0, &[60]), details(2, 0, 0, &[60])],
    );
    assert_all_terminated(&report);

    // 120 ms of work plus at least one 50 ms switch between the dispatches
    assert!(report.total_runtime >= 170 - 20, "total {}", report.total_runtime);
}

#[test]
fn half_way_mark_falls_between_the_halves() {
    let report = run(
        1,
        Algorithm::Fcfs,
        0,
        0,
        vec![details(1, 0, 0, &[60]), details(2, 0, 0, &[60])],
    );
    let half = report.half_done_at.expect("half mark must be recorded");
    assert!(half >= 60 - 20, "half {half}");
    assert!(half <= report.total_runtime);
}
