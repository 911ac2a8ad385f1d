//! Final statistics, printed to standard output after the run.

use scheduler::RunReport;

/// The aggregate figures of one finished run
#[derive(Debug)]
pub struct Summary {
    /// Σ per-process CPU time / total runtime, as a percentage
    pub cpu_utilization: f64,
    /// Processes per second over the whole run
    pub throughput_overall: f64,
    /// Processes per second until the half-way mark (⌊N/2⌋ processes)
    pub throughput_first_half: f64,
    /// Processes per second after the half-way mark (N − ⌊N/2⌋ processes)
    pub throughput_second_half: f64,
    /// Mean per-process turnaround, in seconds
    pub avg_turnaround: f64,
    /// Mean per-process wait, in seconds
    pub avg_wait: f64,
}

/// Computes the aggregate figures from a finished run
pub fn summarize(report: &RunReport) -> Summary {
    let count = report.processes.len();
    let total_ms = report.total_runtime;

    let total_cpu: u64 = report.processes.iter().map(|p| p.cpu_time).sum();
    let cpu_utilization = percent(total_cpu, total_ms);

    let throughput_overall = per_second(count, total_ms);
    let first = count / 2;
    let second = count - first;
    let throughput_first_half = report
        .half_done_at
        .map_or(0.0, |half| per_second(first, half));
    let throughput_second_half = report
        .half_done_at
        .map_or(0.0, |half| per_second(second, total_ms.saturating_sub(half)));

    let avg_turnaround = mean_seconds(report.processes.iter().map(|p| p.turn_time), count);
    let avg_wait = mean_seconds(report.processes.iter().map(|p| p.wait_time), count);

    Summary {
        cpu_utilization,
        throughput_overall,
        throughput_first_half,
        throughput_second_half,
        avg_turnaround,
        avg_wait,
    }
}

/// Prints the end-of-run summary
pub fn print_summary(report: &RunReport) {
    let summary = summarize(report);
    println!();
    println!("CPU utilization: {:.1}%", summary.cpu_utilization);
    println!("Throughput:");
    println!(
        "  first half:  {:.2} processes/s",
        summary.throughput_first_half
    );
    println!(
        "  second half: {:.2} processes/s",
        summary.throughput_second_half
    );
    println!(
        "  overall:     {:.2} processes/s",
        summary.throughput_overall
    );
    println!("Average turnaround time: {:.2} s", summary.avg_turnaround);
    println!("Average wait time: {:.2} s", summary.avg_wait);
}

fn percent(part: u64, whole_ms: u64) -> f64 {
    if whole_ms == 0 {
        return 0.0;
    }
    part as f64 / whole_ms as f64 * 100.0
}

fn per_second(count: usize, span_ms: u64) -> f64 {
    if span_ms == 0 {
        return 0.0;
    }
    count as f64 / (span_ms as f64 / 1000.0)
}

fn mean_seconds(values_ms: impl Iterator<Item = u64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values_ms.sum::<u64>() as f64 / 1000.0 / count as f64
}
