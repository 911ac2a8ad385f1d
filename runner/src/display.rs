//! The in-place terminal renderer.
//!
//! Each frame erases the previous table with one `ESC[A ESC[2K` (cursor up,
//! erase line) per printed line and reprints the current snapshot, so the
//! table appears to update in place. Durations arrive in milliseconds and
//! are shown as seconds with one decimal.

use std::io::{self, Write};

use scheduler::{ProcessSnapshot, Reporter};

const HEADER: &str =
    "|   PID | Priority |      State | Core | Turn Time | Wait Time | CPU Time | Remain Time |";
const RULE: &str =
    "+-------+----------+------------+------+-----------+-----------+----------+-------------+";

/// The live status table
pub struct Screen {
    /// Lines printed by the previous frame, to be erased before the next
    lines: usize,
}

impl Screen {
    pub fn new() -> Screen {
        Screen { lines: 0 }
    }
}

impl Reporter for Screen {
    fn render(&mut self, rows: &[ProcessSnapshot]) {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        for _ in 0..self.lines {
            let _ = write!(out, "\x1b[A\x1b[2K");
        }
        let _ = writeln!(out, "{HEADER}");
        let _ = writeln!(out, "{RULE}");
        for row in rows {
            let _ = writeln!(out, "{}", format_row(row));
        }
        let _ = out.flush();

        self.lines = rows.len() + 2;
    }
}

fn seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

fn format_row(row: &ProcessSnapshot) -> String {
    let core = match row.core {
        Some(core) => core.to_string(),
        None => String::from("--"),
    };
    format!(
        "| {:>5} | {:>8} | {:>10} | {:>4} | {:>9.1} | {:>9.1} | {:>8.1} | {:>11.1} |",
        row.pid,
        row.priority,
        row.state.label(),
        core,
        seconds(row.turn_time),
        seconds(row.wait_time),
        seconds(row.cpu_time),
        seconds(row.remain_time),
    )
}
