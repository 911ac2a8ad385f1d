//! The configuration file parser.
//!
//! The format is line-oriented text. Lines starting with `#` are comments
//! and blank lines are ignored; every other line is a `key: value` pair:
//!
//! ```text
//! # two cores, round robin
//! cores: 2
//! algorithm: rr
//! context_switch: 100
//! time_slice: 300
//!
//! process: pid=101 priority=2 start=0 bursts=80,30,95
//! process: pid=102 priority=0 start=50 bursts=60
//! ```
//!
//! `cores`, `algorithm` and `context_switch` are required; `time_slice`
//! defaults to 0 and is only meaningful (and then required to be positive)
//! under round robin. Semantic rules live in `SchedulerConfig::validate`,
//! shared with every other consumer of the type.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;

use scheduler::{Algorithm, ProcessDetails, SchedulerConfig};

/// Reads and validates a simulation configuration
///
/// * `path` - the configuration file named on the command line
pub fn load(path: &Path) -> Result<SchedulerConfig> {
    let file = File::open(path)
        .with_context(|| format!("cannot open configuration file {}", path.display()))?;
    let reader = BufReader::new(file);

    let entry_re = Regex::new(r"^([a-z_]+)\s*:\s*(.+?)\s*$")?;
    let process_re =
        Regex::new(r"^pid=(\d+)\s+priority=(\d+)\s+start=(\d+)\s+bursts=(\d+(?:,\d+)*)$")?;

    let mut cores: Option<u8> = None;
    let mut algorithm: Option<Algorithm> = None;
    let mut context_switch: Option<u64> = None;
    let mut time_slice: u64 = 0;
    let mut processes = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let lineno = idx + 1;
        let line =
            line.with_context(|| format!("cannot read configuration file {}", path.display()))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let caps = entry_re
            .captures(line)
            .ok_or_else(|| anyhow!("line {lineno}: expected `key: value`, got `{line}`"))?;
        let key = caps.get(1).map_or("", |m| m.as_str());
        let value = caps.get(2).map_or("", |m| m.as_str());

        match key {
            "cores" => {
                cores = Some(
                    value
                        .parse()
                        .with_context(|| format!("line {lineno}: invalid core count `{value}`"))?,
                );
            }
            "algorithm" => {
                algorithm = Some(Algorithm::from_name(value).ok_or_else(|| {
                    anyhow!("line {lineno}: unknown algorithm `{value}` (expected fcfs, sjf, rr or pp)")
                })?);
            }
            "context_switch" => {
                context_switch = Some(value.parse().with_context(|| {
                    format!("line {lineno}: invalid context switch `{value}`")
                })?);
            }
            "time_slice" => {
                time_slice = value
                    .parse()
                    .with_context(|| format!("line {lineno}: invalid time slice `{value}`"))?;
            }
            "process" => {
                processes.push(parse_process(&process_re, value, lineno)?);
            }
            other => bail!("line {lineno}: unknown key `{other}`"),
        }
    }

    let config = SchedulerConfig {
        cores: cores.ok_or_else(|| anyhow!("configuration is missing `cores`"))?,
        algorithm: algorithm.ok_or_else(|| anyhow!("configuration is missing `algorithm`"))?,
        context_switch: context_switch
            .ok_or_else(|| anyhow!("configuration is missing `context_switch`"))?,
        time_slice,
        processes,
    };
    config.validate()?;
    Ok(config)
}

fn parse_process(process_re: &Regex, value: &str, lineno: usize) -> Result<ProcessDetails> {
    let caps = process_re.captures(value).ok_or_else(|| {
        anyhow!("line {lineno}: expected `pid=<n> priority=<n> start=<n> bursts=<n,n,...>`")
    })?;
    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());

    let burst_times = field(4)
        .split(',')
        .map(|t| {
            t.parse::<u64>()
                .with_context(|| format!("line {lineno}: invalid burst duration `{t}`"))
        })
        .collect::<Result<Vec<u64>>>()?;

    Ok(ProcessDetails {
        pid: field(1)
            .parse()
            .with_context(|| format!("line {lineno}: invalid pid `{}`", field(1)))?,
        priority: field(2)
            .parse()
            .with_context(|| format!("line {lineno}: invalid priority `{}`", field(2)))?,
        start_time: field(3)
            .parse()
            .with_context(|| format!("line {lineno}: invalid start offset `{}`", field(3)))?,
        burst_times,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("schedsim-test-{name}.conf"));
        fs::write(&path, contents).expect("write temp config");
        path
    }

    #[test]
    fn parses_a_full_configuration() {
        let path = write_config(
            "full",
            "# comment\n\
             cores: 2\n\
             algorithm: rr\n\
             context_switch: 100\n\
             time_slice: 300\n\
             \n\
             process: pid=101 priority=2 start=0 bursts=80,30,95\n\
             process: pid=102 priority=0 start=50 bursts=60\n",
        );
        let config = load(&path).expect("valid config");
        assert_eq!(config.cores, 2);
        assert_eq!(config.algorithm, Algorithm::RoundRobin);
        assert_eq!(config.context_switch, 100);
        assert_eq!(config.time_slice, 300);
        assert_eq!(config.processes.len(), 2);
        assert_eq!(config.processes[0].burst_times, vec![80, 30, 95]);
        assert_eq!(config.processes[1].start_time, 50);
    }

    #[test]
    fn rejects_an_unknown_algorithm() {
        let path = write_config(
            "badalgo",
            "cores: 1\nalgorithm: cfs\ncontext_switch: 0\nprocess: pid=1 priority=0 start=0 bursts=10\n",
        );
        let err = load(&path).unwrap_err().to_string();
        assert!(err.contains("unknown algorithm"), "{err}");
    }

    #[test]
    fn rejects_an_even_burst_count() {
        let path = write_config(
            "evenbursts",
            "cores: 1\nalgorithm: fcfs\ncontext_switch: 0\nprocess: pid=1 priority=0 start=0 bursts=10,20\n",
        );
        let err = load(&path).unwrap_err().to_string();
        assert!(err.contains("must be odd"), "{err}");
    }

    #[test]
    fn rejects_a_missing_required_key() {
        let path = write_config(
            "nocores",
            "algorithm: fcfs\ncontext_switch: 0\nprocess: pid=1 priority=0 start=0 bursts=10\n",
        );
        let err = load(&path).unwrap_err().to_string();
        assert!(err.contains("missing `cores`"), "{err}");
    }

    #[test]
    fn rejects_an_unknown_key() {
        let path = write_config("badkey", "cores: 1\nquantum: 5\n");
        let err = load(&path).unwrap_err().to_string();
        assert!(err.contains("unknown key"), "{err}");
    }

    #[test]
    fn rejects_a_malformed_process_line() {
        let path = write_config(
            "badproc",
            "cores: 1\nalgorithm: fcfs\ncontext_switch: 0\nprocess: pid=1 bursts=10\n",
        );
        let err = load(&path).unwrap_err().to_string();
        assert!(err.contains("line 4"), "{err}");
    }

    #[test]
    fn rejects_a_missing_file() {
        let path = PathBuf::from("/nonexistent/schedsim.conf");
        let err = load(&path).unwrap_err().to_string();
        assert!(err.contains("cannot open"), "{err}");
    }
}
