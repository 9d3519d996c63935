//! Raw per-device I/O counters from `/proc/diskstats`.

use std::collections::HashMap;
use std::path::Path;
use tm_core::{Result, TaskError};

pub const DISKSTATS_PATH: &str = "/proc/diskstats";

/// Cumulative counters of one block device at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IoCounters {
    pub reads_completed:  u64,
    pub sectors_read:     u64,
    pub writes_completed: u64,
    pub sectors_written:  u64,
}

/// Parse `/proc/diskstats` content into a map of device name → counters.
///
/// `loop*` devices and malformed lines are skipped.
pub fn parse_diskstats(content: &str) -> HashMap<String, IoCounters> {
    let mut map = HashMap::new();

    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 {
            continue;
        }

        let name = fields[2];
        if name.starts_with("loop") {
            continue;
        }

        let parse = |i: usize| fields[i].parse::<u64>().ok();
        let (Some(reads), Some(sec_r), Some(writes), Some(sec_w)) =
            (parse(3), parse(5), parse(7), parse(9))
        else {
            tracing::debug!("Skipping malformed diskstats line: {line}");
            continue;
        };

        map.insert(
            name.to_string(),
            IoCounters {
                reads_completed:  reads,
                sectors_read:     sec_r,
                writes_completed: writes,
                sectors_written:  sec_w,
            },
        );
    }
    map
}

/// Read and parse a diskstats file.
pub fn read_diskstats(path: impl AsRef<Path>) -> Result<HashMap<String, IoCounters>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| TaskError::System(format!("cannot read '{}': {e}", path.display())))?;
    Ok(parse_diskstats(&content))
}
