//! Throughput derived from consecutive I/O counter snapshots.

use crate::diskstats::IoCounters;
use crate::memory::bytes_to_mb;
use std::collections::HashMap;
use tm_core::history::{SampleHistory, IO_CAPACITY};

/// `/proc/diskstats` always counts 512-byte sectors, whatever the hardware uses.
pub const SECTOR_SIZE: u64 = 512;

/// Bytes per second over one interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IoRate {
    pub read_bytes_per_sec:  f64,
    pub write_bytes_per_sec: f64,
}

/// Rate between two snapshots of the same device.
///
/// Returns `None` when either counter went backwards (device reset or
/// re-enumeration) or when `elapsed_secs` is not positive.
pub fn compute_rate(prev: &IoCounters, curr: &IoCounters, elapsed_secs: f64) -> Option<IoRate> {
    if elapsed_secs <= 0.0 {
        return None;
    }
    let d_read  = curr.sectors_read.checked_sub(prev.sectors_read)?;
    let d_write = curr.sectors_written.checked_sub(prev.sectors_written)?;

    Some(IoRate {
        read_bytes_per_sec:  (d_read * SECTOR_SIZE) as f64 / elapsed_secs,
        write_bytes_per_sec: (d_write * SECTOR_SIZE) as f64 / elapsed_secs,
    })
}

/// Reduce a partition device to the name its counters are keyed by:
/// `"/dev/sda1"` → `"sda"`.
///
/// Strips everything up to the last `/`, then any trailing digits. NVMe
/// partitions reduce to e.g. `"nvme0n1p"`, which matches nothing.
pub fn base_device_name(device: &str) -> &str {
    let short = device.rsplit('/').next().unwrap_or(device);
    short.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Read/write throughput histories of one device, in MB/s.
#[derive(Debug, Clone)]
pub struct DeviceIoHistory {
    pub read:  SampleHistory,
    pub write: SampleHistory,
}

impl Default for DeviceIoHistory {
    fn default() -> Self {
        Self {
            read:  SampleHistory::new(IO_CAPACITY),
            write: SampleHistory::new(IO_CAPACITY),
        }
    }
}

impl DeviceIoHistory {
    /// Chart scale: largest read or write sample, floored at 1.
    pub fn scale_max(&self) -> f64 {
        let read  = self.read.max().unwrap_or(0.0);
        let write = self.write.max().unwrap_or(0.0);
        read.max(write).max(1.0)
    }
}

/// Previous snapshots and throughput histories for every device.
#[derive(Debug, Default)]
pub struct IoTracker {
    previous:  HashMap<String, IoCounters>,
    histories: HashMap<String, DeviceIoHistory>,
    latest:    HashMap<String, IoRate>,
}

impl IoTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one snapshot of all devices into the histories.
    ///
    /// Devices seen for the first time only record their baseline. A rollback
    /// skips the append for that device but still becomes the new baseline.
    pub fn update(&mut self, current: HashMap<String, IoCounters>, elapsed_secs: f64) {
        self.latest.clear();

        for (name, counters) in &current {
            let Some(prev) = self.previous.get(name) else { continue };
            match compute_rate(prev, counters, elapsed_secs) {
                Some(rate) => {
                    let history = self.histories.entry(name.clone()).or_default();
                    history.read.append(bytes_to_mb(rate.read_bytes_per_sec));
                    history.write.append(bytes_to_mb(rate.write_bytes_per_sec));
                    self.latest.insert(name.clone(), rate);
                }
                None => tracing::debug!("I/O counters of {name} went backwards; skipping interval"),
            }
        }

        self.histories.retain(|name, _| current.contains_key(name));
        self.previous = current;
    }

    /// Histories for a partition or device name, resolved via [`base_device_name`].
    pub fn history_for(&self, device: &str) -> Option<&DeviceIoHistory> {
        self.histories.get(base_device_name(device))
    }

    /// Rate of the last interval for a partition or device name.
    pub fn latest_for(&self, device: &str) -> Option<IoRate> {
        self.latest.get(base_device_name(device)).copied()
    }

    /// Forget the previous snapshot so the next update only records a baseline.
    ///
    /// Histories are kept. Used when the sampling period changes and the old
    /// snapshot is no longer one period behind.
    pub fn reset_baseline(&mut self) {
        self.previous.clear();
        self.latest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(read: u64, written: u64) -> IoCounters {
        IoCounters { sectors_read: read, sectors_written: written, ..IoCounters::default() }
    }

    #[test]
    fn rate_is_sector_delta_times_512_over_elapsed() {
        let rate = compute_rate(&counters(1_000, 2_000), &counters(3_000, 2_500), 2.0).unwrap();
        assert_eq!(rate.read_bytes_per_sec, 2_000.0 * 512.0 / 2.0);
        assert_eq!(rate.write_bytes_per_sec, 500.0 * 512.0 / 2.0);
    }

    #[test]
    fn rollback_yields_no_rate() {
        assert_eq!(compute_rate(&counters(5_000, 10), &counters(4_000, 20), 2.0), None);
        assert_eq!(compute_rate(&counters(10, 5_000), &counters(20, 4_000), 2.0), None);
    }

    #[test]
    fn zero_elapsed_yields_no_rate() {
        assert_eq!(compute_rate(&counters(0, 0), &counters(1, 1), 0.0), None);
    }

    #[test]
    fn base_device_reduction() {
        assert_eq!(base_device_name("sda1"), "sda");
        assert_eq!(base_device_name("/dev/sda12"), "sda");
        assert_eq!(base_device_name("sdb"), "sdb");
        // Known limitation of the digit-stripping rule.
        assert_eq!(base_device_name("/dev/nvme0n1p2"), "nvme0n1p");
    }

    #[test]
    fn tracker_skips_first_sample_and_rollbacks() {
        let mut tracker = IoTracker::new();
        let snap = |r, w| HashMap::from([("sda".to_string(), counters(r, w))]);

        tracker.update(snap(0, 0), 2.0);
        assert!(tracker.history_for("/dev/sda1").is_none());

        tracker.update(snap(4096, 2048), 2.0);
        let h = tracker.history_for("/dev/sda1").unwrap();
        assert_eq!(h.read.values(), vec![1.0]); // 4096 * 512 / 2 bytes = 1 MiB/s
        assert_eq!(h.write.values(), vec![0.5]);

        tracker.update(snap(100, 4096), 2.0);
        assert_eq!(tracker.history_for("sda").unwrap().read.len(), 1);
        assert!(tracker.latest_for("sda").is_none());

        tracker.update(snap(100, 4096), 2.0);
        assert_eq!(tracker.history_for("sda").unwrap().read.values(), vec![1.0, 0.0]);
    }

    #[test]
    fn vanished_devices_are_forgotten() {
        let mut tracker = IoTracker::new();
        tracker.update(HashMap::from([("sdb".to_string(), counters(0, 0))]), 1.0);
        tracker.update(HashMap::from([("sdb".to_string(), counters(8, 8))]), 1.0);
        assert!(tracker.history_for("sdb").is_some());
        tracker.update(HashMap::new(), 1.0);
        assert!(tracker.history_for("sdb").is_none());
        assert!(tracker.latest_for("sdb").is_none());
    }

    #[test]
    fn reset_baseline_skips_one_update_and_keeps_history() {
        let mut tracker = IoTracker::new();
        let snap = |r, w| HashMap::from([("sda".to_string(), counters(r, w))]);

        tracker.update(snap(0, 0), 2.0);
        tracker.update(snap(4096, 0), 2.0);
        tracker.reset_baseline();
        assert!(tracker.latest_for("sda").is_none());

        tracker.update(snap(8192, 0), 1.0);
        assert_eq!(tracker.history_for("sda").unwrap().read.values(), vec![1.0]);
        assert!(tracker.latest_for("sda").is_none());

        tracker.update(snap(10240, 0), 1.0);
        assert_eq!(tracker.history_for("sda").unwrap().read.values(), vec![1.0, 1.0]);
    }

    #[test]
    fn scale_is_floored_at_one() {
        let mut h = DeviceIoHistory::default();
        assert_eq!(h.scale_max(), 1.0);
        h.read.append(0.25);
        assert_eq!(h.scale_max(), 1.0);
        h.write.append(12.5);
        assert_eq!(h.scale_max(), 12.5);
    }
}
