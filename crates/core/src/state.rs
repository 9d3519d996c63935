use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

const GIB: f64 = 1_073_741_824.0;

/// Static and slowly changing CPU facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Model string from `/proc/cpuinfo`, `"Unknown"` when unavailable.
    pub model: String,
    pub logical_cores: usize,
    /// `None` if the topology could not be read.
    pub physical_cores: Option<usize>,
    pub freq_current_mhz: Option<f64>,
    pub freq_max_mhz: Option<f64>,
}

impl CpuInfo {
    pub fn cores_line(&self) -> String {
        match self.physical_cores {
            Some(p) => format!("Cores: {} (Physical: {p})", self.logical_cores),
            None    => format!("Cores: {} (Physical: unknown)", self.logical_cores),
        }
    }

    /// `None` when the frequency is unknown, so the shell can hide the label.
    pub fn frequency_line(&self) -> Option<String> {
        let current = self.freq_current_mhz?;
        let max = self.freq_max_mhz.unwrap_or(current);
        Some(format!("Frequency: {current:.2} MHz (Max: {max:.2} MHz)"))
    }
}

/// A point-in-time snapshot of virtual memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total: u64,
    pub used: u64,
    pub available: u64,
    /// `(total - available) / total` as a percentage.
    pub percent: f64,
}

impl MemoryInfo {
    pub fn from_totals(total: u64, used: u64, available: u64) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            total.saturating_sub(available) as f64 / total as f64 * 100.0
        };
        Self { total, used, available, percent }
    }

    pub fn total_line(&self) -> String {
        format!("Total: {:.2} GB", self.total as f64 / GIB)
    }

    pub fn used_line(&self) -> String {
        format!("Used: {:.2} GB ({:.1}%)", self.used as f64 / GIB, self.percent)
    }

    pub fn available_line(&self) -> String {
        format!("Available: {:.2} GB", self.available as f64 / GIB)
    }
}

/// Usage of one mounted filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskSnapshot {
    /// Device identifier, e.g. `/dev/sda1`.
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f64,
}

impl DiskSnapshot {
    /// Usage from the filesystem size and the space available to ordinary
    /// users (`f_bavail`).
    ///
    /// `used` is `total - free`, so blocks reserved for root count as used and
    /// `used + free == total` always holds. On ext4 this reads a few percent
    /// higher than the "Used" column of `df`, which leaves the reserve out of
    /// both columns.
    pub fn new(device: String, mount_point: String, fs_type: String, total: u64, free: u64) -> Self {
        let used = total.saturating_sub(free);
        let percent = if total == 0 {
            0.0
        } else {
            used as f64 / total as f64 * 100.0
        };
        Self { device, mount_point, fs_type, total, used, free, percent }
    }

    /// Used fraction in `[0, 1]` for the pie chart.
    pub fn used_fraction(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }
}

/// One row of the process tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRow {
    pub pid: u32,
    pub name: String,
    /// Owning user, `"N/A"` when unresolved.
    pub user: String,
    pub status: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub rss_bytes: u64,
    /// Resident memory as `"12.3 MB"`.
    pub memory: String,
    /// Command line truncated to 100 characters; the name when empty.
    pub command: String,
}

/// One logged-in session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user: String,
    pub terminal: String,
    pub from: String,
    pub login_time: String,
    pub idle: String,
    pub what: String,
}

/// 1/5/15-minute load averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Host facts shown beside the users list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostInfo {
    pub hostname: String,
    pub kernel: String,
    /// Seconds since the Unix epoch.
    pub boot_time: u64,
    pub uptime_secs: u64,
    pub load: LoadAverage,
}

impl HostInfo {
    pub fn boot_time_local(&self) -> Option<DateTime<Local>> {
        let secs = i64::try_from(self.boot_time).ok()?;
        Local.timestamp_opt(secs, 0).single()
    }

    pub fn uptime_line(&self) -> String {
        format!("Uptime: {}", format_uptime(self.uptime_secs))
    }

    /// `None` when the boot time does not map to a local time.
    pub fn boot_time_line(&self) -> Option<String> {
        let boot = self.boot_time_local()?;
        Some(format!("Boot Time: {}", boot.format("%Y-%m-%d %H:%M:%S")))
    }

    pub fn load_line(&self) -> String {
        format!(
            "Load Average: {:.2}, {:.2}, {:.2}",
            self.load.one, self.load.five, self.load.fifteen
        )
    }
}

/// `"3 days, 4 hours, 5 minutes"`.
pub fn format_uptime(secs: u64) -> String {
    let days    = secs / 86_400;
    let hours   = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{days} days, {hours} hours, {minutes} minutes")
}
