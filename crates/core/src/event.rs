use crate::interval::RefreshInterval;
use serde::{Deserialize, Serialize};

/// All messages that flow between the monitor loop and the presentation shell.
///
/// Sources:
/// - Shell (user actions)   → `TabChanged`, `IntervalChanged`, `ProcessFilterChanged`,
///                            `ShowSystemProcesses`, `DiskSelected`, `TerminateRequested`,
///                            `RefreshRequested`
/// - Config watcher task    → `ConfigReloaded`
/// - Monitor loop           → `Redraw`, `Status`
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ── Shell → monitor ───────────────────────────────────────────────────────
    /// The visible tab changed; decides which categories the next tick samples.
    TabChanged(Tab),
    /// User picked a new refresh period.
    IntervalChanged(RefreshInterval),
    /// Process name filter text changed (case-insensitive substring).
    ProcessFilterChanged(String),
    /// Show/hide processes not owned by the current user.
    ShowSystemProcesses(bool),
    /// User picked a disk in the disk list.
    DiskSelected(String),
    /// End a process. `signal` is a name such as `"TERM"` or `"SIGINT"`.
    TerminateRequested { pid: u32, signal: String },
    /// Toolbar refresh: sample every category right now.
    RefreshRequested,

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,

    // ── Monitor → shell ───────────────────────────────────────────────────────
    /// A chart surface holds stale pixels and must be repainted.
    Redraw(ChartSurface),
    /// One-line status bar text.
    Status(String),

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Graceful shutdown requested.
    Shutdown,
}

/// Tabs of the monitor window. Only the visible tab's categories are sampled
/// on a tick, apart from CPU/memory which are always sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Performance,
    Processes,
    Users,
    Disks,
}

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::Performance => "Performance",
            Tab::Processes   => "Processes",
            Tab::Users       => "Users",
            Tab::Disks       => "Disks",
        }
    }
}

/// Independently repaintable chart areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartSurface {
    /// CPU + memory history chart.
    Performance,
    /// Used/free pie for the selected disk.
    DiskUsage,
    /// Read/write throughput chart for the selected disk.
    DiskIo,
}
