//! Single owner of all mutable monitor state.
//!
//! The scheduler drives [`Controller::tick`]; the shell reads through the
//! accessors and asks for chart primitives with [`Controller::draw`].

use serde::Serialize;
use std::time::Duration;
use tm_config::TaskConfig;
use tm_core::history::{SampleHistory, PERFORMANCE_CAPACITY};
use tm_core::state::{CpuInfo, DiskSnapshot, HostInfo, MemoryInfo, ProcessRow, UserSession};
use tm_core::{ChartSurface, RefreshInterval, Tab, TerminateError};
use tm_renderer::{Chart, DrawOp, PieChart, TimeSeriesChart};
use tm_system::memory::{bytes_to_mb, format_bytes};
use tm_system::process::{self, partition_processes};
use tm_system::{
    DeviceIoHistory, IoRate, IoTracker, MetricsSource, ProcessFilter, ProcessPartition,
    TerminationSignal,
};
use tm_theme::Theme;
use tracing::{debug, info, warn};

pub const REFRESHED_MESSAGE: &str = "Data refreshed";

/// Monitor state plus the source it samples.
pub struct Controller<S> {
    source: S,
    theme:  Theme,

    interval:   RefreshInterval,
    cpu_window: Duration,
    tab:        Tab,
    status:     Option<String>,

    // ── Performance ──────────────────────────────────────────────────────────
    cpu_percent:    f32,
    cpu_history:    SampleHistory,
    memory_history: SampleHistory,
    cpu_info:       CpuInfo,
    memory_info:    MemoryInfo,

    // ── Disks ────────────────────────────────────────────────────────────────
    disks:         Vec<DiskSnapshot>,
    selected_disk: Option<String>,
    io:            IoTracker,

    // ── Processes / users ────────────────────────────────────────────────────
    all_processes: Vec<ProcessRow>,
    processes:     ProcessPartition,
    filter:        ProcessFilter,
    sessions:      Vec<UserSession>,
    host:          Option<HostInfo>,
}

impl<S: MetricsSource> Controller<S> {
    /// Controller for the user running the monitor.
    pub fn new(source: S, config: &TaskConfig) -> Self {
        Self::with_user(source, config, process::current_user())
    }

    /// Controller whose "own processes" table belongs to `user`.
    pub fn with_user(source: S, config: &TaskConfig, user: impl Into<String>) -> Self {
        let general = &config.general;
        let mut filter = ProcessFilter::new(user);
        filter.show_system = general.show_system_processes;

        Self {
            source,
            theme: Theme::from_config(&config.theme),
            interval: general.refresh_interval,
            cpu_window: Duration::from_millis(general.cpu_sample_window_ms),
            tab: general.initial_tab,
            status: None,
            cpu_percent: 0.0,
            cpu_history: SampleHistory::new(PERFORMANCE_CAPACITY),
            memory_history: SampleHistory::new(PERFORMANCE_CAPACITY),
            cpu_info: CpuInfo::default(),
            memory_info: MemoryInfo::default(),
            disks: Vec::new(),
            selected_disk: None,
            io: IoTracker::new(),
            all_processes: Vec::new(),
            processes: ProcessPartition::default(),
            filter,
            sessions: Vec::new(),
            host: None,
        }
    }

    // ── Sampling ─────────────────────────────────────────────────────────────

    /// First population at startup: every category plus the I/O baseline.
    pub fn prime(&mut self) {
        self.sample_performance();
        self.sample_io();
        self.sample_processes();
        self.sample_users();
        self.sample_disks();
    }

    /// One scheduled sampling pass. Returns the surfaces that need repainting.
    ///
    /// CPU, memory and I/O counters are sampled on every tick; processes,
    /// sessions and partitions only while their tab is visible.
    pub fn tick(&mut self) -> Vec<ChartSurface> {
        self.sample_performance();
        self.sample_io();

        let mut dirty = vec![ChartSurface::Performance];
        match self.tab {
            Tab::Performance => {}
            Tab::Processes => self.sample_processes(),
            Tab::Users => self.sample_users(),
            Tab::Disks => {
                self.sample_disks();
                dirty.extend([ChartSurface::DiskUsage, ChartSurface::DiskIo]);
            }
        }

        debug!(
            "Tick: cpu {:.1}%, memory {:.1}%, {} processes, {} disks",
            self.cpu_percent,
            self.memory_info.percent,
            self.processes.len(),
            self.disks.len()
        );
        dirty
    }

    /// Sample every category regardless of the visible tab.
    ///
    /// I/O counters are left to the scheduler so rates stay per interval.
    pub fn refresh_all(&mut self) -> Vec<ChartSurface> {
        self.sample_performance();
        self.sample_processes();
        self.sample_users();
        self.sample_disks();
        self.set_status(REFRESHED_MESSAGE);
        vec![ChartSurface::Performance, ChartSurface::DiskUsage, ChartSurface::DiskIo]
    }

    fn sample_performance(&mut self) {
        self.cpu_percent = self.source.cpu_usage(self.cpu_window);
        self.cpu_history.append(f64::from(self.cpu_percent));

        self.memory_info = self.source.memory();
        self.memory_history.append(self.memory_info.percent);

        self.cpu_info = self.source.cpu_info();
    }

    fn sample_io(&mut self) {
        match self.source.io_counters() {
            Ok(counters) => self.io.update(counters, self.interval.as_secs() as f64),
            Err(e) => warn!("Disk I/O counters unavailable: {e}"),
        }
    }

    fn sample_processes(&mut self) {
        self.all_processes = self.source.processes();
        self.repartition();
    }

    fn sample_users(&mut self) {
        match self.source.sessions() {
            Ok(sessions) => self.sessions = sessions,
            Err(e) => warn!("Logged-in users unavailable: {e}"),
        }
        self.host = Some(self.source.host());
    }

    fn sample_disks(&mut self) {
        self.disks = self.source.partitions();

        let still_present = self
            .selected_disk
            .as_deref()
            .is_some_and(|dev| self.disks.iter().any(|d| d.device == dev));
        if !still_present {
            let fallback = self.disks.first().map(|d| d.device.clone());
            if self.selected_disk.is_some() {
                debug!("Selected disk vanished; falling back to {fallback:?}");
            }
            self.selected_disk = fallback;
        }
    }

    fn repartition(&mut self) {
        self.processes = partition_processes(self.all_processes.iter().cloned(), &self.filter);
    }

    // ── Shell requests ───────────────────────────────────────────────────────

    /// Change the refresh period. The caller reschedules the timer; nothing is
    /// resampled here.
    ///
    /// The I/O baseline is dropped, so the first tick on the new period only
    /// records counters and no rate spans two different periods.
    pub fn set_interval(&mut self, interval: RefreshInterval) {
        self.interval = interval;
        self.io.reset_baseline();
        self.set_status(format!(
            "Update interval changed to {} second(s)",
            interval.as_secs()
        ));
    }

    /// Switch tabs and fill the new tab's tables right away.
    pub fn set_tab(&mut self, tab: Tab) -> Vec<ChartSurface> {
        self.tab = tab;
        debug!("Showing the {} tab", tab.label());
        match tab {
            Tab::Performance => vec![ChartSurface::Performance],
            Tab::Processes => {
                self.sample_processes();
                Vec::new()
            }
            Tab::Users => {
                self.sample_users();
                Vec::new()
            }
            Tab::Disks => {
                self.sample_disks();
                vec![ChartSurface::DiskUsage, ChartSurface::DiskIo]
            }
        }
    }

    pub fn set_process_query(&mut self, query: impl Into<String>) {
        self.filter.query = query.into();
        self.repartition();
    }

    pub fn set_show_system(&mut self, show: bool) {
        self.filter.show_system = show;
        self.repartition();
    }

    /// Select a disk by device. Unknown devices are ignored.
    pub fn select_disk(&mut self, device: &str) -> bool {
        if !self.disks.iter().any(|d| d.device == device) {
            warn!("Ignoring selection of unknown disk '{device}'");
            return false;
        }
        self.selected_disk = Some(device.to_string());
        true
    }

    /// Ask `pid` to exit with the named signal.
    ///
    /// On success the status line names the process and the tables are
    /// refreshed. Failures are returned as-is; nothing is retried.
    pub fn terminate(&mut self, pid: u32, signal: &str) -> Result<(), TerminateError> {
        let signal = TerminationSignal::from_name(signal).ok_or_else(|| TerminateError::Other {
            pid,
            message: format!("unsupported signal '{signal}'"),
        })?;

        let name = self
            .all_processes
            .iter()
            .find(|row| row.pid == pid)
            .map(|row| row.name.clone())
            .unwrap_or_else(|| "unknown".to_string());

        self.source.terminate(pid, signal)?;

        info!("Terminated {name} ({pid}) with {signal:?}");
        self.set_status(format!("Process {name} (PID: {pid}) terminated"));
        self.sample_processes();
        Ok(())
    }

    /// Apply a reloaded config: interval, show-system flag, CPU window and theme.
    pub fn apply_config(&mut self, config: &TaskConfig) {
        let general = &config.general;
        if general.refresh_interval != self.interval {
            self.set_interval(general.refresh_interval);
        }
        if general.show_system_processes != self.filter.show_system {
            self.set_show_system(general.show_system_processes);
        }
        self.cpu_window = Duration::from_millis(general.cpu_sample_window_ms);
        self.theme = Theme::from_config(&config.theme);
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// Status text posted since the last call, if any.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn interval(&self) -> RefreshInterval {
        self.interval
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn cpu_percent(&self) -> f32 {
        self.cpu_percent
    }

    pub fn cpu_history(&self) -> &SampleHistory {
        &self.cpu_history
    }

    pub fn memory_history(&self) -> &SampleHistory {
        &self.memory_history
    }

    pub fn cpu_info(&self) -> &CpuInfo {
        &self.cpu_info
    }

    pub fn memory_info(&self) -> &MemoryInfo {
        &self.memory_info
    }

    pub fn disks(&self) -> &[DiskSnapshot] {
        &self.disks
    }

    pub fn selected_disk(&self) -> Option<&DiskSnapshot> {
        let device = self.selected_disk.as_deref()?;
        self.disks.iter().find(|d| d.device == device)
    }

    /// Throughput histories of the selected disk's base device.
    pub fn selected_io_history(&self) -> Option<&DeviceIoHistory> {
        self.io.history_for(&self.selected_disk()?.device)
    }

    /// Last interval's throughput of the selected disk.
    pub fn selected_io_rate(&self) -> Option<IoRate> {
        self.io.latest_for(&self.selected_disk()?.device)
    }

    pub fn io(&self) -> &IoTracker {
        &self.io
    }

    pub fn processes(&self) -> &ProcessPartition {
        &self.processes
    }

    pub fn filter(&self) -> &ProcessFilter {
        &self.filter
    }

    pub fn sessions(&self) -> &[UserSession] {
        &self.sessions
    }

    pub fn host(&self) -> Option<&HostInfo> {
        self.host.as_ref()
    }

    /// `"CPU 12.5% | Memory 40.0% (3.2 GB / 8.0 GB) | 312 processes"`.
    pub fn tick_summary(&self) -> String {
        format!(
            "CPU {:.1}% | Memory {:.1}% ({} / {}) | {} processes",
            self.cpu_percent,
            self.memory_info.percent,
            format_bytes(self.memory_info.used),
            format_bytes(self.memory_info.total),
            self.processes.len(),
        )
    }

    /// Detail labels shown beside the charts and the users list.
    ///
    /// Frequency and boot time are left out when unknown; host lines appear
    /// once the users category has been sampled.
    pub fn detail_lines(&self) -> Vec<String> {
        let cpu = &self.cpu_info;
        let memory = &self.memory_info;

        let mut lines = vec![format!("Model: {}", cpu.model), cpu.cores_line()];
        lines.extend(cpu.frequency_line());
        lines.extend([memory.total_line(), memory.used_line(), memory.available_line()]);
        if let Some(host) = &self.host {
            lines.push(host.uptime_line());
            lines.extend(host.boot_time_line());
            lines.push(host.load_line());
        }
        lines
    }

    // ── Charts ───────────────────────────────────────────────────────────────

    pub fn performance_chart(&self) -> TimeSeriesChart {
        TimeSeriesChart::performance(&self.cpu_history, &self.memory_history, &self.theme)
    }

    pub fn disk_usage_chart(&self) -> PieChart {
        PieChart::new(self.selected_disk().map(DiskSnapshot::used_fraction), &self.theme)
    }

    /// Empty histories when the selected disk has no counters yet.
    pub fn disk_io_chart(&self) -> TimeSeriesChart {
        match self.selected_io_history() {
            Some(h) => TimeSeriesChart::disk_io(&h.read, &h.write, &self.theme),
            None => {
                let empty = DeviceIoHistory::default();
                TimeSeriesChart::disk_io(&empty.read, &empty.write, &self.theme)
            }
        }
    }

    /// Primitives for one surface at the given pixel size.
    pub fn draw(&self, surface: ChartSurface, width: f64, height: f64) -> Vec<DrawOp> {
        match surface {
            ChartSurface::Performance => self.performance_chart().draw(width, height),
            ChartSurface::DiskUsage => self.disk_usage_chart().draw(width, height),
            ChartSurface::DiskIo => self.disk_io_chart().draw(width, height),
        }
    }

    /// Serializable copy of the current values.
    pub fn snapshot(&self) -> Snapshot {
        let io = self.selected_io_rate().map(|rate| IoSummary {
            read_mb_per_sec:  bytes_to_mb(rate.read_bytes_per_sec),
            write_mb_per_sec: bytes_to_mb(rate.write_bytes_per_sec),
        });
        Snapshot {
            interval_secs:   self.interval.as_secs(),
            cpu_percent:     self.cpu_percent,
            cpu:             self.cpu_info.clone(),
            memory:          self.memory_info.clone(),
            disks:           self.disks.clone(),
            selected_disk:   self.selected_disk.clone(),
            selected_io:     io,
            host:            self.host.clone(),
            details:         self.detail_lines(),
            sessions:        self.sessions.clone(),
            own_processes:   self.processes.mine.clone(),
            other_processes: self.processes.others.clone(),
        }
    }
}

/// Point-in-time copy of everything the monitor shows.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub interval_secs:   u64,
    pub cpu_percent:     f32,
    pub cpu:             CpuInfo,
    pub memory:          MemoryInfo,
    pub disks:           Vec<DiskSnapshot>,
    pub selected_disk:   Option<String>,
    pub selected_io:     Option<IoSummary>,
    pub host:            Option<HostInfo>,
    pub details:         Vec<String>,
    pub sessions:        Vec<UserSession>,
    pub own_processes:   Vec<ProcessRow>,
    pub other_processes: Vec<ProcessRow>,
}

/// Throughput of the selected disk over the last interval.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IoSummary {
    pub read_mb_per_sec:  f64,
    pub write_mb_per_sec: f64,
}
