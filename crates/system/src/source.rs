use crate::diskstats::{self, IoCounters, DISKSTATS_PATH};
use crate::process::{self, TerminationSignal};
use crate::{cpu, disk, host, users};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use sysinfo::{System, Users};
use tm_core::state::{CpuInfo, DiskSnapshot, HostInfo, MemoryInfo, ProcessRow, UserSession};
use tm_core::{Result, TaskError, TerminateError};

/// Point-in-time accessors over the operating system.
///
/// The controller polls one of these on every tick. [`LiveSource`] is the real
/// implementation; tests substitute a scripted one.
pub trait MetricsSource {
    /// CPU utilisation in percent, averaged over `window`. May block for `window`.
    fn cpu_usage(&mut self, window: Duration) -> f32;

    fn cpu_info(&mut self) -> CpuInfo;

    fn memory(&mut self) -> MemoryInfo;

    /// Every process, unfiltered.
    fn processes(&mut self) -> Vec<ProcessRow>;

    /// Mounted partitions without pseudo filesystems, in enumeration order.
    fn partitions(&mut self) -> Vec<DiskSnapshot>;

    /// Raw I/O counters keyed by kernel device name.
    fn io_counters(&mut self) -> Result<HashMap<String, IoCounters>>;

    fn sessions(&mut self) -> Result<Vec<UserSession>>;

    fn host(&mut self) -> HostInfo;

    fn terminate(&mut self, pid: u32, signal: TerminationSignal) -> Result<(), TerminateError>;
}

/// [`MetricsSource`] backed by `sysinfo` and `/proc`.
pub struct LiveSource {
    sys:   System,
    users: Users,
    model: String,
    physical_cores: Option<usize>,
}

impl LiveSource {
    /// Fails when the platform has no usable metrics backend.
    pub fn new() -> Result<Self> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(TaskError::System(
                "system metrics are not supported on this platform".into(),
            ));
        }
        if !Path::new("/proc/stat").exists() {
            return Err(TaskError::System("/proc is not mounted".into()));
        }

        let model = cpu::read_model_name(cpu::CPUINFO_PATH);
        let mut sys = System::new();
        sys.refresh_cpu_all();
        sys.refresh_memory();

        tracing::debug!("Metrics source ready: {model}, {} logical cores", sys.cpus().len());

        Ok(Self {
            sys,
            users: Users::new_with_refreshed_list(),
            model,
            physical_cores: System::physical_core_count(),
        })
    }
}

impl MetricsSource for LiveSource {
    fn cpu_usage(&mut self, window: Duration) -> f32 {
        self.sys.refresh_cpu_usage();
        std::thread::sleep(window);
        self.sys.refresh_cpu_usage();
        self.sys.global_cpu_usage()
    }

    fn cpu_info(&mut self) -> CpuInfo {
        self.sys.refresh_cpu_frequency();
        let freq_current_mhz = self
            .sys
            .cpus()
            .first()
            .map(|c| c.frequency())
            .filter(|&mhz| mhz > 0)
            .map(|mhz| mhz as f64);

        CpuInfo {
            model: self.model.clone(),
            logical_cores: self.sys.cpus().len(),
            physical_cores: self.physical_cores,
            freq_current_mhz,
            freq_max_mhz: cpu::read_max_freq_mhz(),
        }
    }

    fn memory(&mut self) -> MemoryInfo {
        self.sys.refresh_memory();
        MemoryInfo::from_totals(
            self.sys.total_memory(),
            self.sys.used_memory(),
            self.sys.available_memory(),
        )
    }

    fn processes(&mut self) -> Vec<ProcessRow> {
        self.users = Users::new_with_refreshed_list();
        process::list_processes(&mut self.sys, &self.users)
    }

    fn partitions(&mut self) -> Vec<DiskSnapshot> {
        disk::read_partitions()
    }

    fn io_counters(&mut self) -> Result<HashMap<String, IoCounters>> {
        diskstats::read_diskstats(DISKSTATS_PATH)
    }

    fn sessions(&mut self) -> Result<Vec<UserSession>> {
        users::list_sessions()
    }

    fn host(&mut self) -> HostInfo {
        host::read_host_info()
    }

    fn terminate(&mut self, pid: u32, signal: TerminationSignal) -> Result<(), TerminateError> {
        process::terminate(pid, signal)
    }
}
