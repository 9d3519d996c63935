#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;
use tm_core::state::{CpuInfo, DiskSnapshot, HostInfo, MemoryInfo, ProcessRow, UserSession};
use tm_core::{Result, TaskError, TerminateError};
use tm_system::process::build_row;
use tm_system::{IoCounters, MetricsSource, TerminationSignal};

/// Scripted [`MetricsSource`]: returns whatever the test put in it.
#[derive(Debug, Default)]
pub struct FakeSource {
    pub cpu:        f32,
    pub memory:     MemoryInfo,
    pub processes:  Vec<ProcessRow>,
    pub partitions: Vec<DiskSnapshot>,
    pub counters:   HashMap<String, IoCounters>,
    pub io_broken:  bool,
    pub sessions:   Vec<UserSession>,
    pub refuse:     Option<TerminateError>,

    pub process_polls: usize,
    pub session_polls: usize,
    pub terminated:    Vec<(u32, TerminationSignal)>,
}

impl FakeSource {
    pub fn set_sectors(&mut self, device: &str, read: u64, written: u64) {
        self.counters.insert(
            device.to_string(),
            IoCounters { sectors_read: read, sectors_written: written, ..IoCounters::default() },
        );
    }
}

impl MetricsSource for FakeSource {
    fn cpu_usage(&mut self, _window: Duration) -> f32 {
        self.cpu
    }

    fn cpu_info(&mut self) -> CpuInfo {
        CpuInfo { model: "Fake CPU".into(), logical_cores: 4, ..CpuInfo::default() }
    }

    fn memory(&mut self) -> MemoryInfo {
        self.memory.clone()
    }

    fn processes(&mut self) -> Vec<ProcessRow> {
        self.process_polls += 1;
        self.processes.clone()
    }

    fn partitions(&mut self) -> Vec<DiskSnapshot> {
        self.partitions.clone()
    }

    fn io_counters(&mut self) -> Result<HashMap<String, IoCounters>> {
        if self.io_broken {
            return Err(TaskError::Parse("diskstats unreadable".into()));
        }
        Ok(self.counters.clone())
    }

    fn sessions(&mut self) -> Result<Vec<UserSession>> {
        self.session_polls += 1;
        Ok(self.sessions.clone())
    }

    fn host(&mut self) -> HostInfo {
        HostInfo { hostname: "testhost".into(), kernel: "6.1.0".into(), ..HostInfo::default() }
    }

    fn terminate(&mut self, pid: u32, signal: TerminationSignal) -> Result<(), TerminateError> {
        if let Some(err) = self.refuse.clone() {
            return Err(err);
        }
        self.terminated.push((pid, signal));
        self.processes.retain(|row| row.pid != pid);
        Ok(())
    }
}

pub fn process(pid: u32, name: &str, user: &str) -> ProcessRow {
    build_row(pid, name.into(), Some(user.into()), "Sleeping".into(), 1.0, 4 << 20, 1 << 30, &[])
}

pub fn disk(device: &str, mount: &str, total: u64, free: u64) -> DiskSnapshot {
    DiskSnapshot::new(device.into(), mount.into(), "ext4".into(), total, free)
}
