//! Process table: enumeration, ownership partitioning and termination.

use crate::memory::format_mb;
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::{Pid, Uid, User};
use std::ffi::OsString;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, Users};
use tm_core::state::ProcessRow;
use tm_core::TerminateError;

/// Command lines longer than this are cut (in characters).
pub const COMMAND_MAX_CHARS: usize = 100;

/// Signals a termination request may carry; `KILL` is not one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Term,
    Int,
    Hup,
}

impl TerminationSignal {
    /// Accepts `"TERM"`, `"SIGTERM"`, `"term"`, etc.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        match upper.strip_prefix("SIG").unwrap_or(&upper) {
            "TERM" => Some(Self::Term),
            "INT"  => Some(Self::Int),
            "HUP"  => Some(Self::Hup),
            _ => None,
        }
    }

    fn as_nix(self) -> Signal {
        match self {
            Self::Term => Signal::SIGTERM,
            Self::Int  => Signal::SIGINT,
            Self::Hup  => Signal::SIGHUP,
        }
    }
}

/// Which rows the process tables show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessFilter {
    /// Case-insensitive substring matched against the process name.
    pub query: String,
    /// Keep processes owned by other users.
    pub show_system: bool,
    pub current_user: String,
}

impl ProcessFilter {
    pub fn new(current_user: impl Into<String>) -> Self {
        Self {
            query: String::new(),
            show_system: true,
            current_user: current_user.into(),
        }
    }

    fn matches_name(&self, name: &str) -> bool {
        self.query.is_empty() || name.to_lowercase().contains(&self.query.to_lowercase())
    }
}

/// Rows split by ownership.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessPartition {
    /// Owned by the current user.
    pub mine: Vec<ProcessRow>,
    /// Everyone else; empty when system processes are hidden.
    pub others: Vec<ProcessRow>,
}

impl ProcessPartition {
    pub fn find(&self, pid: u32) -> Option<&ProcessRow> {
        self.mine.iter().chain(&self.others).find(|row| row.pid == pid)
    }

    pub fn len(&self) -> usize {
        self.mine.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Apply the name filter and split rows into the two tables.
pub fn partition_processes(
    rows: impl IntoIterator<Item = ProcessRow>,
    filter: &ProcessFilter,
) -> ProcessPartition {
    let mut out = ProcessPartition::default();
    for row in rows {
        if !filter.matches_name(&row.name) {
            continue;
        }
        if row.user == filter.current_user {
            out.mine.push(row);
        } else if filter.show_system {
            out.others.push(row);
        }
    }
    out
}

/// Join argv and cut it to [`COMMAND_MAX_CHARS`]; fall back to the name when empty.
pub fn command_line(args: &[OsString], name: &str) -> String {
    let joined = args
        .iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    let cut: String = joined.chars().take(COMMAND_MAX_CHARS).collect();
    if cut.trim().is_empty() {
        name.to_string()
    } else {
        cut
    }
}

/// Build one table row from raw process fields.
#[allow(clippy::too_many_arguments)]
pub fn build_row(
    pid: u32,
    name: String,
    user: Option<String>,
    status: String,
    cpu_percent: f32,
    rss_bytes: u64,
    total_memory: u64,
    args: &[OsString],
) -> ProcessRow {
    let memory_percent = if total_memory == 0 {
        0.0
    } else {
        (rss_bytes as f64 / total_memory as f64 * 100.0) as f32
    };
    let command = command_line(args, &name);
    ProcessRow {
        pid,
        user: user.unwrap_or_else(|| "N/A".to_string()),
        status,
        cpu_percent,
        memory_percent,
        rss_bytes,
        memory: format_mb(rss_bytes),
        command,
        name,
    }
}

/// Refresh and enumerate every process visible through `/proc`.
///
/// Processes that exit between the refresh and the read are simply absent.
pub fn list_processes(sys: &mut System, users: &Users) -> Vec<ProcessRow> {
    sys.refresh_memory();
    sys.refresh_processes_specifics(ProcessesToUpdate::All, true, ProcessRefreshKind::everything());
    let total_memory = sys.total_memory();

    sys.processes()
        .values()
        .map(|p| {
            let user = p
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|u| u.name().to_string());
            build_row(
                p.pid().as_u32(),
                p.name().to_string_lossy().into_owned(),
                user,
                p.status().to_string(),
                p.cpu_usage(),
                p.memory(),
                total_memory,
                p.cmd(),
            )
        })
        .collect()
}

/// Send `signal` to `pid`, categorising the failure.
pub fn terminate(pid: u32, signal: TerminationSignal) -> Result<(), TerminateError> {
    let raw = i32::try_from(pid).map_err(|_| TerminateError::Other {
        pid,
        message: "pid out of range".to_string(),
    })?;
    if raw <= 0 {
        // 0 and negatives address process groups.
        return Err(TerminateError::Other { pid, message: "invalid pid".to_string() });
    }

    match kill(Pid::from_raw(raw), signal.as_nix()) {
        Ok(()) => {
            tracing::info!("Sent {signal:?} to process {pid}");
            Ok(())
        }
        Err(errno) => Err(categorize(pid, errno)),
    }
}

fn categorize(pid: u32, errno: Errno) -> TerminateError {
    match errno {
        Errno::ESRCH => TerminateError::NotFound(pid),
        Errno::EPERM => TerminateError::PermissionDenied(pid),
        other => TerminateError::Other { pid, message: other.desc().to_string() },
    }
}

/// Login name of the user running the monitor: `$USER`, else the passwd entry.
pub fn current_user() -> String {
    if let Ok(user) = std::env::var("USER") {
        if !user.is_empty() {
            return user;
        }
    }
    match User::from_uid(Uid::current()) {
        Ok(Some(user)) => user.name,
        _ => "unknown".to_string(),
    }
}
