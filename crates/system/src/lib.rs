//! Metrics source: CPU, memory, processes, sessions, disks and disk I/O.

pub mod cpu;
pub mod disk;
pub mod diskstats;
pub mod host;
pub mod memory;
pub mod process;
pub mod rate;
pub mod source;
pub mod users;

pub use diskstats::IoCounters;
pub use process::{ProcessFilter, ProcessPartition, TerminationSignal};
pub use rate::{DeviceIoHistory, IoRate, IoTracker};
pub use source::{LiveSource, MetricsSource};
