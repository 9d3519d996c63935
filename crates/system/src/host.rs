use sysinfo::System;
use tm_core::state::{HostInfo, LoadAverage};

/// Hostname, kernel, boot time, uptime and load averages.
pub fn read_host_info() -> HostInfo {
    let load = System::load_average();
    HostInfo {
        hostname:    System::host_name().unwrap_or_else(|| "unknown".to_string()),
        kernel:      System::kernel_version().unwrap_or_else(|| "unknown".to_string()),
        boot_time:   System::boot_time(),
        uptime_secs: System::uptime(),
        load: LoadAverage {
            one:     load.one,
            five:    load.five,
            fifteen: load.fifteen,
        },
    }
}
