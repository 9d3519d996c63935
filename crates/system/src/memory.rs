//! Byte counts as the monitor prints them.

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * KIB;
const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

/// Largest binary unit that keeps the value at or above one (`"7.3 GiB"`).
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= KIB && unit + 1 < UNITS.len() {
        value /= KIB;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Resident memory column of the process tables, always in MB.
pub fn format_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / MIB)
}

/// Throughput in MB/s as stored in the I/O histories.
pub fn bytes_to_mb(bytes: f64) -> f64 {
    bytes / MIB
}
