//! CPU model and frequency.

use std::path::Path;

pub const CPUINFO_PATH: &str = "/proc/cpuinfo";
const MAX_FREQ_PATH: &str = "/sys/devices/system/cpu/cpu0/cpufreq/cpuinfo_max_freq";

/// Model string from the first `model name` line, `None` if there is none.
pub fn parse_model_name(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .find(|line| line.starts_with("model name"))
        .and_then(|line| line.split(':').nth(1))
        .map(|model| model.trim().to_string())
}

/// Model name from `/proc/cpuinfo`, `"Unknown"` when missing.
///
/// An unreadable file is logged and treated as empty.
pub fn read_model_name(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(content) => parse_model_name(&content).unwrap_or_else(|| "Unknown".to_string()),
        Err(e) => {
            tracing::warn!("Cannot read '{}': {e}", path.display());
            "Unknown".to_string()
        }
    }
}

/// Maximum frequency of cpu0 in MHz from cpufreq (reported in kHz).
pub fn read_max_freq_mhz() -> Option<f64> {
    let raw = std::fs::read_to_string(MAX_FREQ_PATH).ok()?;
    raw.trim().parse::<f64>().ok().map(|khz| khz / 1000.0)
}
