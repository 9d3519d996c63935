use serde::{Deserialize, Serialize};
use tm_core::{RefreshInterval, Tab};

/// Root configuration structure parsed from `taskman.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Sampling and listing behaviour.
    pub general: GeneralConfig,
    /// Chart colours and legend font.
    pub theme: ThemeConfig,
}

/// Sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Refresh period in seconds: 1, 2, 5 or 10.
    pub refresh_interval: RefreshInterval,
    /// Window over which CPU utilisation is averaged, in milliseconds.
    pub cpu_sample_window_ms: u64,
    /// List processes owned by other users.
    pub show_system_processes: bool,
    /// Tab shown at startup.
    pub initial_tab: Tab,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            refresh_interval: RefreshInterval::default(),
            cpu_sample_window_ms: 100,
            show_system_processes: true,
            initial_tab: Tab::Performance,
        }
    }
}

/// Chart colour configuration (hex strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Plot background.
    pub background: String,
    /// Legend and placeholder text.
    pub text: String,
    pub grid: String,
    pub axis: String,
    pub border: String,
    /// CPU series (line + filled area).
    pub cpu: String,
    pub memory: String,
    pub disk_read: String,
    pub disk_write: String,
    /// Pie wedge for used space.
    pub disk_used: String,
    pub disk_free: String,
    /// Legend font size in points.
    pub font_size: f32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text:       "#000000".to_string(),
            grid:       "#cccccc80".to_string(),
            axis:       "#4d4d4d".to_string(),
            border:     "#b3b3b3".to_string(),
            cpu:        "#2196f3".to_string(), // Material blue 500
            memory:     "#4caf50".to_string(), // Material green 500
            disk_read:  "#2196f3".to_string(),
            disk_write: "#f44336".to_string(), // Material red 500
            disk_used:  "#f44336".to_string(),
            disk_free:  "#4caf50".to_string(),
            font_size:  12.0,
        }
    }
}
