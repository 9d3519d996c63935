//! taskman: live CPU, memory, process, user and disk monitor.
//!
//! Run with:  `RUST_LOG=info taskman`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tm_config::TaskConfig;
use tm_core::{ChartSurface, Message, RefreshInterval, Tab};
use tm_monitor::{inspect, spawn_monitor, Controller};
use tm_system::LiveSource;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "taskman", about = "Live system monitor", version)]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/taskman/taskman.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Refresh interval in seconds: 1, 2, 5 or 10
    #[arg(short, long, value_parser = parse_interval)]
    interval: Option<RefreshInterval>,

    /// Tab whose categories are sampled on every tick
    #[arg(short, long, value_enum)]
    tab: Option<TabArg>,

    /// Print a one-shot JSON snapshot and exit
    #[arg(long)]
    once: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the drawing primitives of one chart as JSON
    Chart {
        #[arg(value_enum)]
        surface: SurfaceArg,

        #[arg(long, default_value_t = 600.0)]
        width: f64,

        #[arg(long, default_value_t = 300.0)]
        height: f64,

        /// Device of the disk to chart, e.g. /dev/sda1 (default: first disk)
        #[arg(long)]
        disk: Option<String>,

        /// Samples to collect first, one refresh interval apart
        #[arg(long, default_value_t = 2)]
        samples: usize,
    },

    /// Ask a process to exit
    End {
        pid: u32,

        /// TERM, INT or HUP
        #[arg(short, long, default_value = "TERM")]
        signal: String,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TabArg {
    Performance,
    Processes,
    Users,
    Disks,
}

impl From<TabArg> for Tab {
    fn from(t: TabArg) -> Self {
        match t {
            TabArg::Performance => Tab::Performance,
            TabArg::Processes   => Tab::Processes,
            TabArg::Users       => Tab::Users,
            TabArg::Disks       => Tab::Disks,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SurfaceArg {
    Performance,
    DiskUsage,
    DiskIo,
}

impl From<SurfaceArg> for ChartSurface {
    fn from(s: SurfaceArg) -> Self {
        match s {
            SurfaceArg::Performance => ChartSurface::Performance,
            SurfaceArg::DiskUsage   => ChartSurface::DiskUsage,
            SurfaceArg::DiskIo      => ChartSurface::DiskIo,
        }
    }
}

fn parse_interval(raw: &str) -> std::result::Result<RefreshInterval, String> {
    let secs: u64 = raw.parse().map_err(|e| format!("{e}"))?;
    RefreshInterval::try_from(secs).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Structured logging on stderr so JSON output stays clean. RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(tm_config::default_path);
    let mut config = tm_config::load(&config_path)?;
    if let Some(interval) = cli.interval {
        config.general.refresh_interval = interval;
    }
    if let Some(tab) = cli.tab {
        config.general.initial_tab = tab.into();
    }

    let source = LiveSource::new().context("no usable system metrics backend")?;

    match cli.command {
        Some(Command::Chart { surface, width, height, disk, samples }) => {
            run_chart(source, &config, surface.into(), width, height, disk, samples)
        }
        Some(Command::End { pid, signal }) => run_end(source, &config, pid, &signal),
        None if cli.once => run_once(source, &config),
        None => run_loop(source, config, config_path),
    }
}

fn run_once(source: LiveSource, config: &TaskConfig) -> Result<()> {
    let mut controller = Controller::new(source, config);
    controller.prime();

    let mut value = serde_json::to_value(controller.snapshot())?;
    value["timestamp"] = serde_json::Value::String(chrono::Local::now().to_rfc3339());
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn run_chart(
    source: LiveSource,
    config: &TaskConfig,
    surface: ChartSurface,
    width: f64,
    height: f64,
    disk: Option<String>,
    samples: usize,
) -> Result<()> {
    let mut controller = Controller::new(source, config);
    controller.prime();
    controller.set_tab(Tab::Disks);
    if let Some(device) = disk.as_deref() {
        if !controller.select_disk(device) {
            anyhow::bail!("no mounted disk named '{device}'");
        }
    }

    for _ in 1..samples {
        std::thread::sleep(controller.interval().as_duration());
        controller.tick();
    }

    let ops = controller.draw(surface, width, height);
    println!("{}", serde_json::to_string_pretty(&ops)?);
    Ok(())
}

fn run_end(source: LiveSource, config: &TaskConfig, pid: u32, signal: &str) -> Result<()> {
    let mut controller = Controller::new(source, config);
    controller.set_tab(Tab::Processes);
    controller.terminate(pid, signal)?;

    if let Some(status) = controller.take_status() {
        println!("{status}");
    }
    Ok(())
}

fn run_loop(source: LiveSource, config: TaskConfig, config_path: PathBuf) -> Result<()> {
    info!("taskman v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let controller = Controller::new(source, &config);
        info!("Starting on the {} tab", controller.tab().label());
        let mut handle = spawn_monitor(controller, Some(config_path));

        loop {
            tokio::select! {
                event = handle.events.recv() => match event {
                    Some(Message::Redraw(ChartSurface::Performance)) => {
                        if let Some(line) = inspect(&handle.shared, |c| c.tick_summary()).await {
                            info!("{line}");
                        }
                    }
                    Some(Message::Status(text)) => info!("{text}"),
                    Some(_) => {}
                    None => break,
                },

                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        warn!("Cannot listen for Ctrl-C: {e}");
                    }
                    info!("Shutting down");
                    let _ = handle.commands.send(Message::Shutdown).await;
                    break;
                }
            }
        }

        if let Err(e) = handle.task.await {
            warn!("Monitor task ended abnormally: {e}");
        }
        Ok(())
    })
}
