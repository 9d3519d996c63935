//! Timer-driven monitor loop.
//!
//! [`spawn_monitor`] moves a [`Controller`] behind a [`SharedController`] and
//! runs one task that reacts to scheduler ticks, shell commands and config
//! file changes. Every mutation happens under the lock; redraw and status
//! notifications go out on the events channel once the lock is released.

pub mod controller;
pub mod scheduler;

pub use controller::{Controller, IoSummary, Snapshot};
pub use scheduler::RefreshScheduler;

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tm_config::ConfigWatcher;
use tm_core::{ChartSurface, Message, RefreshInterval};
use tm_system::MetricsSource;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// The controller as seen by both the monitor task and the shell.
pub type SharedController<S> = Arc<Mutex<Controller<S>>>;

/// Lock the controller; a panic in an earlier holder does not make it unusable.
pub fn lock<S>(shared: &SharedController<S>) -> MutexGuard<'_, Controller<S>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handles returned by [`spawn_monitor`].
pub struct MonitorHandle<S> {
    pub shared:   SharedController<S>,
    /// Shell → monitor requests.
    pub commands: mpsc::Sender<Message>,
    /// `Redraw` and `Status` notifications.
    pub events:   mpsc::Receiver<Message>,
    pub task:     JoinHandle<()>,
}

/// Prime `controller` and start the monitor task on the current runtime.
///
/// With `config_path` set, the file is watched and reapplied on change.
pub fn spawn_monitor<S>(controller: Controller<S>, config_path: Option<PathBuf>) -> MonitorHandle<S>
where
    S: MetricsSource + Send + 'static,
{
    let period = controller.interval();
    let shared = Arc::new(Mutex::new(controller));
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(64);

    let task = tokio::spawn(run(shared.clone(), period, cmd_rx, event_tx, config_path));

    MonitorHandle {
        shared,
        commands: cmd_tx,
        events: event_rx,
        task,
    }
}

/// Read the controller on the blocking pool, so waiting for the lock never
/// stalls the async runtime.
///
/// `None` if the read panicked.
pub async fn inspect<S, T, F>(shared: &SharedController<S>, f: F) -> Option<T>
where
    S: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&Controller<S>) -> T + Send + 'static,
{
    let shared = shared.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let controller = lock(&shared);
        f(&*controller)
    })
    .await;
    match joined {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Monitor read failed: {e}");
            None
        }
    }
}

async fn run<S>(
    shared: SharedController<S>,
    period: RefreshInterval,
    mut commands: mpsc::Receiver<Message>,
    events: mpsc::Sender<Message>,
    config_path: Option<PathBuf>,
) where
    S: MetricsSource + Send + 'static,
{
    let mut scheduler = RefreshScheduler::new(period);

    let mut config_rx = config_path.as_ref().map(|path| ConfigWatcher::spawn(path).1);

    if let Some(dirty) = with_controller(&shared, &events, |c| {
        c.prime();
        vec![ChartSurface::Performance, ChartSurface::DiskUsage, ChartSurface::DiskIo]
    })
    .await
    {
        notify(&events, dirty);
    }

    info!("Monitor running, refreshing every {}", scheduler.period().label());

    loop {
        tokio::select! {
            _ = scheduler.tick() => {
                if let Some(dirty) = with_controller(&shared, &events, |c| c.tick()).await {
                    notify(&events, dirty);
                }
            }

            cmd = commands.recv() => {
                let Some(cmd) = cmd else { break };
                if cmd == Message::Shutdown {
                    break;
                }
                handle_command(&shared, &events, &mut scheduler, config_path.as_ref(), cmd).await;
            }

            change = next_config_change(&mut config_rx) => {
                if change.is_none() {
                    config_rx = None;
                    continue;
                }
                handle_command(&shared, &events, &mut scheduler, config_path.as_ref(), Message::ConfigReloaded).await;
            }
        }
    }

    info!("Monitor stopped");
}

async fn handle_command<S>(
    shared: &SharedController<S>,
    events: &mpsc::Sender<Message>,
    scheduler: &mut RefreshScheduler,
    config_path: Option<&PathBuf>,
    cmd: Message,
) where
    S: MetricsSource + Send + 'static,
{
    let outcome = match cmd {
        Message::TabChanged(tab) => with_controller(shared, events, move |c| c.set_tab(tab)).await,
        Message::IntervalChanged(interval) => {
            scheduler.set_period(interval);
            with_controller(shared, events, move |c| {
                c.set_interval(interval);
                Vec::new()
            })
            .await
        }
        Message::ProcessFilterChanged(query) => {
            with_controller(shared, events, move |c| {
                c.set_process_query(query);
                Vec::new()
            })
            .await
        }
        Message::ShowSystemProcesses(show) => {
            with_controller(shared, events, move |c| {
                c.set_show_system(show);
                Vec::new()
            })
            .await
        }
        Message::DiskSelected(device) => {
            with_controller(shared, events, move |c| {
                if c.select_disk(&device) {
                    vec![ChartSurface::DiskUsage, ChartSurface::DiskIo]
                } else {
                    Vec::new()
                }
            })
            .await
        }
        Message::TerminateRequested { pid, signal } => {
            let result = with_controller(shared, events, move |c| c.terminate(pid, &signal)).await;
            if let Some(Err(e)) = result {
                warn!("{e}");
                let _ = events.try_send(Message::Status(e.to_string()));
            }
            Some(Vec::new())
        }
        Message::RefreshRequested => with_controller(shared, events, |c| c.refresh_all()).await,
        Message::ConfigReloaded => {
            let Some(path) = config_path.cloned() else {
                debug!("Config reload requested without a config file");
                return;
            };
            let reloaded = with_controller(shared, events, move |c| {
                let dirty = match tm_config::load(&path) {
                    Ok(cfg) => {
                        c.apply_config(&cfg);
                        info!("Config reloaded from {}", path.display());
                        vec![ChartSurface::Performance, ChartSurface::DiskUsage, ChartSurface::DiskIo]
                    }
                    Err(e) => {
                        warn!("Keeping previous config: {e}");
                        Vec::new()
                    }
                };
                (dirty, c.interval())
            })
            .await;
            reloaded.map(|(dirty, period)| {
                if period != scheduler.period() {
                    scheduler.set_period(period);
                }
                dirty
            })
        }
        Message::Redraw(_) | Message::Status(_) | Message::Shutdown => {
            debug!("Ignoring outbound message sent as a command: {cmd:?}");
            return;
        }
    };

    if let Some(dirty) = outcome {
        notify(events, dirty);
    }
}

/// Run `f` under the lock on the blocking pool, since sampling can sleep.
///
/// Status text the call posted is forwarded before the result is returned.
async fn with_controller<S, T, F>(
    shared: &SharedController<S>,
    events: &mpsc::Sender<Message>,
    f: F,
) -> Option<T>
where
    S: MetricsSource + Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut Controller<S>) -> T + Send + 'static,
{
    let shared = shared.clone();
    let joined = tokio::task::spawn_blocking(move || {
        let mut controller = lock(&shared);
        let value = f(&mut controller);
        (value, controller.take_status())
    })
    .await;

    match joined {
        Ok((value, status)) => {
            if let Some(status) = status {
                let _ = events.try_send(Message::Status(status));
            }
            Some(value)
        }
        Err(e) => {
            error!("Monitor update failed: {e}");
            None
        }
    }
}

fn notify(events: &mpsc::Sender<Message>, dirty: Vec<ChartSurface>) {
    for surface in dirty {
        let _ = events.try_send(Message::Redraw(surface));
    }
}

async fn next_config_change(rx: &mut Option<mpsc::Receiver<()>>) -> Option<()> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
