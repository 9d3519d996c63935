use notify::event::{Event, EventKind};
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Editors write a file in several steps; changes this close together count once.
const SETTLE: Duration = Duration::from_millis(250);

/// Signals every settled change to `taskman.toml`.
///
/// The parent directory is watched rather than the file, so saving through a
/// rename or recreating the file is still seen.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_watcher, mut changes) = tm_config::ConfigWatcher::spawn("/home/user/.config/taskman/taskman.toml");
/// while changes.recv().await.is_some() {
///     let _cfg = tm_config::load("/home/user/.config/taskman/taskman.toml");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Start watching on the current Tokio runtime.
    ///
    /// The receiver closes if the watch cannot be set up.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let path = absolute_config_path(path.as_ref());
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(watch_config(path.clone(), tx));
        (Self { path }, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `path` made absolute against the working directory, so it compares equal to
/// the paths notify reports and always has a parent to watch.
fn absolute_config_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Existing directory holding `path`.
fn watch_dir(path: &Path) -> Option<PathBuf> {
    path.parent().filter(|d| d.is_dir()).map(Path::to_path_buf)
}

/// `true` for a write or create that touches `path`.
fn touches(event: &Event, path: &Path) -> bool {
    matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        && event.paths.iter().any(|p| p == path)
}

async fn watch_config(path: PathBuf, tx: mpsc::Sender<()>) {
    let (raw_tx, mut raw_rx) = mpsc::unbounded_channel::<notify::Result<Event>>();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = raw_tx.send(res);
        },
        Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Cannot create config watcher: {e}");
            return;
        }
    };

    let dir = match watch_dir(&path) {
        Some(dir) => dir,
        None => {
            warn!("Config directory for '{}' does not exist; live reload disabled", path.display());
            return;
        }
    };
    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        warn!("Cannot watch '{}': {e}", dir.display());
        return;
    }
    info!("Watching {} for changes", path.display());

    while let Some(res) = raw_rx.recv().await {
        match res {
            Ok(event) if touches(&event, &path) => {
                // Swallow the rest of the burst before reporting.
                while let Ok(Some(_)) = tokio::time::timeout(SETTLE, raw_rx.recv()).await {}
                if tx.send(()).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Config watcher error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn only_writes_to_the_config_file_count() {
        let cfg = Path::new("/cfg/taskman/taskman.toml");
        assert!(touches(&event(EventKind::Modify(ModifyKind::Any), "/cfg/taskman/taskman.toml"), cfg));
        assert!(touches(&event(EventKind::Create(CreateKind::File), "/cfg/taskman/taskman.toml"), cfg));
        assert!(!touches(&event(EventKind::Modify(ModifyKind::Any), "/cfg/taskman/other.toml"), cfg));
        assert!(!touches(&event(EventKind::Remove(RemoveKind::File), "/cfg/taskman/taskman.toml"), cfg));
    }

    #[test]
    fn relative_paths_resolve_against_the_working_directory() {
        let cwd = std::env::current_dir().unwrap();
        let path = absolute_config_path(Path::new("taskman.toml"));
        assert_eq!(path, cwd.join("taskman.toml"));
        assert_eq!(watch_dir(&path), Some(cwd.clone()));

        let reported = cwd.join("taskman.toml");
        assert!(touches(&Event::new(EventKind::Modify(ModifyKind::Any)).add_path(reported), &path));
    }

    #[test]
    fn missing_directory_disables_the_watch() {
        assert_eq!(watch_dir(Path::new("/nonexistent/taskman/taskman.toml")), None);
        assert_eq!(watch_dir(Path::new("/")), None);
    }
}
