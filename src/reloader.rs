use crate::config::RELOAD_DEBOUNCE;
use crate::simulator::{ResetHandle, SimulatorError};
use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("cannot watch {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("file watcher failed: {0}")]
    Watch(#[from] notify::Error),
}

/**
 * Watches a memory image on disk and hands every new version of it to the emulation. The
 * watch is on the containing directory, so editors that save by writing a new file and
 * renaming it over the old one are still noticed. Dropping the reloader stops the watch.
 */
pub struct Reloader {
    _watcher: RecommendedWatcher,
}

impl Reloader {
    pub fn watch(path: &Path, reset_handle: ResetHandle) -> Result<Reloader, ReloadError> {
        let path = absolute_path(path)?;
        let directory = path.parent().unwrap_or(Path::new("/")).to_path_buf();

        let mut stager = ImageStager::new(path.clone(), reset_handle, RELOAD_DEBOUNCE);
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            match result {
                Ok(event) => stager.handle_event(&event),
                Err(error) => log::warn!("File watcher error: {error}"),
            }
        })?;
        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        log::info!("Watching {} for changes", path.display());
        Ok(Reloader { _watcher: watcher })
    }
}

/* the directory part is canonicalized so it matches the paths the watcher reports */
fn absolute_path(path: &Path) -> Result<PathBuf, ReloadError> {
    let to_error = |source| ReloadError::Path {
        path: path.to_path_buf(),
        source,
    };
    let file_name = path.file_name().ok_or_else(|| {
        to_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a file path",
        ))
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok(parent.canonicalize().map_err(to_error)?.join(file_name))
}

/**
 * Reads the image again after a change and stages it. Every save restarts the program, even
 * one that leaves the bytes as they were, but the handful of events a single save produces
 * (create, close, rename) only count once if they land within `debounce` of a staged reload.
 */
struct ImageStager {
    path: PathBuf,
    reset_handle: ResetHandle,
    debounce: Duration,
    last_staged_at: Option<Instant>,
}

impl ImageStager {
    fn new(path: PathBuf, reset_handle: ResetHandle, debounce: Duration) -> ImageStager {
        ImageStager {
            path,
            reset_handle,
            debounce,
            last_staged_at: None,
        }
    }

    fn handle_event(&mut self, event: &Event) {
        if !is_reload_trigger(&event.kind) || !event.paths.iter().any(|p| p == &self.path) {
            return;
        }
        if let Some(staged_at) = self.last_staged_at {
            if staged_at.elapsed() < self.debounce {
                log::debug!("{:?} is part of the last save; not reloading", event.kind);
                return;
            }
        }
        self.reload();
    }

    fn reload(&mut self) {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) => {
                log::warn!("Ignoring change to {}: {error}", self.path.display());
                return;
            }
        };

        match self.reset_handle.request_reset_bytes(bytes) {
            Ok(()) => {
                log::info!("Reloading {}", self.path.display());
                self.last_staged_at = Some(Instant::now());
            }
            Err(SimulatorError::Image(error)) => {
                log::warn!("Ignoring change to {}: {error}", self.path.display());
            }
            Err(SimulatorError::Disconnected) => {
                log::debug!("Emulation has stopped; dropping reload");
            }
            Err(error) => log::warn!("Could not stage reload: {error}"),
        }
    }
}

/* a finished write; inotify reports this as close-after-write, other platforms only as data */
fn is_reload_trigger(kind: &EventKind) -> bool {
    match kind {
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(_)) => true,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            !cfg!(target_os = "linux")
        }
        _ => false,
    }
}
