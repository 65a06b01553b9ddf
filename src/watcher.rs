//! Optional early wakeup for the end-of-file wait, using the notify crate.
//!
//! Events only shorten the wait. The follower still polls at its configured
//! interval, so a missed or dropped event costs latency, never data.

use crate::error::Result;
use crossbeam_channel::{Receiver, Sender, bounded};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Watches the directory of a followed file and signals events for that file.
pub(crate) struct FileWatcher {
    // Never touched after setup; the mutex only makes the follower `Sync`.
    watcher: Mutex<RecommendedWatcher>,
    wakeups: Receiver<()>,
    file_path: PathBuf,
}

impl FileWatcher {
    /// Creates a new file watcher for the specified path.
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        // One pending wakeup is enough; extra events coalesce.
        let (tx, rx) = bounded(1);

        let watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                // Access events include our own re-opens during rotation checks.
                Ok(event)
                    if !event.kind.is_access() && is_event_relevant_to_file(&event, &file_name) =>
                {
                    wake(&tx)
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "file watcher error");
                    wake(&tx);
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            watcher: Mutex::new(watcher),
            wakeups: rx,
            file_path,
        })
    }

    /// Starts watching the file's directory.
    ///
    /// The directory is watched rather than the file so that a replacement
    /// created at the same path is still seen.
    pub(crate) fn start_watching(&mut self) -> Result<()> {
        let watch_path = match self.file_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        self.watcher
            .get_mut()
            .watch(watch_path, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    /// Blocks until an event for the file arrives or `timeout` elapses.
    ///
    /// Returns true when woken by an event.
    pub(crate) fn wait(&self, timeout: Duration) -> bool {
        self.wakeups.recv_timeout(timeout).is_ok()
    }

    #[cfg(test)]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn wake(tx: &Sender<()>) {
    let _ = tx.try_send(());
}

/// Check if a notify event is relevant to a specific file
pub(crate) fn is_event_relevant_to_file(event: &Event, target_file_name: &str) -> bool {
    event.paths.iter().any(|path| {
        path.file_name()
            .map(|name| name.to_string_lossy() == target_file_name)
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::TempLogFile;
    use notify::EventKind;
    use notify::event::{CreateKind, DataChange, ModifyKind};
    use std::time::Instant;

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        Event {
            kind,
            paths: paths.iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    fn modify(paths: &[&str]) -> Event {
        event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), paths)
    }

    #[test]
    fn test_file_watcher_creation() {
        let file_path = PathBuf::from("/tmp/test.log");
        let watcher = FileWatcher::new(&file_path).unwrap();

        assert_eq!(watcher.file_path(), file_path.as_path());
    }

    #[test]
    fn test_is_event_relevant_to_file_exact_match() {
        let event = modify(&["/tmp/test.log"]);

        assert!(is_event_relevant_to_file(&event, "test.log"));
        assert!(!is_event_relevant_to_file(&event, "other.log"));
    }

    #[test]
    fn test_is_event_relevant_to_file_multiple_paths() {
        // Renames report both the old and the new name.
        let event = event(
            EventKind::Create(CreateKind::File),
            &["/tmp/test.log.1", "/tmp/test.log"],
        );

        assert!(is_event_relevant_to_file(&event, "test.log"));
        assert!(is_event_relevant_to_file(&event, "test.log.1"));
        assert!(!is_event_relevant_to_file(&event, "missing.log"));
    }

    #[test]
    fn test_is_event_relevant_to_file_no_file_name() {
        let event = modify(&["/"]);
        assert!(!is_event_relevant_to_file(&event, "test.log"));
    }

    #[test]
    fn test_is_event_relevant_to_file_empty_paths() {
        let event = modify(&[]);
        assert!(!is_event_relevant_to_file(&event, "test.log"));
    }

    #[test]
    fn test_is_event_relevant_to_file_case_sensitivity() {
        let event = modify(&["/tmp/Test.Log"]);

        assert!(!is_event_relevant_to_file(&event, "test.log"));
        assert!(is_event_relevant_to_file(&event, "Test.Log"));
    }

    #[test]
    fn test_wait_times_out_without_events() {
        let log = TempLogFile::new().unwrap();
        let mut watcher = FileWatcher::new(log.path()).unwrap();
        watcher.start_watching().unwrap();

        let started = Instant::now();
        let woken = watcher.wait(Duration::from_millis(20));

        assert!(!woken);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_wait_wakes_on_append() {
        let log = TempLogFile::new().unwrap();
        let mut watcher = FileWatcher::new(log.path()).unwrap();
        watcher.start_watching().unwrap();

        log.append_content("new line").unwrap();

        assert!(watcher.wait(Duration::from_secs(5)));
    }

    #[test]
    fn test_start_watching_missing_directory_fails() {
        let mut watcher = FileWatcher::new("/definitely/not/a/real/dir/test.log").unwrap();
        assert!(watcher.start_watching().is_err());
    }
}
