//! The follower: a reader that waits at end-of-file instead of ending.

use crate::error::{Error, Result};
use crate::options::FollowOptions;
use crate::rotation::{self, Detection};
use crate::rotations::{self, Notifier, Rotations};
use crate::source::Source;
use crate::watcher::FileWatcher;
use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

enum Current {
    /// A file whose path is known; rotation-aware.
    ///
    /// `observed_len` is the largest length the file is known to have had:
    /// its size at the last check, or the furthest offset actually read.
    File { file: File, observed_len: u64 },
    Source(Box<dyn Source>),
}

/// A reader over a file that never reports end-of-file.
///
/// At end-of-file a read sleeps for the poll interval and retries, so it only
/// returns once bytes are available or a real I/O error occurs. When the
/// follower was opened from a path, each retry also checks whether the path
/// now names a different file (log rotation); the follower finishes the old
/// file, switches to the new one, and signals the switch on [`Rotations`].
///
/// ```rust,no_run
/// use log_follower::Follower;
/// use std::io::{BufRead, BufReader};
///
/// let follower = Follower::open("/var/log/messages")?;
/// for line in BufReader::new(follower).lines() {
///     let line = line?;
///     if line.contains("ntpd") {
///         println!("{line}");
///     }
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
///
/// Consumers that read "to the end" (`read_to_end`, `read_to_string`, `copy`)
/// never return while the follower is open.
///
/// # Threads
///
/// `Read` and `Seek` are also implemented for `&Follower`, so an
/// `Arc<Follower>` can be read on one thread and closed on another. Only one
/// thread should read at a time. A read that is already waiting when
/// [`close`](Follower::close) runs is not interrupted; its next attempt fails
/// with [`Error::Closed`].
///
/// # Platform support
///
/// Rotation detection compares file identities (device and inode on unix,
/// volume serial number and file index on windows). On other platforms it is
/// disabled: reads still wait at end-of-file, but a rotated file is never
/// picked up.
pub struct Follower {
    current: Mutex<Option<Current>>,
    path: Option<PathBuf>,
    notifier: Mutex<Option<Notifier>>,
    rotations: Mutex<Option<Rotations>>,
    watcher: Option<FileWatcher>,
    poll_interval: Duration,
    reset_on_truncate: bool,
}

impl Follower {
    /// Opens `path` with default [`FollowOptions`].
    ///
    /// The open error, if any, is returned unchanged.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        FollowOptions::default().open(path)
    }

    /// Follows a file opened elsewhere, e.g. with custom `OpenOptions`.
    ///
    /// `path` is where rotated replacements are looked for.
    pub fn from_file<P: Into<PathBuf>>(file: File, path: P) -> Self {
        FollowOptions::default().follow_file(file, path)
    }

    /// Follows an arbitrary source. Reads block at end-of-stream, but there is
    /// no rotation detection.
    ///
    /// A wrapped [`File`] has no name and is never re-opened. To follow a file
    /// across rotations, use [`Follower::from_file`] with its path.
    pub fn wrap<S: Source + 'static>(source: S) -> Self {
        FollowOptions::default().wrap(source)
    }

    /// Follows a plain reader. Reads block at end-of-stream; `seek` and
    /// `close` report [`Error::NotSupported`] and `name` is empty.
    pub fn wrap_reader<R: Read + Send + 'static>(reader: R) -> Self {
        FollowOptions::default().wrap_reader(reader)
    }

    pub(crate) fn with_file(file: File, path: PathBuf, options: &FollowOptions) -> Self {
        let watcher = if options.watch {
            install_watcher(&path)
        } else {
            None
        };
        let observed_len = file.metadata().map(|m| m.len()).unwrap_or(0);
        Self::new(
            Current::File { file, observed_len },
            Some(path),
            watcher,
            options,
        )
    }

    pub(crate) fn with_source(source: Box<dyn Source>, options: &FollowOptions) -> Self {
        Self::new(Current::Source(source), None, None, options)
    }

    fn new(
        current: Current,
        path: Option<PathBuf>,
        watcher: Option<FileWatcher>,
        options: &FollowOptions,
    ) -> Self {
        let (notifier, rotations) = rotations::channel();
        Self {
            current: Mutex::new(Some(current)),
            path,
            notifier: Mutex::new(Some(notifier)),
            rotations: Mutex::new(Some(rotations)),
            watcher,
            poll_interval: options.poll_interval,
            reset_on_truncate: options.reset_on_truncate,
        }
    }

    /// Takes the receiving end of the rotation notifications.
    ///
    /// Returns `None` after the first call. Notifications are coalesced: at
    /// most one is pending, so a consumer that falls behind sees fewer
    /// notifications than rotations. The channel closes when the follower is
    /// closed or dropped.
    pub fn rotations(&self) -> Option<Rotations> {
        self.rotations.lock().take()
    }

    /// The followed path, or the wrapped source's name, or an empty string.
    pub fn name(&self) -> String {
        if let Some(path) = &self.path {
            return path.to_string_lossy().into_owned();
        }
        match self.current.lock().as_ref() {
            Some(Current::Source(source)) => source.name().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Whether the follower switches files on rotation.
    pub fn is_rotation_aware(&self) -> bool {
        self.path.is_some()
    }

    /// Closes the rotation channel and releases the source.
    ///
    /// The channel is closed on the first call no matter what. The source is
    /// released only if it can be closed; otherwise [`Error::NotSupported`] is
    /// returned and the source stays readable. Calling again after a
    /// successful close is a no-op.
    pub fn close(&self) -> Result<()> {
        if self.notifier.lock().take().is_some() {
            tracing::debug!(name = %self.name(), "rotation notifications closed");
        }

        let mut current = self.current.lock();
        match current.take() {
            None => Ok(()),
            Some(Current::File { file, .. }) => {
                drop(file);
                Ok(())
            }
            Some(Current::Source(source)) if source.is_closable() => {
                source.close().map_err(Error::Io)
            }
            Some(source) => {
                *current = Some(source);
                Err(Error::not_supported("close"))
            }
        }
    }

    fn read_current(&self, buf: &mut [u8]) -> io::Result<usize> {
        match self.current.lock().as_mut() {
            Some(Current::File { file, observed_len }) => {
                let n = file.read(buf)?;
                if n > 0 {
                    if let Ok(position) = file.stream_position() {
                        *observed_len = (*observed_len).max(position);
                    }
                }
                Ok(n)
            }
            Some(Current::Source(source)) => source.read(buf),
            None => Err(Error::Closed.into()),
        }
    }

    fn wait(&self) {
        match &self.watcher {
            Some(watcher) => {
                if watcher.wait(self.poll_interval) {
                    tracing::trace!("woken by file event");
                }
            }
            None => thread::sleep(self.poll_interval),
        }
    }

    /// Switches to a rotated replacement once the current file is drained.
    fn refresh(&self) {
        let Some(path) = &self.path else {
            return;
        };

        let mut current = self.current.lock();
        let Some(Current::File { file, observed_len }) = current.as_mut() else {
            return;
        };

        match rotation::detect(file, path) {
            Detection::Rotated(replacement) => {
                // Bytes written to the old file just before the rotation
                // still belong in front of the new file's.
                if rotation::has_unread_bytes(file) {
                    tracing::debug!(path = %path.display(), "rotation pending, draining old file");
                    return;
                }
                *observed_len = replacement.metadata().map(|m| m.len()).unwrap_or(0);
                *file = replacement;
                drop(current);

                tracing::debug!(path = %path.display(), "file rotated, following replacement");
                self.notify_rotation();
            }
            Detection::Unchanged if self.reset_on_truncate => {
                match rotation::rewind_if_truncated(file, observed_len) {
                    Ok(true) => {
                        tracing::debug!(path = %path.display(), "file truncated, reading from start");
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::debug!(path = %path.display(), error = %e, "truncation check failed");
                    }
                }
            }
            Detection::Unchanged => {}
        }
    }

    fn notify_rotation(&self) {
        if let Some(notifier) = self.notifier.lock().as_ref() {
            notifier.notify();
        }
    }
}

impl fmt::Debug for Follower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Follower")
            .field("path", &self.path)
            .field("poll_interval", &self.poll_interval)
            .field("watching", &self.watcher.is_some())
            .field("reset_on_truncate", &self.reset_on_truncate)
            .finish_non_exhaustive()
    }
}

fn install_watcher(path: &Path) -> Option<FileWatcher> {
    let watcher = FileWatcher::new(path).and_then(|mut watcher| {
        watcher.start_watching()?;
        Ok(watcher)
    });
    match watcher {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "file watcher unavailable, polling only");
            None
        }
    }
}

impl Read for &Follower {
    /// Reads at least one byte, waiting at end-of-file as long as it takes.
    ///
    /// Errors other than end-of-file are returned unchanged. An empty `buf`
    /// returns `Ok(0)` immediately.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.read_current(buf)?;
            if n > 0 {
                return Ok(n);
            }
            self.wait();
            self.refresh();
        }
    }
}

impl Read for Follower {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (&*self).read(buf)
    }
}

impl Seek for &Follower {
    /// Seeks the current source, or fails with [`Error::NotSupported`].
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self.current.lock().as_mut() {
            Some(Current::File { file, .. }) => file.seek(pos),
            Some(Current::Source(source)) => source.seek_to(pos),
            None => Err(Error::Closed.into()),
        }
    }
}

impl Seek for Follower {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        (&*self).seek(pos)
    }
}
