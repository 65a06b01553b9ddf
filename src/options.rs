//! Follower configuration.

use crate::follower::Follower;
use crate::source::{ReadOnly, Source};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a read waits at end-of-file before trying again.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Lower bound for the poll interval; the wait loop never spins.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Options for building a [`Follower`].
///
/// ```rust,no_run
/// use log_follower::FollowOptions;
/// use std::time::Duration;
///
/// let follower = FollowOptions::new()
///     .poll_interval(Duration::from_millis(250))
///     .watch(true)
///     .open("/var/log/messages")?;
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowOptions {
    pub(crate) poll_interval: Duration,
    pub(crate) watch: bool,
    pub(crate) reset_on_truncate: bool,
}

impl Default for FollowOptions {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            watch: false,
            reset_on_truncate: true,
        }
    }
}

impl FollowOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the end-of-file wait. Values below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Wakes waiting reads early on filesystem events for the followed file.
    ///
    /// Only affects path-backed followers. The poll interval still bounds
    /// every wait, so events are an optimization and never required.
    pub fn watch(mut self, enabled: bool) -> Self {
        self.watch = enabled;
        self
    }

    /// Restarts from the beginning when the file shrinks below the read position.
    pub fn reset_on_truncate(mut self, enabled: bool) -> Self {
        self.reset_on_truncate = enabled;
        self
    }

    /// Opens `path` for reading and follows it across rotations.
    ///
    /// The open error, if any, is returned unchanged.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> io::Result<Follower> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(self.follow_file(file, path))
    }

    /// Follows an already opened file known to live at `path`.
    ///
    /// For files opened with non-default flags or permissions.
    pub fn follow_file<P: Into<PathBuf>>(&self, file: File, path: P) -> Follower {
        Follower::with_file(file, path.into(), self)
    }

    /// Follows any [`Source`]. No rotation detection; for a file, use
    /// [`follow_file`](FollowOptions::follow_file) instead.
    pub fn wrap<S: Source + 'static>(&self, source: S) -> Follower {
        Follower::with_source(Box::new(source), self)
    }

    /// Follows a plain reader that can neither seek, be named, nor be closed.
    pub fn wrap_reader<R: Read + Send + 'static>(&self, reader: R) -> Follower {
        self.wrap(ReadOnly(reader))
    }
}
