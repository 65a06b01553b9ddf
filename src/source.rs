//! Byte sources a [`Follower`](crate::Follower) can wrap.
//!
//! Reading is the only required capability. Naming, seeking and closing are
//! optional: a source advertises them by overriding the provided methods, and
//! the follower probes them at call time.

use crate::error::Error;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// A readable source with optional name, seek and close capabilities.
pub trait Source: Read + Send {
    /// The source's name, if it has one.
    fn name(&self) -> Option<String> {
        None
    }

    /// Seeks within the source.
    ///
    /// Named apart from [`Seek::seek`] so both traits can be in scope for
    /// types that implement them. The default reports the
    /// unsupported-capability sentinel.
    fn seek_to(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(Error::not_supported("seek").into())
    }

    /// Whether [`close`](Source::close) releases anything.
    ///
    /// A follower refuses to close a source that returns false here.
    fn is_closable(&self) -> bool {
        false
    }

    /// Releases the source.
    fn close(self: Box<Self>) -> io::Result<()> {
        Ok(())
    }
}

/// A file whose path is unknown: seekable and closable, but nameless and
/// therefore not rotation-aware. Use
/// [`Follower::from_file`](crate::Follower::from_file) to supply the path.
impl Source for File {
    fn seek_to(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(self, pos)
    }

    fn is_closable(&self) -> bool {
        true
    }

    fn close(self: Box<Self>) -> io::Result<()> {
        drop(self);
        Ok(())
    }
}

impl<T> Source for Cursor<T>
where
    T: AsRef<[u8]> + Send,
{
    fn seek_to(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(self, pos)
    }
}

/// Adapter exposing nothing but `Read`.
pub(crate) struct ReadOnly<R>(pub(crate) R);

impl<R: Read> Read for ReadOnly<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Read + Send> Source for ReadOnly<R> {}
