//! A log follower library: reads that wait for more data instead of ending.
//!
//! A [`Follower`] wraps a file (or any byte source) and implements
//! [`std::io::Read`] without ever reporting end-of-file. At the end of the
//! data a read waits and retries until new bytes are appended. When the
//! follower was opened from a path it also notices log rotation, where the
//! file at that path is renamed away and recreated, finishes the old file and
//! continues with the new one. Each switch is signalled on [`Rotations`].
//!
//! # Example
//!
//! ```rust,no_run
//! use log_follower::Follower;
//! use std::io::{BufRead, BufReader};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let follower = Follower::open("app.log")?;
//!
//!     for line in BufReader::new(follower).lines() {
//!         println!("New content: {}", line?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Rotation notifications can be consumed from async code:
//!
//! ```rust,no_run
//! use log_follower::Follower;
//! use tokio_stream::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let follower = Follower::open("app.log")?;
//!     let mut rotations = follower.rotations().expect("taken once");
//!
//!     tokio::task::spawn_blocking(move || std::io::copy(&mut &follower, &mut std::io::sink()));
//!
//!     while rotations.next().await.is_some() {
//!         println!("app.log was rotated");
//!     }
//!
//!     Ok(())
//! }
//! ```

// Internal modules - not part of public API
mod error;
mod follower;
mod identity;
mod options;
mod rotation;
mod rotations;
mod source;
mod watcher;

#[cfg(test)]
mod test_helpers;

// Public API exports
pub use error::{Error, Result, is_not_supported};
pub use follower::Follower;
pub use identity::FileId;
pub use options::{FollowOptions, MIN_POLL_INTERVAL, POLL_INTERVAL};
pub use rotations::{Rotations, TryRecv};
pub use source::Source;

use std::io;
use std::path::Path;

/// Opens `path` and follows it across rotations with default options.
///
/// Shorthand for [`Follower::open`].
pub fn follow<P: AsRef<Path>>(path: P) -> io::Result<Follower> {
    Follower::open(path)
}
