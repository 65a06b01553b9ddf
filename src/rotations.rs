//! Rotation notifications.
//!
//! The channel has a single slot. A rotation detected while a notification
//! is still pending is dropped, so a slow consumer sees fewer events than
//! rotations happened, but never an event for a rotation that did not happen.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Outcome of a non-blocking check for a rotation notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryRecv {
    /// A rotation happened since the last notification was taken.
    Rotated,
    /// Nothing pending.
    Empty,
    /// The follower was closed; no further notifications will arrive.
    Closed,
}

/// Receiving end of a follower's rotation notifications.
///
/// Also usable as a [`Stream`] of `()`; the stream ends once the follower is
/// closed.
#[derive(Debug)]
pub struct Rotations {
    receiver: mpsc::Receiver<()>,
}

impl Rotations {
    /// Waits for the next rotation. Returns `None` once the follower is closed.
    pub async fn recv(&mut self) -> Option<()> {
        self.receiver.recv().await
    }

    /// Blocking variant of [`recv`](Rotations::recv).
    ///
    /// # Panics
    ///
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_recv(&mut self) -> Option<()> {
        self.receiver.blocking_recv()
    }

    pub fn try_recv(&mut self) -> TryRecv {
        match self.receiver.try_recv() {
            Ok(()) => TryRecv::Rotated,
            Err(mpsc::error::TryRecvError::Empty) => TryRecv::Empty,
            Err(mpsc::error::TryRecvError::Disconnected) => TryRecv::Closed,
        }
    }

    /// Check if the follower side has been closed
    pub fn is_closed(&self) -> bool {
        self.receiver.is_closed()
    }
}

impl Stream for Rotations {
    type Item = ();

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Sending end, owned by the follower.
#[derive(Debug)]
pub(crate) struct Notifier {
    sender: mpsc::Sender<()>,
}

impl Notifier {
    /// Signals a rotation without blocking; drops the signal if one is pending.
    pub(crate) fn notify(&self) {
        match self.sender.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {
                tracing::trace!("rotation notification coalesced with a pending one");
            }
            // Nobody is listening; nothing to do.
            Err(TrySendError::Closed(())) => {}
        }
    }
}

/// Creates a single-slot notification channel.
pub(crate) fn channel() -> (Notifier, Rotations) {
    let (sender, receiver) = mpsc::channel(1);
    (Notifier { sender }, Rotations { receiver })
}
