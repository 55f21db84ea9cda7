//! Cooperative cancellation for channel stages.
//!
//! A [`CancelToken`] is observed by the stages; the paired [`Canceller`] fires
//! it. Firing disconnects a channel that every clone of the token selects on,
//! so one token can stop any number of stages at once, and a stage blocked on
//! its input or output wakes up as soon as it happens.
//!
//! ```
//! use priority_channel::CancelToken;
//!
//! let (canceller, token) = CancelToken::new();
//! assert!(!token.is_cancelled());
//!
//! canceller.cancel();
//! assert!(token.is_cancelled());
//! ```

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError};

/// The firing side of a [`CancelToken`].
///
/// Cancelling is idempotent. Dropping the last clone of a `Canceller` also
/// cancels its token, so keep one alive for as long as the stages it controls
/// should run.
#[derive(Clone, Debug)]
pub struct Canceller {
    sender: Arc<Mutex<Option<Sender<()>>>>,
}

impl Canceller {
    /// Fires the paired token.
    pub fn cancel(&self) {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

/// A cancellation signal that channel stages race against every blocking
/// operation.
#[derive(Clone, Debug)]
pub struct CancelToken {
    receiver: Receiver<()>,
}

impl CancelToken {
    /// Creates a token and the [`Canceller`] that fires it.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Canceller, CancelToken) {
        // Nothing is ever sent; dropping the sender is the signal.
        let (sender, receiver) = crossbeam_channel::bounded(0);
        let canceller = Canceller { sender: Arc::new(Mutex::new(Some(sender))) };
        (canceller, CancelToken { receiver })
    }

    /// Creates a token that is never cancelled.
    pub fn never() -> CancelToken {
        CancelToken { receiver: crossbeam_channel::never() }
    }

    /// Returns `true` once the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Blocks until the token is cancelled.
    ///
    /// Returns immediately for a token that is already cancelled and never
    /// returns for [`CancelToken::never`].
    pub fn wait(&self) {
        // Only disconnection can end a receive.
        let _ = self.receiver.recv();
    }

    /// The channel to select on; it becomes ready (disconnected) on
    /// cancellation.
    pub(crate) fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        CancelToken::never()
    }
}
