//! Channel stages that copy items from an input channel to an output channel,
//! least first.
//!
//! A stage owns a [`Heap`] and sits between a producer and a consumer. Whenever
//! the consumer is ready it receives the least item the stage knows about;
//! items that have not arrived yet cannot be accounted for, so the output is
//! ordered greedily rather than globally sorted.
//!
//! * [`priority_reorder`] buffers without limit. If everything is written
//!   before anything is read, the output is fully sorted.
//! * [`buffered_priority_reorder`] keeps at most `capacity` items, bounding
//!   memory and latency at the cost of weaker ordering.
//!
//! Both block the calling thread until the stage stops and report why through
//! [`Exit`]. [`Builder`], [`priority_channel`] and [`buffered_priority_channel`]
//! run them on a dedicated thread instead.
//!
//! A stage stops when
//!
//! * the input is closed (every [`Sender`] dropped): buffered items are sent
//!   in order first, then the stage returns [`Exit::Drained`];
//! * its [`CancelToken`] fires: buffered items are dropped and the stage returns
//!   [`Exit::Cancelled`] without reading any further input;
//! * the output has no receivers left: [`Exit::Disconnected`].
//!
//! In every case the stage drops its output [`Sender`] on the way out, which
//! closes the output once the consumer has taken what was already sent.
//!
//! ```
//! use priority_channel::{priority_channel, Ascending, CancelToken, Exit};
//!
//! let (input, receiver) = crossbeam_channel::bounded(0);
//! let (output, stage) = priority_channel(receiver, CancelToken::never(), Ascending::new())?;
//!
//! for value in [8, 6, 4, 2, 0] {
//!     input.send(value).unwrap();
//! }
//! drop(input);
//!
//! assert_eq!(output.iter().collect::<Vec<_>>(), [0, 2, 4, 6, 8]);
//! assert_eq!(stage.join().unwrap(), Exit::Drained);
//! # Ok::<(), priority_channel::Error>(())
//! ```
//!
//! [`Sender`]: crossbeam_channel::Sender

use crate::{CancelToken, Heap, Less};
use crossbeam_channel::{select, Receiver, Sender};
use log::trace;

mod buffered;
mod builder;
mod unbounded;

#[cfg(test)]
mod tests;

pub use buffered::buffered_priority_reorder;
pub use builder::{buffered_priority_channel, priority_channel, Builder, Error};
pub use unbounded::priority_reorder;

/// Why a stage stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exit {
    /// The input was closed and every buffered item was sent.
    Drained,
    /// The stage's [`CancelToken`] fired; buffered items were dropped.
    Cancelled,
    /// Every receiver of the output was dropped; buffered items were dropped.
    Disconnected,
}

/// A condition that stops a stage before it has drained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Halt {
    Cancelled,
    Disconnected,
}

impl From<Halt> for Exit {
    fn from(halt: Halt) -> Exit {
        match halt {
            Halt::Cancelled => Exit::Cancelled,
            Halt::Disconnected => Exit::Disconnected,
        }
    }
}

fn exit(result: Result<(), Halt>) -> Exit {
    result.map_or_else(Exit::from, |()| Exit::Drained)
}

/// Waits for the next input item, or `None` once the input is closed.
fn recv_or_cancel<T>(input: &Receiver<T>, cancel: &CancelToken) -> Result<Option<T>, Halt> {
    select! {
        recv(input) -> msg => Ok(msg.ok()),
        recv(cancel.receiver()) -> _ => Err(Halt::Cancelled),
    }
}

/// Waits for the consumer to take `value`.
fn send_or_cancel<T>(output: &Sender<T>, value: T, cancel: &CancelToken) -> Result<(), Halt> {
    select! {
        send(output, value) -> res => res.map_err(|_| Halt::Disconnected),
        recv(cancel.receiver()) -> _ => Err(Halt::Cancelled),
    }
}

/// Sends everything left in `heap`, least first.
fn drain<T, O: Less<T>>(
    heap: &mut Heap<T, O>,
    output: &Sender<T>,
    cancel: &CancelToken,
) -> Result<(), Halt> {
    trace!("input closed, draining {} items", heap.len());
    while let Some(value) = heap.pop() {
        send_or_cancel(output, value, cancel)?;
    }
    Ok(())
}
