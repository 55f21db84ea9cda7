use super::{buffered_priority_reorder, priority_reorder, Exit};
use crate::{CancelToken, Less};
use crossbeam_channel::{Receiver, Sender};
use std::{io, thread};

const DEFAULT_THREAD_NAME: &str = "priority-channel";

/// Errors that can occur while starting a stage.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system refused to create the stage's thread.
    #[error("failed to spawn priority channel thread")]
    Spawn(#[from] io::Error),
}

/// Configures a stage and runs it on its own thread.
///
/// ```
/// use priority_channel::{Builder, CancelToken, Descending, Exit};
///
/// let (input, receiver) = crossbeam_channel::bounded(0);
/// let (output, stage) = Builder::new()
///     .name("largest-first")
///     .capacity(2)
///     .channel(receiver, CancelToken::never(), Descending::new())?;
///
/// std::thread::spawn(move || {
///     for value in [1, 3, 2, 5, 4] {
///         input.send(value).unwrap();
///     }
/// });
///
/// assert_eq!(output.iter().collect::<Vec<_>>(), [3, 2, 5, 4, 1]);
/// assert_eq!(stage.join().unwrap(), Exit::Drained);
/// # Ok::<(), priority_channel::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    name: String,
    stack_size: Option<usize>,
    capacity: Option<usize>,
}

impl Default for Builder {
    fn default() -> Self {
        Builder { name: DEFAULT_THREAD_NAME.to_owned(), stack_size: None, capacity: None }
    }
}

impl Builder {
    /// Creates a builder for an unbounded stage on a thread named
    /// `priority-channel`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the stage's thread.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the stack size of the stage's thread, in bytes.
    #[must_use]
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    /// Bounds the stage to `capacity` buffered items, making it a
    /// [`buffered_priority_reorder`] stage.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "priority channel capacity must be positive");
        self.capacity = Some(capacity);
        self
    }

    /// Starts a stage copying `input` to `output`.
    ///
    /// The returned handle yields the stage's [`Exit`] once it stops.
    pub fn spawn<T, O>(
        self,
        input: Receiver<T>,
        output: Sender<T>,
        cancel: CancelToken,
        order: O,
    ) -> Result<thread::JoinHandle<Exit>, Error>
    where
        T: Send + 'static,
        O: Less<T> + Send + 'static,
    {
        let mut thread = thread::Builder::new().name(self.name);
        if let Some(size) = self.stack_size {
            thread = thread.stack_size(size);
        }

        let capacity = self.capacity;
        let handle = thread.spawn(move || match capacity {
            Some(capacity) => buffered_priority_reorder(input, output, cancel, capacity, order),
            None => priority_reorder(input, output, cancel, order),
        })?;
        Ok(handle)
    }

    /// Starts a stage reading `input` and returns the receiving end of its
    /// output.
    ///
    /// The output is a zero-capacity channel: the stage decides which item to
    /// hand over at the moment the consumer asks for one.
    pub fn channel<T, O>(
        self,
        input: Receiver<T>,
        cancel: CancelToken,
        order: O,
    ) -> Result<(Receiver<T>, thread::JoinHandle<Exit>), Error>
    where
        T: Send + 'static,
        O: Less<T> + Send + 'static,
    {
        let (output, receiver) = crossbeam_channel::bounded(0);
        let handle = self.spawn(input, output, cancel, order)?;
        Ok((receiver, handle))
    }
}

/// Starts an unbounded stage on its own thread; see [`Builder::channel`].
pub fn priority_channel<T, O>(
    input: Receiver<T>,
    cancel: CancelToken,
    order: O,
) -> Result<(Receiver<T>, thread::JoinHandle<Exit>), Error>
where
    T: Send + 'static,
    O: Less<T> + Send + 'static,
{
    Builder::new().channel(input, cancel, order)
}

/// Starts a stage bounded to `capacity` items on its own thread; see
/// [`Builder::channel`].
///
/// # Panics
///
/// Panics if `capacity` is 0.
pub fn buffered_priority_channel<T, O>(
    input: Receiver<T>,
    cancel: CancelToken,
    capacity: usize,
    order: O,
) -> Result<(Receiver<T>, thread::JoinHandle<Exit>), Error>
where
    T: Send + 'static,
    O: Less<T> + Send + 'static,
{
    Builder::new().capacity(capacity).channel(input, cancel, order)
}
