use super::{drain, exit, recv_or_cancel, send_or_cancel, Exit, Halt};
use crate::{CancelToken, Heap, Less};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};

/// Copies items from `input` to `output`, least first under `order`, holding
/// at most `capacity` items.
///
/// The stage first reads `capacity` items. From then on it sends its least
/// item and reads exactly one more before sending again, so an item can be
/// overtaken only by items that arrive while it is buffered. With a capacity
/// of 4, the input `9, 8, ..., 0` comes out as `6, 5, 4, 3, 2, 1, 0, 7, 8, 9`.
///
/// Blocks until the stage stops; see the [module documentation](super) for
/// when that happens. The stage is the only writer of `output` and closes it
/// by dropping it on return.
///
/// # Panics
///
/// Panics if `capacity` is 0.
pub fn buffered_priority_reorder<T, O>(
    input: Receiver<T>,
    output: Sender<T>,
    cancel: CancelToken,
    capacity: usize,
    order: O,
) -> Exit
where
    O: Less<T>,
{
    assert!(capacity > 0, "priority channel capacity must be positive");

    debug!("buffered priority channel started, capacity {capacity}");
    let mut heap = Heap::with_capacity(order, capacity);
    let exit = exit(reorder(&input, &output, &cancel, capacity, &mut heap));
    debug!("buffered priority channel stopped: {exit:?}, {} items dropped", heap.len());
    exit
}

fn reorder<T, O: Less<T>>(
    input: &Receiver<T>,
    output: &Sender<T>,
    cancel: &CancelToken,
    capacity: usize,
    heap: &mut Heap<T, O>,
) -> Result<(), Halt> {
    while heap.len() < capacity {
        match recv_or_cancel(input, cancel)? {
            Some(value) => heap.push(value),
            None => return drain(heap, output, cancel),
        }
    }
    trace!("buffer filled");

    let Some(mut next) = heap.pop() else {
        return Ok(());
    };
    loop {
        send_or_cancel(output, next, cancel)?;
        next = match recv_or_cancel(input, cancel)? {
            Some(value) => heap.push_pop(value),
            None => return drain(heap, output, cancel),
        };
    }
}
