use super::{drain, exit, recv_or_cancel, Exit, Halt};
use crate::{CancelToken, Heap, Less};
use crossbeam_channel::{Receiver, Select, Sender};
use log::{debug, trace};

/// Copies items from `input` to `output`, least first under `order`, without
/// any limit on buffering.
///
/// Blocks until the stage stops; see the [module documentation](super) for
/// when that happens. Each item offered to `output` is the least of all items
/// received so far and not yet sent.
///
/// The stage is the only writer of `output` and closes it by dropping it on
/// return.
pub fn priority_reorder<T, O>(
    input: Receiver<T>,
    output: Sender<T>,
    cancel: CancelToken,
    order: O,
) -> Exit
where
    O: Less<T>,
{
    debug!("priority channel started");
    let mut heap = Heap::new(order);
    let exit = exit(reorder(&input, &output, &cancel, &mut heap));
    debug!("priority channel stopped: {exit:?}, {} items dropped", heap.len());
    exit
}

/// What happened to a candidate offered to the output.
enum Offer<T> {
    Accepted,
    /// A new item arrived first; the candidate is handed back.
    Arrived { candidate: T, value: T },
    /// The input was closed first; the candidate is handed back.
    InputClosed(T),
}

fn reorder<T, O: Less<T>>(
    input: &Receiver<T>,
    output: &Sender<T>,
    cancel: &CancelToken,
    heap: &mut Heap<T, O>,
) -> Result<(), Halt> {
    loop {
        let mut candidate = match heap.pop() {
            Some(value) => value,
            None => match recv_or_cancel(input, cancel)? {
                Some(value) => value,
                None => {
                    trace!("input closed with nothing buffered");
                    return Ok(());
                }
            },
        };

        loop {
            match offer(input, output, candidate, cancel)? {
                Offer::Accepted => break,
                Offer::Arrived { candidate: previous, value } => {
                    heap.push(previous);
                    candidate = heap.push_pop(value);
                }
                Offer::InputClosed(previous) => {
                    heap.push(previous);
                    return drain(heap, output, cancel);
                }
            }
        }
    }
}

/// Offers `candidate` to the output while also listening for new input and
/// cancellation, whichever is ready first.
fn offer<T>(
    input: &Receiver<T>,
    output: &Sender<T>,
    candidate: T,
    cancel: &CancelToken,
) -> Result<Offer<T>, Halt> {
    let mut sel = Select::new();
    let send = sel.send(output);
    let recv = sel.recv(input);
    let cancelled = sel.recv(cancel.receiver());

    let oper = sel.select();
    match oper.index() {
        i if i == send => match oper.send(output, candidate) {
            Ok(()) => Ok(Offer::Accepted),
            Err(_) => Err(Halt::Disconnected),
        },
        i if i == recv => match oper.recv(input) {
            Ok(value) => Ok(Offer::Arrived { candidate, value }),
            Err(_) => Ok(Offer::InputClosed(candidate)),
        },
        i => {
            debug_assert_eq!(i, cancelled);
            let _ = oper.recv(cancel.receiver());
            Err(Halt::Cancelled)
        }
    }
}
