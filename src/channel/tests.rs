use super::*;
use crate::test_helpers::test_rng;
use crate::{Ascending, Canceller, Descending};
use crossbeam_channel::{bounded, select, Receiver, Sender};
use rand::Rng;
use std::thread::{self, JoinHandle};

fn ascending(a: &i32, b: &i32) -> bool {
    a < b
}

fn unbounded_stage(cancel: CancelToken) -> (Sender<i32>, Receiver<i32>, JoinHandle<Exit>) {
    let (input, receiver) = bounded(0);
    let (output, stage) = priority_channel(receiver, cancel, ascending).unwrap();
    (input, output, stage)
}

fn buffered_stage(
    cancel: CancelToken,
    capacity: usize,
) -> (Sender<i32>, Receiver<i32>, JoinHandle<Exit>) {
    let (input, receiver) = bounded(0);
    let (output, stage) = buffered_priority_channel(receiver, cancel, capacity, ascending).unwrap();
    (input, output, stage)
}

/// Sends `values` from another thread, giving up once `cancel` fires, then
/// closes the input.
fn produce(input: Sender<i32>, cancel: CancelToken, values: Vec<i32>) -> JoinHandle<()> {
    thread::spawn(move || {
        for value in values {
            select! {
                send(input, value) -> res => if res.is_err() { return },
                recv(cancel.receiver()) -> _ => return,
            }
        }
    })
}

#[test]
fn test_one_value() {
    let (input, output, stage) = unbounded_stage(CancelToken::never());

    input.send(1).unwrap();
    assert_eq!(output.recv(), Ok(1));

    drop(input);
    assert!(output.recv().is_err());
    assert_eq!(stage.join().unwrap(), Exit::Drained);
}

#[test]
fn test_reorder_values() {
    let (input, output, stage) = unbounded_stage(CancelToken::never());

    for i in (0..10).rev() {
        input.send(i).unwrap();
    }
    for i in 0..10 {
        assert_eq!(output.recv(), Ok(i));
    }

    drop(input);
    assert!(output.recv().is_err());
    assert_eq!(stage.join().unwrap(), Exit::Drained);
}

#[test]
fn test_mixed_value_order() {
    let (input, output, stage) = unbounded_stage(CancelToken::never());

    for i in [8, 6, 4, 2, 0] {
        input.send(i).unwrap();
    }
    assert_eq!(output.recv(), Ok(0));
    input.send(7).unwrap();
    assert_eq!(output.recv(), Ok(2));
    input.send(5).unwrap();
    assert_eq!(output.recv(), Ok(4));
    input.send(3).unwrap();
    assert_eq!(output.recv(), Ok(3));
    input.send(1).unwrap();
    for i in [1, 5, 6, 7, 8] {
        assert_eq!(output.recv(), Ok(i));
    }

    drop(input);
    assert!(output.recv().is_err());
    assert_eq!(stage.join().unwrap(), Exit::Drained);
}

#[test]
fn test_close_input_before_reading() {
    let (input, output, stage) = unbounded_stage(CancelToken::never());

    for i in (0..10).rev() {
        input.send(i).unwrap();
    }
    drop(input);

    assert_eq!(output.iter().collect::<Vec<_>>(), (0..10).collect::<Vec<_>>());
    assert_eq!(stage.join().unwrap(), Exit::Drained);
}

#[test]
fn test_close_input_during_read() {
    let (input, output, stage) = unbounded_stage(CancelToken::never());

    for i in (5..10).rev() {
        input.send(i).unwrap();
    }
    assert_eq!(output.recv(), Ok(5));
    assert_eq!(output.recv(), Ok(6));
    for i in (0..5).rev() {
        input.send(i).unwrap();
    }
    drop(input);

    assert_eq!(output.iter().collect::<Vec<_>>(), [0, 1, 2, 3, 4, 7, 8, 9]);
    assert_eq!(stage.join().unwrap(), Exit::Drained);
}

#[test]
fn test_sorted_when_closed_before_reading() {
    let mut rng = test_rng();

    for _ in 0..16 {
        let values: Vec<i32> = (0..rng.gen_range(0..200)).map(|_| rng.gen_range(-50..50)).collect();
        let (input, output, stage) = unbounded_stage(CancelToken::never());

        for &value in &values {
            input.send(value).unwrap();
        }
        drop(input);

        let mut expected = values;
        expected.sort();
        assert_eq!(output.iter().collect::<Vec<_>>(), expected);
        assert_eq!(stage.join().unwrap(), Exit::Drained);
    }
}

#[test]
fn test_no_loss_with_concurrent_consumer() {
    let mut rng = test_rng();

    for capacity in [None, Some(1), Some(3), Some(16)] {
        let values: Vec<i32> = (0..500).map(|_| rng.gen_range(0..100)).collect();
        let (input, output, stage) = match capacity {
            None => unbounded_stage(CancelToken::never()),
            Some(capacity) => buffered_stage(CancelToken::never(), capacity),
        };

        let producer = produce(input, CancelToken::never(), values.clone());
        let mut received: Vec<i32> = output.iter().collect();
        producer.join().unwrap();

        let mut expected = values;
        expected.sort();
        received.sort();
        assert_eq!(received, expected, "capacity {capacity:?}");
        assert_eq!(stage.join().unwrap(), Exit::Drained);
    }
}

#[test]
fn test_immediate_cancel() {
    let (canceller, token) = CancelToken::new();
    let (_input, output, stage) = unbounded_stage(token);

    canceller.cancel();

    assert_eq!(stage.join().unwrap(), Exit::Cancelled);
    assert!(output.recv().is_err());
}

#[test]
fn test_cancel() {
    for n in 0..5 {
        for capacity in [None, Some(3)] {
            let (canceller, token) = CancelToken::new();
            let (input, output, stage) = match capacity {
                None => unbounded_stage(token.clone()),
                Some(capacity) => buffered_stage(token.clone(), capacity),
            };
            let producer = produce(input, token, (1..=n).collect());

            canceller.cancel();

            // The producer may give up before sending anything, closing the
            // input of an empty stage.
            let exit = stage.join().unwrap();
            assert_ne!(exit, Exit::Disconnected, "n {n}, capacity {capacity:?}");
            assert!(output.recv().is_err(), "n {n}, capacity {capacity:?}");
            producer.join().unwrap();
        }
    }
}

#[test]
fn test_cancel_stops_every_stage() {
    let (canceller, token) = CancelToken::new();
    let stages: Vec<_> = (0..3).map(|_| unbounded_stage(token.clone())).collect();

    for (input, _, _) in &stages {
        input.send(1).unwrap();
    }
    canceller.cancel();

    for (_input, output, stage) in stages {
        assert_eq!(stage.join().unwrap(), Exit::Cancelled);
        assert!(output.recv().is_err());
    }
}

#[test]
fn test_dropping_canceller_cancels_stage() {
    let (canceller, token) = CancelToken::new();
    let (input, output, stage) = unbounded_stage(token);

    input.send(1).unwrap();
    drop::<Canceller>(canceller);

    assert_eq!(stage.join().unwrap(), Exit::Cancelled);
    assert!(output.recv().is_err());
}

#[test]
fn test_disconnected_output() {
    let (input, output, stage) = unbounded_stage(CancelToken::never());

    input.send(1).unwrap();
    input.send(2).unwrap();
    drop(output);

    assert_eq!(stage.join().unwrap(), Exit::Disconnected);
    assert!(input.send(3).is_err());
}

#[test]
fn test_run_on_caller_thread() {
    let (input, receiver) = bounded(0);
    let (sender, output) = bounded(0);

    thread::scope(|scope| {
        let stage = scope.spawn(|| {
            priority_reorder(receiver, sender, CancelToken::never(), Descending::new())
        });

        for word in ["b", "d", "a", "c"] {
            input.send(word).unwrap();
        }
        drop(input);

        assert_eq!(output.iter().collect::<Vec<_>>(), ["d", "c", "b", "a"]);
        assert_eq!(stage.join().unwrap(), Exit::Drained);
    });
}

#[test]
fn test_buffered() {
    let (input, output, stage) = buffered_stage(CancelToken::never(), 4);
    let producer = produce(input, CancelToken::never(), (0..10).rev().collect());

    assert_eq!(output.iter().collect::<Vec<_>>(), [6, 5, 4, 3, 2, 1, 0, 7, 8, 9]);
    assert_eq!(stage.join().unwrap(), Exit::Drained);
    producer.join().unwrap();
}

#[test]
fn test_buffered_capacity_one_passes_through() {
    let (input, output, stage) = buffered_stage(CancelToken::never(), 1);
    let producer = produce(input, CancelToken::never(), vec![3, 1, 2]);

    assert_eq!(output.iter().collect::<Vec<_>>(), [3, 1, 2]);
    assert_eq!(stage.join().unwrap(), Exit::Drained);
    producer.join().unwrap();
}

#[test]
#[should_panic(expected = "capacity must be positive")]
fn test_buffered_invalid_capacity() {
    let (_input, receiver) = bounded(0);
    let (sender, _output) = bounded(0);
    let _ = buffered_priority_reorder(receiver, sender, CancelToken::never(), 0, ascending);
}

#[test]
#[should_panic(expected = "capacity must be positive")]
fn test_builder_invalid_capacity() {
    let _ = Builder::new().capacity(0);
}

#[test]
fn test_buffered_never_full() {
    let (input, output, stage) = buffered_stage(CancelToken::never(), 4);
    let producer = produce(input, CancelToken::never(), vec![2, 1, 0]);

    assert_eq!(output.iter().collect::<Vec<_>>(), [0, 1, 2]);
    assert_eq!(stage.join().unwrap(), Exit::Drained);
    producer.join().unwrap();
}

#[test]
fn test_buffered_drain() {
    let (input, output, stage) = buffered_stage(CancelToken::never(), 3);

    input.send(3).unwrap();
    input.send(2).unwrap();
    input.send(1).unwrap();
    drop(input);

    assert_eq!(output.recv(), Ok(1));
    assert_eq!(output.recv(), Ok(2));
    assert_eq!(output.recv(), Ok(3));
    assert!(output.recv().is_err());
    assert_eq!(stage.join().unwrap(), Exit::Drained);
}

#[test]
fn test_buffered_cancel_during_fill() {
    let (canceller, token) = CancelToken::new();
    let (input, output, stage) = buffered_stage(token, 4);

    input.send(2).unwrap();
    input.send(1).unwrap();
    input.send(0).unwrap();
    canceller.cancel();

    assert_eq!(stage.join().unwrap(), Exit::Cancelled);
    assert!(output.recv().is_err());
}

#[test]
fn test_buffered_cancel_after_fill() {
    let (canceller, token) = CancelToken::new();
    let (input, output, stage) = buffered_stage(token, 4);

    for i in (0..4).rev() {
        input.send(i).unwrap();
    }
    drop(input);

    assert_eq!(output.recv(), Ok(0));
    canceller.cancel();

    assert_eq!(stage.join().unwrap(), Exit::Cancelled);
    assert!(output.recv().is_err());
}

#[test]
fn test_buffered_cancel_during_operation() {
    let (canceller, token) = CancelToken::new();
    let (input, output, stage) = buffered_stage(token.clone(), 4);
    let producer = produce(input, token, (0..10).rev().collect());

    assert_eq!(output.recv(), Ok(6));
    assert_eq!(output.recv(), Ok(5));
    canceller.cancel();

    assert_eq!(stage.join().unwrap(), Exit::Cancelled);
    assert!(output.recv().is_err());
    producer.join().unwrap();
}

#[test]
fn test_builder() {
    let (input, receiver) = bounded(0);
    let (sender, output) = bounded(0);
    let stage = Builder::new()
        .name("reorder-test")
        .stack_size(256 * 1024)
        .spawn(receiver, sender, CancelToken::never(), Ascending::new())
        .unwrap();

    assert_eq!(stage.thread().name(), Some("reorder-test"));

    input.send(2u64).unwrap();
    input.send(1).unwrap();
    drop(input);
    assert_eq!(output.iter().collect::<Vec<_>>(), [1, 2]);
    assert_eq!(stage.join().unwrap(), Exit::Drained);
}

#[test]
fn test_default_thread_name() {
    let (input, receiver) = bounded::<i32>(0);
    let (output, stage) = priority_channel(receiver, CancelToken::never(), ascending).unwrap();

    assert_eq!(stage.thread().name(), Some("priority-channel"));
    drop(input);
    assert!(output.recv().is_err());
    assert_eq!(stage.join().unwrap(), Exit::Drained);
}
