//! A binary min-heap that orders its items by a caller-supplied predicate rather
//! than the [`Ord`] trait, and channel stages built on it that reorder a stream
//! of items by priority.
//!
//! The ordering is a *strategy* held by the container: any type implementing
//! [`Less<T>`] (including plain closures of type `Fn(&T, &T) -> bool`) can be
//! used, so item types need not implement any ordering trait themselves.
//! [`Ascending`] and [`Descending`] provide the natural orders of [`Ord`] types.
//!
//! With the default `std` feature the crate also provides [`channel`], whose
//! stages read items from a [`crossbeam_channel::Receiver`], buffer them in a
//! [`Heap`] and write them to a [`crossbeam_channel::Sender`] lowest first.
//!
//! ```
//! use priority_channel::Heap;
//!
//! let mut heap = Heap::new(|a: &u32, b: &u32| a % 10 < b % 10);
//! heap.extend([31, 19, 5, 42]);
//!
//! assert_eq!(heap.pop(), Some(31));
//! assert_eq!(heap.pop(), Some(42));
//! assert_eq!(heap.push_pop(7), 5);
//! ```
#![cfg_attr(not(any(feature = "std", test)), no_std)]
// documentation controls
#![cfg_attr(docsrs, feature(doc_auto_cfg, doc_cfg))]

extern crate alloc;

use cfg_if::cfg_if;

pub mod default;
pub mod heap;

pub use default::{Ascending, Descending};
pub use heap::Heap;

cfg_if! {
    if #[cfg(feature = "std")] {
        pub mod cancel;
        pub mod channel;

        pub use cancel::{CancelToken, Canceller};
        pub use channel::{
            buffered_priority_channel, buffered_priority_reorder, priority_channel,
            priority_reorder, Builder, Error, Exit,
        };
    }
}

/// A strict weak order over `T`, expressed as a "less than" predicate.
///
/// The collections in this crate never require `T` to be ordered; instead they
/// hold a value implementing this trait and consult it for every comparison.
///
/// Implementations should form a strict weak order for the duration of any
/// single operation.  Orders that are inconsistent (for example comparisons
/// involving NaN) are accepted: no method panics because of them, but the
/// resulting item order is unspecified.
pub trait Less<T: ?Sized> {
    /// Returns `true` if `this` must be ordered strictly before `that`.
    fn less(&self, this: &T, that: &T) -> bool;
}

impl<T: ?Sized, F> Less<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, this: &T, that: &T) -> bool {
        self(this, that)
    }
}

#[cfg(test)]
#[allow(dead_code)] // Not used in all configurations
pub(crate) mod test_helpers {
    /// Seeds a fresh RNG from the caller's location, so each test draws a
    /// different but reproducible-per-run sequence.
    #[track_caller]
    pub(crate) fn test_rng() -> rand_xorshift::XorShiftRng {
        use std::hash::{BuildHasher, Hash, Hasher};
        let mut hasher = std::collections::hash_map::RandomState::new().build_hasher();
        std::panic::Location::caller().hash(&mut hasher);
        let hc64 = hasher.finish();
        let seed_vec = hc64.to_le_bytes().into_iter().chain(0u8..8).collect::<Vec<u8>>();
        let seed: [u8; 16] = seed_vec.as_slice().try_into().unwrap();
        rand::SeedableRng::from_seed(seed)
    }
}
