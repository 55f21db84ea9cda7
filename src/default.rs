//! Orders that enable the collections of this crate to behave like those of the
//! standard library, namely using the [`Ord`] trait for comparisons rather than
//! a user-supplied predicate.
//!
//! They exist for the common case of reordering numbers, strings and other
//! naturally ordered items; anything else should supply its own [`Less`]
//! implementation or closure.

use crate::Less;
use core::{fmt, marker::PhantomData};

/// A zero-sized order that puts lesser items first, delegating to the [`Ord`]
/// implementation of its type parameter `T`.
pub struct Ascending<T: ?Sized + Ord>(PhantomData<fn(&T)>);

/// A zero-sized order that puts greater items first, delegating to the [`Ord`]
/// implementation of its type parameter `T`.
pub struct Descending<T: ?Sized + Ord>(PhantomData<fn(&T)>);

macro_rules! ord_orders {
    ($($name:ident => |$this:ident, $that:ident| $less:expr,)*) => {$(
        impl<T: ?Sized + Ord> $name<T> {
            /// Creates the order.
            #[must_use]
            pub const fn new() -> Self {
                Self(PhantomData)
            }
        }

        impl<T: ?Sized + Ord> Default for $name<T> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<T: ?Sized + Ord> Clone for $name<T> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<T: ?Sized + Ord> Copy for $name<T> {}

        impl<T: ?Sized + Ord> fmt::Debug for $name<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }

        impl<T: ?Sized + Ord> Less<T> for $name<T> {
            #[inline]
            fn less(&self, $this: &T, $that: &T) -> bool {
                $less
            }
        }
    )*};
}

ord_orders! {
    Ascending => |this, that| this < that,
    Descending => |this, that| that < this,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions() {
        assert!(Ascending::new().less(&1, &2));
        assert!(!Ascending::new().less(&2, &2));
        assert!(Descending::new().less("b", "a"));
        assert!(!Descending::new().less("a", "a"));
    }
}
