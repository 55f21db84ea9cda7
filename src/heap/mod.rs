//! A priority queue implemented with a binary min-heap.
//!
//! Insertion and popping the least element have *O*(log(*n*)) time complexity.
//! Checking the least element is *O*(1). Converting a vector to a heap can be
//! done in-place, and has *O*(*n*) complexity.
//!
//! "Least" is decided by the heap's order, a value implementing [`Less`]. The
//! items themselves need not implement any ordering trait.
//!
//! # Examples
//!
//! ```
//! use priority_channel::Heap;
//!
//! #[derive(Debug, PartialEq)]
//! struct Job {
//!     name: &'static str,
//!     deadline: u32,
//! }
//!
//! // Earliest deadline first.
//! let mut heap = Heap::new(|a: &Job, b: &Job| a.deadline < b.deadline);
//!
//! heap.push(Job { name: "backup", deadline: 30 });
//! heap.push(Job { name: "deploy", deadline: 10 });
//! heap.push(Job { name: "report", deadline: 20 });
//!
//! assert_eq!(heap.peek().map(|job| job.name), Some("deploy"));
//!
//! let names: Vec<_> = heap.drain_sorted().map(|job| job.name).collect();
//! assert_eq!(names, ["deploy", "report", "backup"]);
//! assert!(heap.is_empty());
//! ```

use crate::{Ascending, Descending, Less};
use alloc::vec::{self, Vec};
use core::{
    fmt,
    iter::FusedIterator,
    mem::{self, swap, ManuallyDrop},
    ptr, slice,
};


/// A priority queue implemented with a binary min-heap, ordered by `O`.
///
/// The least item under `O` (the one no other item is [`less`] than) is always
/// at the front. Among items that compare equal the pop order is whatever the
/// sift operations produce; in particular it is *not* first-in-first-out.
///
/// It is a logic error for an item to be modified in such a way that its order
/// relative to any other item changes while it is in the heap. The behavior
/// resulting from such a logic error is not specified, but will not result in
/// undefined behavior.
///
/// # Examples
///
/// ```
/// use priority_channel::Heap;
///
/// let mut heap = Heap::ascending();
///
/// assert_eq!(heap.peek(), None);
///
/// heap.push(5);
/// heap.push(1);
/// heap.push(2);
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert_eq!(heap.len(), 3);
///
/// assert_eq!(heap.pop(), Some(1));
/// assert_eq!(heap.pop(), Some(2));
/// assert_eq!(heap.pop(), Some(5));
/// assert_eq!(heap.pop(), None);
/// ```
///
/// # Time complexity
///
/// | [push]        | [pop]         | [peek] | [push_pop]    | [set]    |
/// |---------------|---------------|--------|---------------|----------|
/// | *O*(log(*n*))~ | *O*(log(*n*)) | *O*(1) | *O*(log(*n*)) | *O*(*n*) |
///
/// [`less`]: Less::less
/// [push]: Heap::push
/// [pop]: Heap::pop
/// [peek]: Heap::peek
/// [push_pop]: Heap::push_pop
/// [set]: Heap::set
pub struct Heap<T, O> {
    data: Vec<T>,
    order: O,
}

impl<T: Clone, O: Clone> Clone for Heap<T, O> {
    fn clone(&self) -> Self {
        Heap { data: self.data.clone(), order: self.order.clone() }
    }

    fn clone_from(&mut self, source: &Self) {
        self.data.clone_from(&source.data);
        self.order = source.order.clone();
    }
}

impl<T, O: Default> Default for Heap<T, O> {
    /// Creates an empty `Heap` with the default order.
    #[inline]
    fn default() -> Heap<T, O> {
        Heap { data: Vec::new(), order: O::default() }
    }
}

impl<T: fmt::Debug, O> fmt::Debug for Heap<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Ord> Heap<T, Ascending<T>> {
    /// Creates an empty heap that pops its least item first.
    #[must_use]
    pub fn ascending() -> Self {
        Heap::new(Ascending::new())
    }
}

impl<T: Ord> Heap<T, Descending<T>> {
    /// Creates an empty heap that pops its greatest item first.
    ///
    /// ```
    /// use priority_channel::Heap;
    ///
    /// let mut heap = Heap::descending();
    /// heap.extend(["pear", "apple", "quince"]);
    /// assert_eq!(heap.into_sorted_vec(), ["quince", "pear", "apple"]);
    /// ```
    #[must_use]
    pub fn descending() -> Self {
        Heap::new(Descending::new())
    }
}

impl<T, O: Less<T>> Heap<T, O> {
    /// Creates an empty `Heap` ordered by `order`.
    #[must_use]
    pub fn new(order: O) -> Heap<T, O> {
        Heap { data: Vec::new(), order }
    }

    /// Creates an empty `Heap` with at least the specified capacity.
    ///
    /// The heap will be able to hold at least `capacity` elements without
    /// reallocating. If `capacity` is 0, the heap will not allocate.
    #[must_use]
    pub fn with_capacity(order: O, capacity: usize) -> Heap<T, O> {
        Heap { data: Vec::with_capacity(capacity), order }
    }

    /// Creates a `Heap` ordered by `order` holding the items of `vec`.
    ///
    /// The vector becomes the heap's backing storage; the heap property is
    /// restored bottom-up in *O*(*n*) time, which is cheaper than pushing the
    /// items one by one.
    #[must_use]
    pub fn from_vec(order: O, vec: Vec<T>) -> Heap<T, O> {
        let mut heap = Heap { data: vec, order };
        heap.rebuild();
        heap
    }

    /// Removes the least item from the heap and returns it, or `None` if it
    /// is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use priority_channel::Heap;
    ///
    /// let mut heap = Heap::ascending();
    /// heap.extend([3, 1]);
    ///
    /// assert_eq!(heap.pop(), Some(1));
    /// assert_eq!(heap.pop(), Some(3));
    /// assert_eq!(heap.pop(), None);
    /// ```
    ///
    /// # Time complexity
    ///
    /// The worst case cost of `pop` on a heap containing *n* elements is *O*(log(*n*)).
    pub fn pop(&mut self) -> Option<T> {
        self.data.pop().map(|mut item| {
            if !self.is_empty() {
                swap(&mut item, &mut self.data[0]);
                // SAFETY: !self.is_empty() means that self.len() > 0
                unsafe { self.sift_down(0) };
            }
            item
        })
    }

    /// Pushes an item onto the heap.
    ///
    /// # Time complexity
    ///
    /// *O*(log(*n*)) comparisons; the occasional reallocation of the backing
    /// vector is amortized over all pushes.
    pub fn push(&mut self, item: T) {
        let old_len = self.len();
        self.data.push(item);
        // SAFETY: Since we pushed a new item it means that
        //  old_len = self.len() - 1 < self.len()
        unsafe { self.sift_up(old_len) };
    }

    /// Pushes `item` onto the heap and then pops the least item off it.
    ///
    /// This gives the same result as [`push`] followed by [`pop`] but needs a
    /// single sift: if `item` is less than the current least item (or the heap
    /// is empty) it is handed straight back and the heap is left untouched,
    /// otherwise it takes the root's place and the old root is returned.  The
    /// heap never grows.
    ///
    /// # Examples
    ///
    /// ```
    /// use priority_channel::Heap;
    ///
    /// let mut heap = Heap::ascending();
    /// assert_eq!(heap.push_pop(4), 4);
    ///
    /// heap.push(2);
    /// assert_eq!(heap.push_pop(1), 1);
    /// assert_eq!(heap.push_pop(3), 2);
    /// assert_eq!(heap.into_vec(), [3]);
    /// ```
    ///
    /// [`push`]: Heap::push
    /// [`pop`]: Heap::pop
    pub fn push_pop(&mut self, mut item: T) -> T {
        if self.data.first().map_or(true, |root| self.order.less(&item, root)) {
            return item;
        }
        swap(&mut item, &mut self.data[0]);
        // SAFETY: the heap has a root, so 0 < self.len()
        unsafe { self.sift_down(0) };
        item
    }

    /// Replaces the contents of the heap with `values`, which becomes the new
    /// backing storage.
    ///
    /// Previous contents are dropped. The heap property is restored bottom-up
    /// in *O*(*n*) time.
    pub fn set(&mut self, values: Vec<T>) {
        self.data = values;
        self.rebuild();
    }

    /// Returns an iterator which pops every item off the heap, least first.
    ///
    /// Items the iterator has not yielded when it is dropped are removed from
    /// the heap all the same.
    ///
    /// # Examples
    ///
    /// ```
    /// use priority_channel::Heap;
    ///
    /// let mut heap = Heap::ascending();
    /// heap.extend([4, 2, 3, 1]);
    ///
    /// assert_eq!(heap.drain_sorted().take(2).collect::<Vec<_>>(), [1, 2]);
    /// assert!(heap.is_empty());
    /// ```
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, T, O> {
        DrainSorted { inner: self }
    }

    /// Consumes the `Heap` and returns a vector sorted least first.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut end = self.len();
        while end > 1 {
            end -= 1;
            // Moves the least remaining item behind the heap, building the
            // vector greatest first.
            self.data.swap(0, end);
            // SAFETY: `end` goes from `self.len() - 1` to 1 (both included) so:
            //  0 < 1 <= end <= self.len() - 1 < self.len()
            unsafe { self.sift_down_range(0, end) };
        }
        let mut data = self.into_vec();
        data.reverse();
        data
    }

    // The implementations of sift_up and sift_down use unsafe blocks in
    // order to move an element out of the vector (leaving behind a
    // hole), shift along the others and move the removed element back into the
    // vector at the final location of the hole.
    // The `Hole` type is used to represent this, and make sure
    // the hole is filled back at the end of its scope, even if the order panics.

    /// Take the element at `pos` and move it up the heap while its parent is
    /// not less than it.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `pos < self.len()`.
    unsafe fn sift_up(&mut self, pos: usize) -> usize {
        // SAFETY: The caller guarantees that pos < self.len()
        let mut hole = unsafe { Hole::new(&mut self.data, pos) };

        while hole.pos() > 0 {
            let parent = (hole.pos() - 1) / 2;

            // SAFETY: hole.pos() > 0, so hole.pos() - 1 can't underflow.
            //  This guarantees that parent < hole.pos() so
            //  it's a valid index and also != hole.pos().
            if self.order.less(unsafe { hole.get(parent) }, hole.element()) {
                break;
            }

            // SAFETY: Same as above
            unsafe { hole.move_to(parent) };
        }

        hole.pos()
    }

    /// Take the element at `pos` and move it down the heap until it is less
    /// than the lesser of its children, or it is a leaf.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that `pos < end <= self.len()`.
    unsafe fn sift_down_range(&mut self, pos: usize, end: usize) {
        // SAFETY: The caller guarantees that pos < end <= self.len().
        let mut hole = unsafe { Hole::new(&mut self.data, pos) };
        let mut child = 2 * hole.pos() + 1;

        // Loop invariant: child == 2 * hole.pos() + 1.
        while child < end {
            // compare with the lesser of the two children; the right one only
            // wins when strictly less
            // SAFETY: child < end <= self.len() and, when checked,
            //  child + 1 < end <= self.len(), so they're valid indexes.
            //  Both are > hole.pos().
            if child + 1 < end
                && self.order.less(unsafe { hole.get(child + 1) }, unsafe { hole.get(child) })
            {
                child += 1;
            }

            // if we are already in order, stop.
            // SAFETY: child is now either the old child or the old child+1
            //  We already proven that both are < end and != hole.pos()
            if self.order.less(hole.element(), unsafe { hole.get(child) }) {
                return;
            }

            // SAFETY: same as above.
            unsafe { hole.move_to(child) };
            child = 2 * hole.pos() + 1;
        }
    }

    /// # Safety
    ///
    /// The caller must guarantee that `pos < self.len()`.
    unsafe fn sift_down(&mut self, pos: usize) {
        let len = self.len();
        // SAFETY: pos < len is guaranteed by the caller and
        //  obviously len = self.len() <= self.len().
        unsafe { self.sift_down_range(pos, len) };
    }

    fn rebuild(&mut self) {
        let mut n = self.len() / 2;
        while n > 0 {
            n -= 1;
            // SAFETY: n starts from self.len() / 2 and goes down to 0.
            //  The only case when !(n < self.len()) is if
            //  self.len() == 0, but it's ruled out by the loop condition.
            unsafe { self.sift_down(n) };
        }
    }
}

impl<T, O> Heap<T, O> {
    /// Returns an iterator visiting all values in the underlying vector, in
    /// arbitrary order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { iter: self.data.iter() }
    }

    /// Returns the least item in the heap, or `None` if it is empty.
    ///
    /// # Time complexity
    ///
    /// Cost is *O*(1) in the worst case.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Returns the order the heap was created with.
    pub fn order(&self) -> &O {
        &self.order
    }

    /// Returns the number of elements the heap can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Reserves capacity for at least `additional` elements more than the
    /// current length.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows `usize`.
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    /// Discards as much additional capacity as possible.
    pub fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit();
    }

    /// Returns a slice of all values in the underlying vector, in arbitrary
    /// order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Consumes the `Heap` and returns the underlying vector in arbitrary
    /// order.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_vec(self) -> Vec<T> {
        self.into()
    }

    /// Returns the length of the heap.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks if the heap is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all items from the heap.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

/// Hole represents a hole in a slice i.e., an index without valid value
/// (because it was moved from or duplicated).
/// In drop, `Hole` will restore the slice by filling the hole
/// position with the value that was originally removed.
struct Hole<'a, T: 'a> {
    data: &'a mut [T],
    elt: ManuallyDrop<T>,
    pos: usize,
}

impl<'a, T> Hole<'a, T> {
    /// Create a new `Hole` at index `pos`.
    ///
    /// Unsafe because pos must be within the data slice.
    #[inline]
    unsafe fn new(data: &'a mut [T], pos: usize) -> Self {
        debug_assert!(pos < data.len());
        // SAFE: pos should be inside the slice
        let elt = unsafe { ptr::read(data.get_unchecked(pos)) };
        Hole { data, elt: ManuallyDrop::new(elt), pos }
    }

    #[inline]
    fn pos(&self) -> usize {
        self.pos
    }

    /// Returns a reference to the element removed.
    #[inline]
    fn element(&self) -> &T {
        &self.elt
    }

    /// Returns a reference to the element at `index`.
    ///
    /// Unsafe because index must be within the data slice and not equal to pos.
    #[inline]
    unsafe fn get(&self, index: usize) -> &T {
        debug_assert!(index != self.pos);
        debug_assert!(index < self.data.len());
        unsafe { self.data.get_unchecked(index) }
    }

    /// Move hole to new location
    ///
    /// Unsafe because index must be within the data slice and not equal to pos.
    #[inline]
    unsafe fn move_to(&mut self, index: usize) {
        debug_assert!(index != self.pos);
        debug_assert!(index < self.data.len());
        unsafe {
            let ptr = self.data.as_mut_ptr();
            let index_ptr: *const _ = ptr.add(index);
            let hole_ptr = ptr.add(self.pos);
            ptr::copy_nonoverlapping(index_ptr, hole_ptr, 1);
        }
        self.pos = index;
    }
}

impl<T> Drop for Hole<'_, T> {
    #[inline]
    fn drop(&mut self) {
        // fill the hole again
        unsafe {
            let pos = self.pos;
            ptr::copy_nonoverlapping(&*self.elt, self.data.get_unchecked_mut(pos), 1);
        }
    }
}

/// An iterator over the elements of a `Heap`, in arbitrary order.
///
/// This `struct` is created by [`Heap::iter()`].
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    iter: slice::Iter<'a, T>,
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.iter.as_slice()).finish()
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter { iter: self.iter.clone() }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.iter.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        self.iter.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// An owning iterator over the elements of a `Heap`, in arbitrary order.
///
/// This `struct` is created by [`Heap::into_iter()`] (provided by the
/// [`IntoIterator`] trait).
#[derive(Clone, Debug)]
pub struct IntoIter<T> {
    iter: vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.iter.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.iter.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

/// A draining iterator over the elements of a `Heap`, least first.
///
/// This `struct` is created by [`Heap::drain_sorted()`].
#[derive(Debug)]
pub struct DrainSorted<'a, T, O: Less<T>> {
    inner: &'a mut Heap<T, O>,
}

impl<'a, T, O: Less<T>> Drop for DrainSorted<'a, T, O> {
    /// Removes heap elements in heap order.
    fn drop(&mut self) {
        struct DropGuard<'r, 'a, T, O: Less<T>>(&'r mut DrainSorted<'a, T, O>);

        impl<'r, 'a, T, O: Less<T>> Drop for DropGuard<'r, 'a, T, O> {
            fn drop(&mut self) {
                while self.0.inner.pop().is_some() {}
            }
        }

        while let Some(item) = self.inner.pop() {
            let guard = DropGuard(self);
            drop(item);
            mem::forget(guard);
        }
    }
}

impl<T, O: Less<T>> Iterator for DrainSorted<'_, T, O> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.pop()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let exact = self.inner.len();
        (exact, Some(exact))
    }
}

impl<T, O: Less<T>> ExactSizeIterator for DrainSorted<'_, T, O> {}

impl<T, O: Less<T>> FusedIterator for DrainSorted<'_, T, O> {}

impl<T, O: Less<T> + Default> From<Vec<T>> for Heap<T, O> {
    /// Converts a `Vec<T>` into a `Heap<T, O>` under the default order.
    ///
    /// This conversion happens in-place, and has *O*(*n*) time complexity.
    fn from(vec: Vec<T>) -> Heap<T, O> {
        Heap::from_vec(O::default(), vec)
    }
}

impl<T, O> From<Heap<T, O>> for Vec<T> {
    /// Converts a `Heap<T, O>` into a `Vec<T>`.
    ///
    /// This conversion requires no data movement or allocation, and has
    /// constant time complexity.
    fn from(heap: Heap<T, O>) -> Vec<T> {
        heap.data
    }
}

impl<T, O: Less<T> + Default> FromIterator<T> for Heap<T, O> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Heap<T, O> {
        Heap::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T, O> IntoIterator for Heap<T, O> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Creates a consuming iterator, that is, one that moves each value out of
    /// the heap in arbitrary order. The heap cannot be used after calling this.
    fn into_iter(self) -> IntoIter<T> {
        IntoIter { iter: self.data.into_iter() }
    }
}

impl<'a, T, O> IntoIterator for &'a Heap<T, O> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T, O: Less<T>> Extend<T> for Heap<T, O> {
    /// Pushes every item of `iter` in turn.
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iterator = iter.into_iter();
        let (lower, _) = iterator.size_hint();

        self.reserve(lower);

        iterator.for_each(move |elem| self.push(elem));
    }
}

impl<'a, T: 'a + Copy, O: Less<T>> Extend<&'a T> for Heap<T, O> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}
