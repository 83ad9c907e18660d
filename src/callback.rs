//! Behavior supplied by the caller when a container is created.

use std::cmp::Ordering;

/// A total order over keys.
///
/// The order must be consistent for the lifetime of the container: the same two keys always
/// compare the same way. Every closure of the form `Fn(&T, &T) -> Ordering` is a comparator.
///
/// # Examples
///
/// ```
/// use keyed_collections::callback::{Comparator, NaturalOrder};
/// use std::cmp::Ordering;
///
/// let reverse = |a: &u32, b: &u32| b.cmp(a);
/// assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
/// assert_eq!(NaturalOrder.compare(&1, &2), Ordering::Less);
/// ```
pub trait Comparator<T> {
    /// Returns whether `a` precedes, equals, or follows `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// A comparator that uses the `Ord` implementation of the key.
#[derive(Clone, Copy, Debug, Default)]
pub struct NaturalOrder;

impl<T> Comparator<T> for NaturalOrder
where
    T: Ord,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// A callback that takes ownership of a key-value pair whose association has been permanently
/// terminated.
///
/// A container invokes it exactly once per association: when the value is replaced by a duplicate
/// insertion, when the key is removed, or when the container is cleared or dropped. Pairs that are
/// handed back to the caller, such as through a consuming iterator, are not released. Every
/// closure of the form `FnMut(T, U)` is a release callback.
pub trait Release<T, U> {
    fn release(&mut self, key: T, value: U);
}

impl<T, U, F> Release<T, U> for F
where
    F: FnMut(T, U),
{
    fn release(&mut self, key: T, value: U) {
        self(key, value)
    }
}
