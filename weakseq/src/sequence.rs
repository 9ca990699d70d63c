use std::fmt::{Debug, Display};
use std::ops::{AddAssign, Bound, Range, RangeBounds};
use std::rc::Rc;
use std::slice;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::IndexError;
use crate::iter::{IntoIter, Iter};
use crate::pointers::Shared;
use crate::slot::WeakSlot;

/// An ordered, indexable sequence that holds its elements weakly.
///
/// Every position is a [`WeakSlot`]. A slot whose referent has been dropped
/// elsewhere stays in place and reads as `None`, so `len` counts slots, not
/// live elements. Iteration skips those slots entirely.
///
/// Out-of-range indices are programming errors and panic, like `Vec`. The
/// `try_*` methods return an [`IndexError`] instead.
pub struct WeakSequence<P: Shared> {
    slots: Vec<WeakSlot<P>>,
}

pub type RcWeakSequence<T> = WeakSequence<Rc<T>>;
pub type ArcWeakSequence<T> = WeakSequence<Arc<T>>;

#[cold]
#[track_caller]
fn fault(error: IndexError) -> ! {
    panic!("{}", error)
}

impl<P: Shared> WeakSequence<P> {
    pub fn new() -> Self {
        WeakSequence { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        WeakSequence {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Builds a sequence from values that may be absent, one slot per value.
    pub fn from_options<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a P>>,
        P: 'a,
    {
        WeakSequence {
            slots: values.into_iter().map(WeakSlot::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Number of slots whose referent is alive right now.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_live()).count()
    }

    /// The first slot's referent. An empty sequence reads as `None` rather
    /// than panicking.
    pub fn first(&self) -> Option<P> {
        self.slots.first().and_then(WeakSlot::upgrade)
    }

    /// The last slot's referent, `None` for an empty sequence.
    pub fn last(&self) -> Option<P> {
        self.slots.last().and_then(WeakSlot::upgrade)
    }

    /// Reads slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn at(&self, index: usize) -> Option<P> {
        self.try_at(index).unwrap_or_else(|error| fault(error))
    }

    pub fn try_at(&self, index: usize) -> Result<Option<P>, IndexError> {
        self.slots
            .get(index)
            .map(WeakSlot::upgrade)
            .ok_or(IndexError::OutOfBounds {
                index,
                len: self.len(),
            })
    }

    #[track_caller]
    pub fn slot(&self, index: usize) -> &WeakSlot<P> {
        match self.slots.get(index) {
            Some(slot) => slot,
            None => fault(IndexError::OutOfBounds {
                index,
                len: self.len(),
            }),
        }
    }

    /// Reads every slot in `range`, keeping absent slots as `None`.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or extends past `len`.
    #[track_caller]
    pub fn range<R: RangeBounds<usize>>(&self, range: R) -> Vec<Option<P>> {
        let range = self.checked_range(range).unwrap_or_else(|error| fault(error));
        self.slots[range].iter().map(WeakSlot::upgrade).collect()
    }

    /// Reads every slot, keeping absent slots as `None`.
    pub fn to_vec(&self) -> Vec<Option<P>> {
        self.slots.iter().map(WeakSlot::upgrade).collect()
    }

    /// Replaces slot `index` with a fresh observation of `value`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn set(&mut self, index: usize, value: Option<&P>) {
        if let Err(error) = self.try_set(index, value) {
            fault(error)
        }
    }

    pub fn try_set(&mut self, index: usize, value: Option<&P>) -> Result<(), IndexError> {
        let len = self.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(IndexError::OutOfBounds { index, len })?;
        *slot = WeakSlot::new(value);
        Ok(())
    }

    /// Replaces the slots in `range` with one new slot per value. The number of
    /// values need not match the width of the range; the sequence grows or
    /// shrinks by the difference.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or extends past `len`.
    #[track_caller]
    pub fn splice<'a, R, I>(&mut self, range: R, values: I)
    where
        R: RangeBounds<usize>,
        I: IntoIterator<Item = Option<&'a P>>,
        P: 'a,
    {
        let range = self.checked_range(range).unwrap_or_else(|error| fault(error));
        debug_println!("splice {}..{} of {}", range.start, range.end, self.len());
        self.slots
            .splice(range, values.into_iter().map(WeakSlot::new))
            .for_each(drop);
    }

    pub fn push(&mut self, value: Option<&P>) {
        self.slots.push(WeakSlot::new(value));
    }

    /// Inserts a slot before `index`. `index == len` appends.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: Option<&P>) {
        let len = self.len();
        if index > len {
            fault(IndexError::OutOfBounds { index, len });
        }
        debug_println!("insert at {} of {}", index, len);
        self.slots.insert(index, WeakSlot::new(value));
    }

    /// Removes slot `index` and returns what it read at the moment of removal.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> Option<P> {
        self.try_remove(index).unwrap_or_else(|error| fault(error))
    }

    pub fn try_remove(&mut self, index: usize) -> Result<Option<P>, IndexError> {
        let len = self.len();
        if index >= len {
            return Err(IndexError::OutOfBounds { index, len });
        }
        debug_println!("remove at {} of {}", index, len);
        Ok(self.slots.remove(index).upgrade())
    }

    /// Removes the final slot and returns what it read.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is empty. Use [`WeakSequence::pop`] to tell an
    /// empty sequence apart from an absent last slot without panicking.
    #[track_caller]
    pub fn remove_last(&mut self) -> Option<P> {
        match self.pop() {
            Some(read) => read,
            None => panic!("remove_last called on an empty weak sequence"),
        }
    }

    /// `None` if the sequence was empty, otherwise `Some` of the removed slot's read.
    pub fn pop(&mut self) -> Option<Option<P>> {
        self.slots.pop().map(|slot| slot.upgrade())
    }

    pub fn clear(&mut self) {
        debug_println!("clear {} slots", self.len());
        self.slots.clear();
    }

    /// # Panics
    ///
    /// Panics if the range is inverted or extends past `len`.
    #[track_caller]
    pub fn remove_range<R: RangeBounds<usize>>(&mut self, range: R) {
        let range = self.checked_range(range).unwrap_or_else(|error| fault(error));
        debug_println!("remove {}..{} of {}", range.start, range.end, self.len());
        self.slots.drain(range);
    }

    pub fn truncate(&mut self, len: usize) {
        self.slots.truncate(len);
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[track_caller]
    pub fn swap(&mut self, a: usize, b: usize) {
        let len = self.len();
        for index in [a, b] {
            if index >= len {
                fault(IndexError::OutOfBounds { index, len });
            }
        }
        self.slots.swap(a, b);
    }

    /// Drops every slot that currently reads as `None`, whether its referent
    /// expired or it never had one. Returns how many slots were dropped.
    pub fn prune_expired(&mut self) -> usize {
        let before = self.len();
        self.slots.retain(WeakSlot::is_live);
        let pruned = before - self.len();
        debug_println!("pruned {} of {} slots", pruned, before);
        pruned
    }

    /// Appends a present slot for each value. The values stay owned by the caller.
    pub fn extend_from_slice(&mut self, values: &[P]) {
        self.slots
            .extend(values.iter().map(|value| WeakSlot::new(Some(value))));
    }

    /// Appends a copy of each of `other`'s slots, observing whatever they read
    /// now. Later changes to `other` do not reach the copies.
    pub fn concat(&mut self, other: &WeakSequence<P>) {
        self.slots.reserve(other.len());
        for slot in &other.slots {
            self.slots.push(WeakSlot::new(slot.upgrade().as_ref()));
        }
    }

    /// A new sequence of the slots whose current read satisfies `predicate`.
    pub fn filter<F>(&self, mut predicate: F) -> WeakSequence<P>
    where
        F: FnMut(Option<&P>) -> bool,
    {
        let mut filtered = WeakSequence::new();
        for read in self.slots.iter().map(WeakSlot::upgrade) {
            if predicate(read.as_ref()) {
                filtered.push(read.as_ref());
            }
        }
        filtered
    }

    /// A new sequence with the slots in reverse order.
    pub fn reversed(&self) -> WeakSequence<P> {
        let mut reversed = WeakSequence::with_capacity(self.len());
        for slot in self.slots.iter().rev() {
            reversed.push(slot.upgrade().as_ref());
        }
        reversed
    }

    /// Live referents in order. Absent slots are skipped, so this can yield
    /// fewer than `len` items.
    pub fn iter(&self) -> Iter<'_, P> {
        Iter::new(&self.slots)
    }

    pub fn slots(&self) -> slice::Iter<'_, WeakSlot<P>> {
        self.slots.iter()
    }

    /// Compares by referent identity rather than by value. Absent matches absent.
    pub fn same_referents(&self, other: &WeakSequence<P>) -> bool {
        self.len() == other.len()
            && self
                .slots
                .iter()
                .zip(&other.slots)
                .all(|(a, b)| match (a.upgrade(), b.upgrade()) {
                    (Some(a), Some(b)) => P::ptr_eq(&a, &b),
                    (None, None) => true,
                    _ => false,
                })
    }

    fn checked_range<R: RangeBounds<usize>>(&self, range: R) -> Result<Range<usize>, IndexError> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(IndexError::InvalidRange { start, end, len });
        }
        Ok(start..end)
    }
}

impl<P: Shared> Clone for WeakSequence<P> {
    fn clone(&self) -> Self {
        WeakSequence {
            slots: self.slots.clone(),
        }
    }
}

impl<P: Shared> Default for WeakSequence<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Shared + PartialEq> PartialEq for WeakSequence<P> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .slots
                .iter()
                .zip(&other.slots)
                .all(|(a, b)| a.upgrade() == b.upgrade())
    }
}

impl<P: Shared + Eq> Eq for WeakSequence<P> {}

impl<P: Shared> Debug for WeakSequence<P>
where
    P::Target: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.slots.iter()).finish()
    }
}

impl<P: Shared> Display for WeakSequence<P>
where
    P::Target: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            Display::fmt(slot, f)?;
        }
        f.write_str("]")
    }
}

impl<P: Shared> Serialize for WeakSequence<P>
where
    P::Target: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(&self.slots)
    }
}

impl<P: Shared> From<&[P]> for WeakSequence<P> {
    fn from(values: &[P]) -> Self {
        values.iter().collect()
    }
}

impl<P: Shared> From<&Vec<P>> for WeakSequence<P> {
    fn from(values: &Vec<P>) -> Self {
        values.iter().collect()
    }
}

impl<'a, P: Shared + 'a> FromIterator<&'a P> for WeakSequence<P> {
    fn from_iter<I: IntoIterator<Item = &'a P>>(values: I) -> Self {
        WeakSequence::from_options(values.into_iter().map(Some))
    }
}

impl<'a, P: Shared + 'a> Extend<&'a P> for WeakSequence<P> {
    fn extend<I: IntoIterator<Item = &'a P>>(&mut self, values: I) {
        self.slots
            .extend(values.into_iter().map(|value| WeakSlot::new(Some(value))));
    }
}

impl<'a, P: Shared + 'a> Extend<Option<&'a P>> for WeakSequence<P> {
    fn extend<I: IntoIterator<Item = Option<&'a P>>>(&mut self, values: I) {
        self.slots.extend(values.into_iter().map(WeakSlot::new));
    }
}

impl<P: Shared> AddAssign<&WeakSequence<P>> for WeakSequence<P> {
    fn add_assign(&mut self, other: &WeakSequence<P>) {
        self.concat(other);
    }
}

impl<P: Shared> AddAssign<&[P]> for WeakSequence<P> {
    fn add_assign(&mut self, values: &[P]) {
        self.extend_from_slice(values);
    }
}

impl<'a, P: Shared> IntoIterator for &'a WeakSequence<P> {
    type Item = P;
    type IntoIter = Iter<'a, P>;

    fn into_iter(self) -> Iter<'a, P> {
        self.iter()
    }
}

impl<P: Shared> IntoIterator for WeakSequence<P> {
    type Item = P;
    type IntoIter = IntoIter<P>;

    fn into_iter(self) -> IntoIter<P> {
        IntoIter::new(self.slots)
    }
}

/// Builds a [`WeakSequence`] from references to strong pointers, each stored
/// as a present slot.
///
/// ```
/// use std::rc::Rc;
/// use weakseq::weak_seq;
///
/// let a = Rc::new(1);
/// let b = Rc::new(2);
/// let seq = weak_seq![&a, &b];
/// assert_eq!(seq.len(), 2);
/// ```
#[macro_export]
macro_rules! weak_seq {
    () => {
        $crate::WeakSequence::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut seq = $crate::WeakSequence::new();
        $(seq.push(Some($value));)+
        seq
    }};
}
