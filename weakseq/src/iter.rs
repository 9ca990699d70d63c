use std::iter::FusedIterator;
use std::slice;
use std::vec;

use crate::pointers::Shared;
use crate::slot::WeakSlot;

/// Yields the live referents of a sequence in order, skipping expired slots.
///
/// The iterator borrows the sequence, so the set of slots it walks is fixed at
/// creation. Liveness is checked per slot as the cursor reaches it.
pub struct Iter<'a, P: Shared> {
    slots: slice::Iter<'a, WeakSlot<P>>,
}

impl<'a, P: Shared> Iter<'a, P> {
    pub(crate) fn new(slots: &'a [WeakSlot<P>]) -> Self {
        Iter {
            slots: slots.iter(),
        }
    }
}

impl<P: Shared> Iterator for Iter<'_, P> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        self.slots.by_ref().find_map(WeakSlot::upgrade)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<P: Shared> DoubleEndedIterator for Iter<'_, P> {
    fn next_back(&mut self) -> Option<P> {
        self.slots.by_ref().rev().find_map(WeakSlot::upgrade)
    }
}

impl<P: Shared> FusedIterator for Iter<'_, P> {}

impl<P: Shared> Clone for Iter<'_, P> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
        }
    }
}

/// Owning counterpart of [`Iter`], produced by `WeakSequence::into_iter`.
pub struct IntoIter<P: Shared> {
    slots: vec::IntoIter<WeakSlot<P>>,
}

impl<P: Shared> IntoIter<P> {
    pub(crate) fn new(slots: Vec<WeakSlot<P>>) -> Self {
        IntoIter {
            slots: slots.into_iter(),
        }
    }
}

impl<P: Shared> Iterator for IntoIter<P> {
    type Item = P;

    fn next(&mut self) -> Option<P> {
        self.slots.by_ref().find_map(|slot| slot.upgrade())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<P: Shared> DoubleEndedIterator for IntoIter<P> {
    fn next_back(&mut self) -> Option<P> {
        self.slots.by_ref().rev().find_map(|slot| slot.upgrade())
    }
}

impl<P: Shared> FusedIterator for IntoIter<P> {}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    fn slots(values: &[Option<&Rc<u32>>]) -> Vec<WeakSlot<Rc<u32>>> {
        values.iter().map(|v| WeakSlot::new(*v)).collect()
    }

    #[test]
    fn test_skips_expired_and_empty_slots() {
        let a = Rc::new(1);
        let b = Rc::new(2);
        let c = Rc::new(3);
        let slots = slots(&[Some(&a), None, Some(&b), Some(&c)]);
        drop(b);

        let seen: Vec<u32> = Iter::new(&slots).map(|v| *v).collect();
        assert_eq!(seen, vec![1, 3]);
    }

    #[test]
    fn test_double_ended() {
        let a = Rc::new(1);
        let b = Rc::new(2);
        let c = Rc::new(3);
        let slots = slots(&[Some(&a), Some(&b), None, Some(&c)]);

        let mut iter = Iter::new(&slots);
        assert_eq!(iter.next_back().as_deref(), Some(&3));
        assert_eq!(iter.next().as_deref(), Some(&1));
        assert_eq!(iter.next_back().as_deref(), Some(&2));
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn test_all_expired_yields_nothing() {
        let a = Rc::new(1);
        let slots = slots(&[Some(&a), Some(&a), None]);
        drop(a);
        assert_eq!(Iter::new(&slots).count(), 0);
        assert_eq!(IntoIter::new(slots).count(), 0);
    }

    #[test]
    fn test_fresh_iterator_restarts() {
        let a = Rc::new(1);
        let b = Rc::new(2);
        let slots = slots(&[Some(&a), Some(&b)]);
        let mut first = Iter::new(&slots);
        first.next();
        assert_eq!(first.count(), 1);
        assert_eq!(Iter::new(&slots).count(), 2);
    }
}
