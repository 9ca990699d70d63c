//! The ownership seam between a weak sequence and whatever owns its elements.
//!
//! A sequence never counts as an owner. It only needs two things from the
//! element's pointer type: a way to take a non-owning observation, and a way to
//! ask whether that observation still resolves. Both `Rc` and `Arc` provide this
//! through their `Weak` counterparts, so liveness tracking stays with std.

use std::ops::Deref;
use std::rc::{self, Rc};
use std::sync::{self, Arc};

/// A strong, shared-ownership pointer that can hand out weak observations.
pub trait Shared: Clone + Deref {
    /// The non-owning counterpart of this pointer.
    type Weak: Clone;

    fn downgrade(this: &Self) -> Self::Weak;

    /// Returns a strong pointer if the referent is still alive.
    fn upgrade(weak: &Self::Weak) -> Option<Self>;

    /// Checks liveness without producing a strong pointer.
    fn is_live(weak: &Self::Weak) -> bool;

    /// Identity comparison, ignoring any `PartialEq` on the referent.
    fn ptr_eq(this: &Self, other: &Self) -> bool;

    /// Identity comparison between a weak observation and a strong pointer.
    fn weak_points_to(weak: &Self::Weak, this: &Self) -> bool;
}

impl<T: ?Sized> Shared for Rc<T> {
    type Weak = rc::Weak<T>;

    fn downgrade(this: &Self) -> Self::Weak {
        Rc::downgrade(this)
    }

    fn upgrade(weak: &Self::Weak) -> Option<Self> {
        weak.upgrade()
    }

    fn is_live(weak: &Self::Weak) -> bool {
        weak.strong_count() > 0
    }

    fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(this, other)
    }

    fn weak_points_to(weak: &Self::Weak, this: &Self) -> bool {
        weak.strong_count() > 0 && rc::Weak::ptr_eq(weak, &Rc::downgrade(this))
    }
}

impl<T: ?Sized> Shared for Arc<T> {
    type Weak = sync::Weak<T>;

    fn downgrade(this: &Self) -> Self::Weak {
        Arc::downgrade(this)
    }

    fn upgrade(weak: &Self::Weak) -> Option<Self> {
        weak.upgrade()
    }

    fn is_live(weak: &Self::Weak) -> bool {
        weak.strong_count() > 0
    }

    fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(this, other)
    }

    fn weak_points_to(weak: &Self::Weak, this: &Self) -> bool {
        weak.strong_count() > 0 && sync::Weak::ptr_eq(weak, &Arc::downgrade(this))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc_observation_does_not_own() {
        let strong = Rc::new(5);
        let weak = Shared::downgrade(&strong);
        assert!(<Rc<i32> as Shared>::is_live(&weak));
        assert_eq!(Rc::strong_count(&strong), 1);
        assert_eq!(<Rc<i32> as Shared>::upgrade(&weak).as_deref(), Some(&5));
        drop(strong);
        assert!(!<Rc<i32> as Shared>::is_live(&weak));
        assert!(<Rc<i32> as Shared>::upgrade(&weak).is_none());
    }

    #[test]
    fn test_arc_observation_does_not_own() {
        let strong = Arc::new(String::from("arc"));
        let weak = Shared::downgrade(&strong);
        assert!(<Arc<String> as Shared>::weak_points_to(&weak, &strong));
        assert!(!<Arc<String> as Shared>::weak_points_to(
            &weak,
            &Arc::new(String::from("arc"))
        ));
        drop(strong);
        assert!(<Arc<String> as Shared>::upgrade(&weak).is_none());
    }
}
