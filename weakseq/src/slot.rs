use std::fmt::{Debug, Display};

use serde::{Serialize, Serializer};

use crate::pointers::Shared;

/// A single non-owning observation of `P`'s referent, or no observation at all.
///
/// Slots are replaced wholesale, never re-pointed in place. Cloning a slot clones
/// only the weak handle, so the referent's strong count is never touched.
pub struct WeakSlot<P: Shared> {
    handle: Option<P::Weak>,
}

impl<P: Shared> WeakSlot<P> {
    pub fn new(value: Option<&P>) -> Self {
        WeakSlot {
            handle: value.map(P::downgrade),
        }
    }

    pub fn empty() -> Self {
        WeakSlot { handle: None }
    }

    /// The referent if it is still alive. Successive calls may disagree as
    /// owners elsewhere come and go.
    pub fn upgrade(&self) -> Option<P> {
        self.handle.as_ref().and_then(P::upgrade)
    }

    pub fn is_live(&self) -> bool {
        self.handle.as_ref().is_some_and(P::is_live)
    }

    /// True when the slot was created without a value, as opposed to having
    /// observed a value that has since expired.
    pub fn is_empty_handle(&self) -> bool {
        self.handle.is_none()
    }

    /// Identity check against a strong pointer. An expired slot points to nothing.
    pub fn points_to(&self, value: &P) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|weak| P::weak_points_to(weak, value))
    }
}

impl<P: Shared> Clone for WeakSlot<P> {
    fn clone(&self) -> Self {
        WeakSlot {
            handle: self.handle.clone(),
        }
    }
}

impl<P: Shared> Default for WeakSlot<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P: Shared> Debug for WeakSlot<P>
where
    P::Target: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upgrade() {
            Some(value) => Debug::fmt(&*value, f),
            None => f.write_str("none"),
        }
    }
}

impl<P: Shared> Display for WeakSlot<P>
where
    P::Target: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.upgrade() {
            Some(value) => Display::fmt(&*value, f),
            None => f.write_str("none"),
        }
    }
}

// no Deserialize: a weak slot can only be made from a live strong owner

impl<P: Shared> Serialize for WeakSlot<P>
where
    P::Target: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.upgrade() {
            Some(value) => serializer.serialize_some(&*value),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_slot_does_not_retain() {
        let value = Rc::new(String::from("held"));
        let slot = WeakSlot::new(Some(&value));
        assert_eq!(Rc::strong_count(&value), 1);
        assert_eq!(slot.upgrade().as_deref(), Some(&String::from("held")));
        assert!(slot.is_live());
        assert!(slot.points_to(&value));

        drop(value);
        assert!(slot.upgrade().is_none());
        assert!(!slot.is_live());
        assert!(!slot.is_empty_handle());
    }

    #[test]
    fn test_empty_slot() {
        let slot: WeakSlot<Rc<u32>> = WeakSlot::new(None);
        assert!(slot.is_empty_handle());
        assert!(slot.upgrade().is_none());
        assert!(!slot.points_to(&Rc::new(1)));
        assert_eq!(format!("{}", slot), "none");
        assert_eq!(format!("{:?}", slot), "none");
    }

    #[test]
    fn test_clone_shares_no_strong_count() {
        let value = Rc::new(7u32);
        let slot = WeakSlot::new(Some(&value));
        let copy = slot.clone();
        assert_eq!(Rc::strong_count(&value), 1);
        assert_eq!(Rc::weak_count(&value), 2);
        drop(value);
        assert!(slot.upgrade().is_none());
        assert!(copy.upgrade().is_none());
    }

    #[test]
    fn test_describe() {
        let value = Rc::new(42u32);
        let slot = WeakSlot::new(Some(&value));
        assert_eq!(slot.to_string(), "42");
        drop(value);
        assert_eq!(slot.to_string(), "none");
    }

    #[test]
    fn test_serialize() {
        let value = Rc::new(3u8);
        let slot = WeakSlot::new(Some(&value));
        assert_eq!(serde_json::to_string(&slot).unwrap(), "3");
        drop(value);
        assert_eq!(serde_json::to_string(&slot).unwrap(), "null");
    }
}
