//! An ordered sequence that holds its elements by weak reference
//!
//! A `WeakSequence` never keeps its elements alive. Each position is a slot holding a weak handle to
//! an `Rc` or `Arc` owned somewhere else; once the last strong owner goes away, that slot reads as
//! `None` while still occupying its index. Indexing, splicing, insertion and removal work the way
//! they do on a `Vec`, and out-of-range indices panic the same way.
//!
//! Iterating a sequence yields only the elements that are alive when the cursor reaches them, so a
//! sequence of `len` slots can yield fewer than `len` items. Use `to_vec` or `range` to see absent
//! slots explicitly.
//!
//! The sequence is not synchronized. With `Arc` elements, a slot read as present was alive at the
//! instant of the read; keeping it alive afterwards is up to the strong pointer the read returns.

#[macro_use]
mod debug;

mod error;
mod iter;
mod pointers;
mod sequence;
mod slot;
pub use error::IndexError;
pub use iter::{IntoIter, Iter};
pub use pointers::Shared;
pub use sequence::{ArcWeakSequence, RcWeakSequence, WeakSequence};
pub use slot::WeakSlot;
