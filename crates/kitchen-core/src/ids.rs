use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identity of a world object.
///
/// Ids are handed out by an [`IdAllocator`] in strictly increasing order and
/// are never reused within one world, so ascending id order is creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ObjectId(pub u64);

impl ObjectId {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source, owned by a world and reset with it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next += 1;
        id
    }

    /// The id the next call to [`IdAllocator::next_id`] will return.
    pub fn peek(&self) -> ObjectId {
        ObjectId(self.next)
    }

    /// Start a new id scope (episode boundary).
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic_until_reset() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_id(), ObjectId(0));
        assert_eq!(ids.next_id(), ObjectId(1));
        assert_eq!(ids.peek(), ObjectId(2));

        ids.reset();
        assert_eq!(ids.next_id(), ObjectId(0));
    }
}
