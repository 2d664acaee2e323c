use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{ContentError, IdAllocator, ObjectId, ObjectStore, WorldConfig, WorldObject};

/// Mutable view of the rest of the world handed to a detached object while
/// it processes or runs its action.
pub struct ObjectContext<'a> {
    pub objects: &'a mut ObjectStore,
    pub ids: &'a mut IdAllocator,
    pub config: &'a WorldConfig,
}

/// Objects a processing step or action brought into and out of existence.
///
/// `created` objects are already referenced from the acting object's content
/// and still need to be registered with the world; `removed` ids must be
/// dropped from it.
#[derive(Default)]
pub struct Transition {
    pub created: Vec<Box<dyn WorldObject>>,
    pub removed: Vec<ObjectId>,
}

impl Transition {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty()
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let created: Vec<ObjectId> = self.created.iter().map(|obj| obj.id()).collect();
        f.debug_struct("Transition")
            .field("created", &created)
            .field("removed", &self.removed)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum StationStatus {
    Ready,
    #[default]
    NotUsable,
}

/// Ordered, bounded list of contained object ids. The last entry is the tip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentList {
    items: Vec<ObjectId>,
    max: usize,
}

impl ContentList {
    pub fn new(max: usize) -> Self {
        Self {
            items: Vec::new(),
            max,
        }
    }

    pub fn items(&self) -> &[ObjectId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn has_room(&self) -> bool {
        self.items.len() < self.max
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.items.contains(&id)
    }

    pub fn push(&mut self, id: ObjectId) {
        self.items.push(id);
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        match self.items.iter().position(|item| *item == id) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn take_all(&mut self) -> Vec<ObjectId> {
        std::mem::take(&mut self.items)
    }
}

/// An object that may contain other objects.
pub trait ContentHolder {
    fn content(&self) -> &[ObjectId];

    fn max_content(&self) -> usize;

    fn accepts(&self, candidate: &dyn WorldObject) -> bool;

    /// Insert `candidate`. Fails without mutating anything when
    /// [`ContentHolder::accepts`] is false. The caller relocates the candidate
    /// and refreshes free flags.
    fn add_content(&mut self, candidate: &mut dyn WorldObject) -> Result<(), ContentError>;

    /// Whether current content may be taken out.
    fn releases(&self) -> bool;

    /// Drop `id` from the content list, updating station status.
    fn remove_content(&mut self, id: ObjectId) -> bool;

    /// Record an agent standing on this holder. Only walkable stations take agents.
    fn admit_agent(&mut self, _agent: ObjectId) -> bool {
        false
    }
}

/// An object advanced once per tick.
pub trait Processing {
    fn progress(&mut self, ctx: &mut ObjectContext<'_>) -> Result<Transition, ContentError>;
}

pub trait Toggleable {
    fn is_on(&self) -> bool;
    fn switch_toggle(&mut self);
}

/// A station with an explicit agent-invoked action.
pub trait ActionTriggered {
    fn status(&self) -> StationStatus;

    /// `Ok(None)` when the action was not executed.
    fn action(&mut self, ctx: &mut ObjectContext<'_>) -> Result<Option<Transition>, ContentError>;
}

/// Switch to subscriber relationship.
pub trait Linked {
    fn link(&mut self, other: ObjectId);

    fn linked_objects(&self) -> &[ObjectId];

    /// Propagate a pending signal to linked objects. Runs once per tick.
    fn process_linked_objects(&mut self, _ctx: &mut ObjectContext<'_>) {}

    /// React to a signal from a linked object.
    fn switch_state(&mut self) {}
}

/// Free flag bookkeeping: only the last dynamic entry of `content` is free.
pub(crate) fn refresh_free(objects: &mut ObjectStore, content: &[ObjectId]) {
    let tip = content
        .iter()
        .rev()
        .copied()
        .find(|id| objects.get(*id).is_some_and(|obj| obj.as_agent().is_none()));
    for id in content {
        if let Some(obj) = objects.get_mut(*id) {
            if obj.as_agent().is_none() {
                obj.core_mut().free = Some(*id) == tip;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_list_respects_capacity() {
        let mut list = ContentList::new(2);
        assert!(list.has_room());
        list.push(ObjectId(1));
        list.push(ObjectId(2));
        assert!(!list.has_room());
        assert!(list.remove(ObjectId(1)));
        assert!(!list.remove(ObjectId(1)));
        assert_eq!(list.items(), &[ObjectId(2)]);
    }
}
