use std::collections::BTreeMap;

use crate::{ObjectId, WorldObject};

/// Deterministic registry of world objects keyed by id.
///
/// - Stable iteration order: ascending id, which is creation order.
/// - Ids are never reused, so a stale id simply misses.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: BTreeMap<ObjectId, Box<dyn WorldObject>>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: Box<dyn WorldObject>) -> ObjectId {
        let id = object.id();
        let previous = self.objects.insert(id, object);
        debug_assert!(previous.is_none(), "object id {id} inserted twice");
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&dyn WorldObject> {
        self.objects.get(&id).map(|obj| obj.as_ref())
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn WorldObject> {
        match self.objects.get_mut(&id) {
            Some(obj) => Some(obj.as_mut()),
            None => None,
        }
    }

    pub fn get_as<T: WorldObject>(&self, id: ObjectId) -> Option<&T> {
        self.get(id)?.as_any().downcast_ref::<T>()
    }

    pub fn get_as_mut<T: WorldObject>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Box<dyn WorldObject>> {
        self.objects.remove(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Mutable access to two distinct objects at once.
    pub fn get2_mut(
        &mut self,
        a: ObjectId,
        b: ObjectId,
    ) -> Option<(&mut dyn WorldObject, &mut dyn WorldObject)> {
        if a == b {
            return None;
        }

        let mut first = None;
        let mut second = None;
        for (id, obj) in self.objects.iter_mut() {
            if *id == a {
                first = Some(obj.as_mut());
            } else if *id == b {
                second = Some(obj.as_mut());
            }
            if first.is_some() && second.is_some() {
                break;
            }
        }

        Some((first?, second?))
    }

    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.objects.keys().copied()
    }

    pub fn iter_ordered(&self) -> impl Iterator<Item = (ObjectId, &dyn WorldObject)> {
        self.objects.iter().map(|(id, obj)| (*id, obj.as_ref()))
    }

    /// `id` followed by everything nested inside it, depth first.
    ///
    /// Held objects of an agent count as nested. Ids missing from the store
    /// are still reported so callers can detect dangling references.
    pub fn recursive_content(&self, id: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            if let Some(obj) = self.get(next) {
                let mut children = obj.nested_ids();
                children.reverse();
                stack.extend(children);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{objects::Counter, Location};

    fn counter(id: u64) -> Box<dyn WorldObject> {
        Box::new(Counter::new(ObjectId(id), Location::new(0, id as i32)))
    }

    #[test]
    fn get2_mut_returns_both_in_argument_order() {
        let mut store = ObjectStore::new();
        store.insert(counter(3));
        store.insert(counter(7));

        let (a, b) = store.get2_mut(ObjectId(7), ObjectId(3)).expect("both present");
        assert_eq!(a.id(), ObjectId(7));
        assert_eq!(b.id(), ObjectId(3));

        assert!(store.get2_mut(ObjectId(3), ObjectId(3)).is_none());
        assert!(store.get2_mut(ObjectId(3), ObjectId(99)).is_none());
    }

    #[test]
    fn iteration_follows_creation_order() {
        let mut store = ObjectStore::new();
        store.insert(counter(5));
        store.insert(counter(1));
        store.insert(counter(3));

        let ids: Vec<_> = store.ids().map(ObjectId::raw).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }
}
