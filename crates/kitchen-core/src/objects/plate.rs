use super::{located, ContentHolder, ContentList, Mobility, ObjectCore, ObjectKind, WorldObject};
use crate::{ContentError, Location, ObjectId};

/// Dynamic holder for finished food. Content travels with the plate.
#[derive(Debug, Clone)]
pub struct Plate {
    core: ObjectCore,
    content: ContentList,
}

impl Plate {
    pub const CAPACITY: usize = 64;

    pub fn new(id: ObjectId, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            content: ContentList::new(Self::CAPACITY),
        }
    }
}

impl ContentHolder for Plate {
    fn content(&self) -> &[ObjectId] {
        self.content.items()
    }

    fn max_content(&self) -> usize {
        self.content.max()
    }

    fn accepts(&self, candidate: &dyn WorldObject) -> bool {
        self.content.has_room() && candidate.food().is_some_and(|food| food.done())
    }

    fn add_content(&mut self, candidate: &mut dyn WorldObject) -> Result<(), ContentError> {
        if !self.accepts(candidate) {
            return Err(ContentError::Rejected {
                holder: ObjectKind::Plate,
                candidate: candidate.kind(),
            });
        }
        self.content.push(candidate.id());
        Ok(())
    }

    fn releases(&self) -> bool {
        true
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        self.content.remove(id)
    }
}

impl WorldObject for Plate {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Plate
    }

    fn mobility(&self) -> Mobility {
        Mobility::Dynamic
    }

    fn content_holder(&self) -> Option<&dyn ContentHolder> {
        Some(self)
    }

    fn content_holder_mut(&mut self) -> Option<&mut dyn ContentHolder> {
        Some(self)
    }

    fn numeric_state_representation(&self) -> Vec<i32> {
        vec![1]
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        located(self.core.location, &[1])
    }

    fn file_name(&self) -> String {
        "Plate".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Food, FoodKind};

    #[test]
    fn plate_takes_only_finished_food() {
        let mut plate = Plate::new(ObjectId(0), Location::new(0, 0));
        let mut ids = crate::IdAllocator::starting_at(1);
        let mut onion = Food::new(ids.next_id(), FoodKind::Onion, Location::new(0, 0))
            .expect("onion is placeable");

        assert!(!plate.accepts(&onion));
        assert!(plate.add_content(&mut onion).is_err());
        assert!(plate.content().is_empty());

        onion.chop(&mut ids);
        plate.add_content(&mut onion).expect("chopped onion fits");
        assert_eq!(plate.content(), &[onion.id()]);
    }
}
