//! Parametrized dispenser stations.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::objects::{
    located, ActionTriggered, ContentHolder, ContentList, Mobility, ObjectContext, ObjectCore,
    Plate, StationStatus, Transition,
};
use crate::{ConstructionError, ContentError, Food, FoodKind, Location, ObjectId, ObjectKind, WorldObject};

/// What a dispenser produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Payload {
    Plate,
    Food(FoodKind),
}

impl Payload {
    pub fn name(self) -> &'static str {
        match self {
            Payload::Plate => "Plate",
            Payload::Food(kind) => kind.name(),
        }
    }

    /// Dispensable payload named `name`.
    pub fn from_name(name: &str) -> Option<Self> {
        DISPENSER_TABLE
            .iter()
            .map(|(payload, _)| *payload)
            .find(|payload| payload.name() == name)
    }

    pub fn is_dispensable(self) -> bool {
        DISPENSER_TABLE.iter().any(|(payload, _)| *payload == self)
    }

    fn sprite(self) -> Option<&'static str> {
        DISPENSER_TABLE
            .iter()
            .find(|(payload, _)| *payload == self)
            .map(|(_, sprite)| *sprite)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dispensable payloads and their sprite names.
pub const DISPENSER_TABLE: [(Payload, &str); 13] = [
    (Payload::Plate, "DispenserPlate"),
    (Payload::Food(FoodKind::Apple), "DispenserApple"),
    (Payload::Food(FoodKind::Onion), "DispenserOnion"),
    (Payload::Food(FoodKind::Banana), "DispenserBanana"),
    (Payload::Food(FoodKind::Carrot), "DispenserCarrot"),
    (Payload::Food(FoodKind::Tomato), "DispenserTomato"),
    (Payload::Food(FoodKind::Lettuce), "DispenserLettuce"),
    (Payload::Food(FoodKind::Watermelon), "DispenserWatermelon"),
    (Payload::Food(FoodKind::Bread), "DispenserBread"),
    (Payload::Food(FoodKind::Pasta), "DispenserPenne"),
    (Payload::Food(FoodKind::Egg), "DispenserEgg"),
    (Payload::Food(FoodKind::Ice), "DispenserIce"),
    (Payload::Food(FoodKind::Strawberry), "DispenserStrawberry"),
];

/// Station that manufactures a fresh payload into its own content on action.
#[derive(Debug, Clone)]
pub struct Dispenser {
    core: ObjectCore,
    payload: Payload,
    content: ContentList,
}

impl Dispenser {
    pub fn new(id: ObjectId, payload: Payload, location: Location) -> Result<Self, ConstructionError> {
        if !payload.is_dispensable() {
            return Err(ConstructionError::NotPlaceable(ObjectKind::Dispenser(payload)));
        }
        Ok(Self {
            core: ObjectCore::new(id, location, false),
            payload,
            content: ContentList::new(1),
        })
    }

    pub fn payload(&self) -> Payload {
        self.payload
    }

    fn manufacture(&self, id: ObjectId) -> Result<Box<dyn WorldObject>, ConstructionError> {
        let location = self.core.location;
        Ok(match self.payload {
            Payload::Plate => Box::new(Plate::new(id, location)),
            Payload::Food(kind) => Box::new(Food::new(id, kind, location)?),
        })
    }
}

impl ContentHolder for Dispenser {
    fn content(&self) -> &[ObjectId] {
        self.content.items()
    }

    fn max_content(&self) -> usize {
        self.content.max()
    }

    fn accepts(&self, _candidate: &dyn WorldObject) -> bool {
        false
    }

    fn add_content(&mut self, candidate: &mut dyn WorldObject) -> Result<(), ContentError> {
        Err(ContentError::Rejected {
            holder: ObjectKind::Dispenser(self.payload),
            candidate: candidate.kind(),
        })
    }

    fn releases(&self) -> bool {
        true
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        self.content.remove(id)
    }
}

impl ActionTriggered for Dispenser {
    fn status(&self) -> StationStatus {
        if self.content.has_room() {
            StationStatus::Ready
        } else {
            StationStatus::NotUsable
        }
    }

    fn action(&mut self, ctx: &mut ObjectContext<'_>) -> Result<Option<Transition>, ContentError> {
        if !self.content.has_room() {
            return Ok(None);
        }
        let created = match self.manufacture(ctx.ids.next_id()) {
            Ok(created) => created,
            Err(err) => {
                warn!(dispenser = %self.core.id, %err, "dispense failed");
                return Ok(None);
            }
        };
        self.content.push(created.id());
        debug!(dispenser = %self.core.id, payload = %self.payload, object = %created.id(), "dispensed");
        Ok(Some(Transition {
            created: vec![created],
            removed: Vec::new(),
        }))
    }
}

impl WorldObject for Dispenser {
    crate::objects::object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Dispenser(self.payload)
    }

    fn mobility(&self) -> Mobility {
        Mobility::Static
    }

    fn content_holder(&self) -> Option<&dyn ContentHolder> {
        Some(self)
    }

    fn content_holder_mut(&mut self) -> Option<&mut dyn ContentHolder> {
        Some(self)
    }

    fn action_triggered(&self) -> Option<&dyn ActionTriggered> {
        Some(self)
    }

    fn action_triggered_mut(&mut self) -> Option<&mut dyn ActionTriggered> {
        Some(self)
    }

    fn numeric_state_representation(&self) -> Vec<i32> {
        vec![1]
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        located(self.core.location, &[i32::from(self.core.walkable), 1])
    }

    fn file_name(&self) -> String {
        match (self.content.is_empty(), self.payload.sprite()) {
            (true, Some(sprite)) => sprite.to_string(),
            _ => "Counter".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_table_payloads_are_dispensable() {
        assert_eq!(Payload::from_name("Pasta"), Some(Payload::Food(FoodKind::Pasta)));
        assert_eq!(Payload::from_name("Cucumber"), None);
        assert!(Dispenser::new(
            ObjectId(0),
            Payload::Food(FoodKind::Smoothie),
            Location::default()
        )
        .is_err());
    }

    #[test]
    fn sprite_switches_to_counter_when_full() {
        let dispenser =
            Dispenser::new(ObjectId(0), Payload::Food(FoodKind::Pasta), Location::default())
                .expect("pasta is dispensable");
        assert_eq!(dispenser.file_name(), "DispenserPenne");
    }
}
