//! Object model: the entity trait, capability interfaces and the concrete
//! station, plate and food types.

use core::fmt;
use std::any::Any;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Agent, ConstructionError, Location, ObjectId, Payload};

macro_rules! object_basics {
    () => {
        fn core(&self) -> &$crate::objects::ObjectCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut $crate::objects::ObjectCore {
            &mut self.core
        }

        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}

pub(crate) use object_basics;

mod appliance;
mod capability;
mod food;
mod plate;
mod station;

pub use appliance::{Appliance, ApplianceKind};
pub(crate) use capability::refresh_free;
pub use capability::{
    ActionTriggered, ContentHolder, ContentList, Linked, ObjectContext, Processing,
    StationStatus, Toggleable, Transition,
};
pub use food::{
    BlendState, BoilState, ChopState, Food, FoodAxis, FoodKind, FoodState, FryState, StateValue,
    ToastState,
};
pub use plate::Plate;
pub use station::{AbsorbingDeliversquare, Block, Counter, Cutboard, Deliversquare, Floor, Switch};

/// Attributes shared by every world object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCore {
    pub id: ObjectId,
    pub location: Location,
    pub walkable: bool,
    /// True iff the object is the liftable tip of its holder (or held alone in an arm).
    pub free: bool,
}

impl ObjectCore {
    pub fn new(id: ObjectId, location: Location, walkable: bool) -> Self {
        Self {
            id,
            location,
            walkable,
            free: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mobility {
    /// Fixed station occupying one cell.
    Static,
    /// Movable item, carried or placed.
    Dynamic,
    /// Acting entity; neither static nor dynamic.
    Agent,
}

/// Capability filter for [`crate::World::get_objects_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Static,
    Dynamic,
    Agent,
    ContentHolder,
    Processing,
    Toggleable,
    ActionTriggered,
    Linked,
    Food,
}

/// Base entity of the simulation.
///
/// Concrete types opt into capabilities by overriding the accessor pairs
/// below; callers dispatch on which accessors return `Some`.
pub trait WorldObject: Any + fmt::Debug {
    fn core(&self) -> &ObjectCore;
    fn core_mut(&mut self) -> &mut ObjectCore;
    fn kind(&self) -> ObjectKind;
    fn mobility(&self) -> Mobility;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn content_holder(&self) -> Option<&dyn ContentHolder> {
        None
    }
    fn content_holder_mut(&mut self) -> Option<&mut dyn ContentHolder> {
        None
    }
    fn processing(&self) -> Option<&dyn Processing> {
        None
    }
    fn processing_mut(&mut self) -> Option<&mut dyn Processing> {
        None
    }
    fn toggleable(&self) -> Option<&dyn Toggleable> {
        None
    }
    fn toggleable_mut(&mut self) -> Option<&mut dyn Toggleable> {
        None
    }
    fn action_triggered(&self) -> Option<&dyn ActionTriggered> {
        None
    }
    fn action_triggered_mut(&mut self) -> Option<&mut dyn ActionTriggered> {
        None
    }
    fn linked(&self) -> Option<&dyn Linked> {
        None
    }
    fn linked_mut(&mut self) -> Option<&mut dyn Linked> {
        None
    }
    fn food(&self) -> Option<&Food> {
        None
    }
    fn food_mut(&mut self) -> Option<&mut Food> {
        None
    }
    fn held_ids(&self) -> Vec<ObjectId> {
        Vec::new()
    }

    fn numeric_state_representation(&self) -> Vec<i32>;
    fn feature_vector_representation(&self) -> Vec<i32>;
    fn file_name(&self) -> String;

    fn icons(&self) -> Vec<String> {
        Vec::new()
    }

    fn display_text(&self) -> String {
        String::new()
    }

    fn state_length(&self) -> usize {
        self.kind().state_length()
    }

    fn feature_vector_length(&self) -> usize {
        self.kind().feature_vector_length()
    }

    fn id(&self) -> ObjectId {
        self.core().id
    }

    fn location(&self) -> Location {
        self.core().location
    }

    fn is_free(&self) -> bool {
        self.core().free
    }

    fn is_walkable(&self) -> bool {
        self.core().walkable
    }

    fn content_ids(&self) -> &[ObjectId] {
        match self.content_holder() {
            Some(holder) => holder.content(),
            None => &[],
        }
    }

    /// Direct content followed by held objects.
    fn nested_ids(&self) -> Vec<ObjectId> {
        let mut out = self.content_ids().to_vec();
        out.extend(self.held_ids());
        out
    }

    fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Static => self.mobility() == Mobility::Static,
            Capability::Dynamic => self.mobility() == Mobility::Dynamic,
            Capability::Agent => self.mobility() == Mobility::Agent,
            Capability::ContentHolder => self.content_holder().is_some(),
            Capability::Processing => self.processing().is_some(),
            Capability::Toggleable => self.toggleable().is_some(),
            Capability::ActionTriggered => self.action_triggered().is_some(),
            Capability::Linked => self.linked().is_some(),
            Capability::Food => self.food().is_some(),
        }
    }

    fn as_agent(&self) -> Option<&Agent> {
        self.as_any().downcast_ref::<Agent>()
    }
}

/// Concrete type tag; recipe nodes match on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", try_from = "String"))]
pub enum ObjectKind {
    Floor,
    Counter,
    Deliversquare,
    AbsorbingDeliversquare,
    Switch,
    Block,
    Cutboard,
    Appliance(ApplianceKind),
    Plate,
    Food(FoodKind),
    Dispenser(Payload),
    Agent,
}

impl ObjectKind {
    pub fn state_length(self) -> usize {
        match self {
            ObjectKind::Food(food) => food.state_length(),
            ObjectKind::Agent => 5,
            _ => 1,
        }
    }

    pub fn feature_vector_length(self) -> usize {
        match self {
            ObjectKind::Floor => 0,
            ObjectKind::Switch | ObjectKind::Block | ObjectKind::Dispenser(_) => 4,
            ObjectKind::Food(food) => food.feature_vector_length(),
            ObjectKind::Agent => 7,
            _ => 3,
        }
    }

    pub fn mobility(self) -> Mobility {
        match self {
            ObjectKind::Plate | ObjectKind::Food(_) => Mobility::Dynamic,
            ObjectKind::Agent => Mobility::Agent,
            _ => Mobility::Static,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Floor => f.write_str("Floor"),
            ObjectKind::Counter => f.write_str("Counter"),
            ObjectKind::Deliversquare => f.write_str("Deliversquare"),
            ObjectKind::AbsorbingDeliversquare => f.write_str("AbsorbingDeliversquare"),
            ObjectKind::Switch => f.write_str("Switch"),
            ObjectKind::Block => f.write_str("Block"),
            ObjectKind::Cutboard => f.write_str("Cutboard"),
            ObjectKind::Appliance(kind) => f.write_str(kind.name()),
            ObjectKind::Plate => f.write_str("Plate"),
            ObjectKind::Food(kind) => f.write_str(kind.name()),
            ObjectKind::Dispenser(payload) => write!(f, "{}Dispenser", payload.name()),
            ObjectKind::Agent => f.write_str("Agent"),
        }
    }
}

impl FromStr for ObjectKind {
    type Err = ConstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s {
            "Floor" => ObjectKind::Floor,
            "Counter" => ObjectKind::Counter,
            "Deliversquare" => ObjectKind::Deliversquare,
            "AbsorbingDeliversquare" => ObjectKind::AbsorbingDeliversquare,
            "Switch" => ObjectKind::Switch,
            "Block" => ObjectKind::Block,
            "Cutboard" => ObjectKind::Cutboard,
            "Plate" => ObjectKind::Plate,
            "Agent" => ObjectKind::Agent,
            other => {
                if let Some(appliance) = ApplianceKind::from_name(other) {
                    ObjectKind::Appliance(appliance)
                } else if let Some(food) = FoodKind::from_name(other) {
                    ObjectKind::Food(food)
                } else if let Some(payload) =
                    other.strip_suffix("Dispenser").and_then(Payload::from_name)
                {
                    ObjectKind::Dispenser(payload)
                } else {
                    return Err(ConstructionError::UnknownKind(other.to_string()));
                }
            }
        };
        Ok(kind)
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        kind.to_string()
    }
}

impl TryFrom<String> for ObjectKind {
    type Error = ConstructionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// `[row, col]` followed by `tail`.
pub(crate) fn located(location: Location, tail: &[i32]) -> Vec<i32> {
    let mut out = location.features().to_vec();
    out.extend_from_slice(tail);
    out
}
