use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, error, trace};

use super::{
    located, ActionTriggered, ContentHolder, ContentList, Food, FoodAxis, Mobility, ObjectContext,
    ObjectCore, ObjectKind, Processing, StationStatus, Toggleable, Transition, WorldObject,
};
use crate::{ContentError, Location, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ApplianceKind {
    Blender,
    Toaster,
    Pot,
    Pan,
}

impl ApplianceKind {
    pub const ALL: [ApplianceKind; 4] = [
        ApplianceKind::Blender,
        ApplianceKind::Toaster,
        ApplianceKind::Pot,
        ApplianceKind::Pan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ApplianceKind::Blender => "Blender",
            ApplianceKind::Toaster => "Toaster",
            ApplianceKind::Pot => "Pot",
            ApplianceKind::Pan => "Pan",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Food axis this appliance drives.
    pub fn axis(self) -> FoodAxis {
        match self {
            ApplianceKind::Blender => FoodAxis::Blend,
            ApplianceKind::Toaster => FoodAxis::Toast,
            ApplianceKind::Pot => FoodAxis::Boil,
            ApplianceKind::Pan => FoodAxis::Fry,
        }
    }

    pub fn capacity(self) -> usize {
        match self {
            ApplianceKind::Blender => 10,
            ApplianceKind::Toaster => 2,
            ApplianceKind::Pot | ApplianceKind::Pan => 1,
        }
    }
}

impl fmt::Display for ApplianceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Toggle-driven processing station.
///
/// Content is loaded while the appliance is off, the action switches it on,
/// and each tick advances every contained food along [`ApplianceKind::axis`].
/// Once all of them are terminal the appliance switches itself off and stays
/// unusable until new content arrives. A blender then replaces its content
/// with a single smoothie.
#[derive(Debug, Clone)]
pub struct Appliance {
    core: ObjectCore,
    kind: ApplianceKind,
    content: ContentList,
    on: bool,
    status: StationStatus,
    finished: bool,
}

impl Appliance {
    pub fn new(id: ObjectId, kind: ApplianceKind, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            kind,
            content: ContentList::new(kind.capacity()),
            on: false,
            status: StationStatus::NotUsable,
            finished: false,
        }
    }

    pub fn appliance_kind(&self) -> ApplianceKind {
        self.kind
    }

    fn finish(&mut self, ctx: &mut ObjectContext<'_>) -> Transition {
        self.on = false;
        self.status = StationStatus::NotUsable;
        self.finished = true;

        if self.kind != ApplianceKind::Blender {
            return Transition::none();
        }
        let removed = self.content.take_all();
        let smoothie = Food::blended(ctx.ids.next_id(), self.core.location);
        self.content.push(smoothie.id());
        debug!(blender = %self.core.id, blended = removed.len(), smoothie = %smoothie.id(), "blended");
        Transition {
            created: vec![Box::new(smoothie)],
            removed,
        }
    }
}

impl ContentHolder for Appliance {
    fn content(&self) -> &[ObjectId] {
        self.content.items()
    }

    fn max_content(&self) -> usize {
        self.content.max()
    }

    fn accepts(&self, candidate: &dyn WorldObject) -> bool {
        let axis = self.kind.axis();
        !self.on
            && self.content.has_room()
            && candidate
                .food()
                .is_some_and(|food| food.accepts_processing(axis))
    }

    fn add_content(&mut self, candidate: &mut dyn WorldObject) -> Result<(), ContentError> {
        if !self.accepts(candidate) {
            return Err(ContentError::Rejected {
                holder: ObjectKind::Appliance(self.kind),
                candidate: candidate.kind(),
            });
        }
        if let Some(food) = candidate.food_mut() {
            food.mark_ready(self.kind.axis());
        }
        self.content.push(candidate.id());
        self.status = StationStatus::Ready;
        self.finished = false;
        Ok(())
    }

    fn releases(&self) -> bool {
        !self.on
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        let removed = self.content.remove(id);
        if removed && self.content.is_empty() {
            self.status = StationStatus::NotUsable;
            self.finished = false;
        }
        removed
    }
}

impl Processing for Appliance {
    fn progress(&mut self, ctx: &mut ObjectContext<'_>) -> Result<Transition, ContentError> {
        if self.content.len() > self.content.max() {
            error!(
                appliance = %self.core.id,
                len = self.content.len(),
                max = self.content.max(),
                "appliance over capacity"
            );
            return Err(ContentError::CapacityExceeded {
                holder: ObjectKind::Appliance(self.kind),
                len: self.content.len(),
                max: self.content.max(),
            });
        }
        if self.content.is_empty() || !self.on {
            return Ok(Transition::none());
        }

        let axis = self.kind.axis();
        let mut all_terminal = true;
        for id in self.content.items() {
            let food = ctx
                .objects
                .get_mut(*id)
                .and_then(|obj| obj.food_mut())
                .ok_or(ContentError::MissingContent(*id))?;
            food.advance(axis, ctx.config.processing_ticks);
            trace!(appliance = %self.core.id, food = %id, progress = food.state().progress, "advanced");
            all_terminal &= food.is_terminal(axis);
        }

        if all_terminal {
            Ok(self.finish(ctx))
        } else {
            Ok(Transition::none())
        }
    }
}

impl Toggleable for Appliance {
    fn is_on(&self) -> bool {
        self.on
    }

    fn switch_toggle(&mut self) {
        self.on = !self.on;
    }
}

impl ActionTriggered for Appliance {
    fn status(&self) -> StationStatus {
        self.status
    }

    fn action(&mut self, _ctx: &mut ObjectContext<'_>) -> Result<Option<Transition>, ContentError> {
        if self.status != StationStatus::Ready {
            return Ok(None);
        }
        self.switch_toggle();
        debug!(appliance = %self.core.id, on = self.on, "toggled");
        Ok(Some(Transition::none()))
    }
}

impl WorldObject for Appliance {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Appliance(self.kind)
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

    fn processing(&self) -> Option<&dyn Processing> {
        Some(self)
    }

    fn processing_mut(&mut self) -> Option<&mut dyn Processing> {
        Some(self)
    }

    fn toggleable(&self) -> Option<&dyn Toggleable> {
        Some(self)
    }

    fn toggleable_mut(&mut self) -> Option<&mut dyn Toggleable> {
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
        located(self.core.location, &[1])
    }

    fn file_name(&self) -> String {
        let name = match (self.kind, self.on) {
            (ApplianceKind::Blender, true) => "blender_on",
            (ApplianceKind::Blender, false) => "blender3",
            (ApplianceKind::Toaster, true) => "toaster_on",
            (ApplianceKind::Toaster, false) if self.content.is_empty() => "toaster_off",
            (ApplianceKind::Toaster, false) if self.finished => "toaster_toasted_bread_2",
            (ApplianceKind::Toaster, false) => "toaster_fresh_bread_2",
            (ApplianceKind::Pot, true) => "Pot_on",
            (ApplianceKind::Pot, false) => "Pot",
            (ApplianceKind::Pan, true) => "Pan_on",
            (ApplianceKind::Pan, false) => "Pan",
        };
        name.to_string()
    }
}
