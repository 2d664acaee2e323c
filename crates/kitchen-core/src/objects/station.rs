use tracing::{debug, info};

use super::{
    located, ActionTriggered, ContentHolder, ContentList, FoodAxis, Linked, Mobility,
    ObjectContext, ObjectCore, ObjectKind, Processing, StationStatus, Transition, WorldObject,
};
use crate::{ContentError, Location, ObjectId};

fn rejected(holder: ObjectKind, candidate: &dyn WorldObject) -> ContentError {
    ContentError::Rejected {
        holder,
        candidate: candidate.kind(),
    }
}

/// Walkable ground; holds the agent standing on it.
#[derive(Debug, Clone)]
pub struct Floor {
    core: ObjectCore,
    content: ContentList,
}

impl Floor {
    pub fn new(id: ObjectId, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, true),
            content: ContentList::new(1),
        }
    }
}

impl ContentHolder for Floor {
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
        Err(rejected(ObjectKind::Floor, candidate))
    }

    fn releases(&self) -> bool {
        true
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        self.content.remove(id)
    }

    fn admit_agent(&mut self, agent: ObjectId) -> bool {
        if !self.content.has_room() {
            return false;
        }
        self.content.push(agent);
        true
    }
}

impl WorldObject for Floor {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Floor
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

    fn numeric_state_representation(&self) -> Vec<i32> {
        vec![1]
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        Vec::new()
    }

    fn file_name(&self) -> String {
        "Floor".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct Counter {
    core: ObjectCore,
    content: ContentList,
}

impl Counter {
    pub fn new(id: ObjectId, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            content: ContentList::new(1),
        }
    }
}

impl ContentHolder for Counter {
    fn content(&self) -> &[ObjectId] {
        self.content.items()
    }

    fn max_content(&self) -> usize {
        self.content.max()
    }

    fn accepts(&self, candidate: &dyn WorldObject) -> bool {
        candidate.mobility() == Mobility::Dynamic && self.content.has_room()
    }

    fn add_content(&mut self, candidate: &mut dyn WorldObject) -> Result<(), ContentError> {
        if !self.accepts(candidate) {
            return Err(rejected(ObjectKind::Counter, candidate));
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

impl WorldObject for Counter {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Counter
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

    fn numeric_state_representation(&self) -> Vec<i32> {
        vec![1]
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        located(self.core.location, &[1])
    }

    fn file_name(&self) -> String {
        "Counter".to_string()
    }
}

/// Delivery target. Keeps whatever is placed on it.
#[derive(Debug, Clone)]
pub struct Deliversquare {
    core: ObjectCore,
    content: ContentList,
}

impl Deliversquare {
    pub fn new(id: ObjectId, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            content: ContentList::new(1),
        }
    }
}

impl ContentHolder for Deliversquare {
    fn content(&self) -> &[ObjectId] {
        self.content.items()
    }

    fn max_content(&self) -> usize {
        self.content.max()
    }

    fn accepts(&self, candidate: &dyn WorldObject) -> bool {
        candidate.mobility() == Mobility::Dynamic && self.content.has_room()
    }

    fn add_content(&mut self, candidate: &mut dyn WorldObject) -> Result<(), ContentError> {
        if !self.accepts(candidate) {
            return Err(rejected(ObjectKind::Deliversquare, candidate));
        }
        self.content.push(candidate.id());
        Ok(())
    }

    fn releases(&self) -> bool {
        false
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        self.content.remove(id)
    }
}

impl WorldObject for Deliversquare {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Deliversquare
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

    fn numeric_state_representation(&self) -> Vec<i32> {
        vec![1]
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        located(self.core.location, &[1])
    }

    fn file_name(&self) -> String {
        "DeliverySquare".to_string()
    }
}

/// Delivery sink: consumes an item and everything inside it after a dwell time.
#[derive(Debug, Clone)]
pub struct AbsorbingDeliversquare {
    core: ObjectCore,
    content: ContentList,
    dwell: u32,
    timer: u32,
    delivered: u32,
}

impl AbsorbingDeliversquare {
    pub fn new(id: ObjectId, location: Location, dwell: u32) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            content: ContentList::new(1),
            dwell,
            timer: dwell,
            delivered: 0,
        }
    }

    pub fn delivered(&self) -> u32 {
        self.delivered
    }
}

impl ContentHolder for AbsorbingDeliversquare {
    fn content(&self) -> &[ObjectId] {
        self.content.items()
    }

    fn max_content(&self) -> usize {
        self.content.max()
    }

    fn accepts(&self, candidate: &dyn WorldObject) -> bool {
        candidate.mobility() == Mobility::Dynamic && self.content.has_room()
    }

    fn add_content(&mut self, candidate: &mut dyn WorldObject) -> Result<(), ContentError> {
        if !self.accepts(candidate) {
            return Err(rejected(ObjectKind::AbsorbingDeliversquare, candidate));
        }
        self.content.push(candidate.id());
        Ok(())
    }

    fn releases(&self) -> bool {
        false
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        self.content.remove(id)
    }
}

impl Processing for AbsorbingDeliversquare {
    fn progress(&mut self, ctx: &mut ObjectContext<'_>) -> Result<Transition, ContentError> {
        if self.content.is_empty() {
            return Ok(Transition::none());
        }
        if self.timer > 0 {
            self.timer -= 1;
            return Ok(Transition::none());
        }

        self.timer = self.dwell;
        let mut removed = Vec::new();
        for id in self.content.take_all() {
            removed.extend(ctx.objects.recursive_content(id));
        }
        self.delivered += 1;
        info!(
            station = %self.core.id,
            absorbed = removed.len(),
            delivered = self.delivered,
            "delivery absorbed"
        );
        Ok(Transition {
            created: Vec::new(),
            removed,
        })
    }
}

impl WorldObject for AbsorbingDeliversquare {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::AbsorbingDeliversquare
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

    fn numeric_state_representation(&self) -> Vec<i32> {
        vec![1]
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        located(self.core.location, &[1])
    }

    fn file_name(&self) -> String {
        "DeliverySquare".to_string()
    }

    fn display_text(&self) -> String {
        self.delivered.to_string()
    }
}

/// Pressure plate. An agent stepping on flips it; linked blocks follow once
/// per tick.
#[derive(Debug, Clone)]
pub struct Switch {
    core: ObjectCore,
    content: ContentList,
    links: Vec<ObjectId>,
    active: bool,
    pressed: bool,
}

impl Switch {
    pub fn new(id: ObjectId, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, true),
            content: ContentList::new(1),
            links: Vec::new(),
            active: false,
            pressed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl ContentHolder for Switch {
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
        Err(rejected(ObjectKind::Switch, candidate))
    }

    fn releases(&self) -> bool {
        true
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        self.content.remove(id)
    }

    fn admit_agent(&mut self, agent: ObjectId) -> bool {
        if !self.content.has_room() {
            return false;
        }
        self.content.push(agent);
        self.active = !self.active;
        self.pressed = true;
        true
    }
}

impl Linked for Switch {
    fn link(&mut self, other: ObjectId) {
        if !self.links.contains(&other) {
            self.links.push(other);
        }
    }

    fn linked_objects(&self) -> &[ObjectId] {
        &self.links
    }

    fn process_linked_objects(&mut self, ctx: &mut ObjectContext<'_>) {
        if self.pressed {
            for id in &self.links {
                if let Some(linked) = ctx.objects.get_mut(*id).and_then(|obj| obj.linked_mut()) {
                    linked.switch_state();
                }
            }
            debug!(switch = %self.core.id, active = self.active, linked = self.links.len(), "switch propagated");
        }
        self.pressed = false;
    }
}

impl WorldObject for Switch {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Switch
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

    fn linked(&self) -> Option<&dyn Linked> {
        Some(self)
    }

    fn linked_mut(&mut self) -> Option<&mut dyn Linked> {
        Some(self)
    }

    fn numeric_state_representation(&self) -> Vec<i32> {
        vec![1]
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        located(self.core.location, &[i32::from(self.active), 1])
    }

    fn file_name(&self) -> String {
        let name = if self.active { "SwitchOn" } else { "SwitchOff" };
        name.to_string()
    }
}

/// Wall segment whose walkability a linked switch flips.
#[derive(Debug, Clone)]
pub struct Block {
    core: ObjectCore,
    content: ContentList,
    links: Vec<ObjectId>,
}

impl Block {
    pub fn new(id: ObjectId, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            content: ContentList::new(1),
            links: Vec::new(),
        }
    }
}

impl ContentHolder for Block {
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
        Err(rejected(ObjectKind::Block, candidate))
    }

    fn releases(&self) -> bool {
        true
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        self.content.remove(id)
    }

    fn admit_agent(&mut self, agent: ObjectId) -> bool {
        if !self.content.has_room() {
            return false;
        }
        self.content.push(agent);
        true
    }
}

impl Linked for Block {
    fn link(&mut self, other: ObjectId) {
        if !self.links.contains(&other) {
            self.links.push(other);
        }
    }

    fn linked_objects(&self) -> &[ObjectId] {
        &self.links
    }

    fn switch_state(&mut self) {
        self.core.walkable = !self.core.walkable;
    }
}

impl WorldObject for Block {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Block
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

    fn linked(&self) -> Option<&dyn Linked> {
        Some(self)
    }

    fn linked_mut(&mut self) -> Option<&mut dyn Linked> {
        Some(self)
    }

    fn numeric_state_representation(&self) -> Vec<i32> {
        vec![1]
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        located(self.core.location, &[i32::from(self.core.walkable), 1])
    }

    fn file_name(&self) -> String {
        let name = if self.core.walkable { "Floor" } else { "BlockActive" };
        name.to_string()
    }
}

/// Chopping station. Takes one fresh choppable item; the action cuts it.
///
/// Capacity is two so a chopped bread's second slice fits next to the first.
#[derive(Debug, Clone)]
pub struct Cutboard {
    core: ObjectCore,
    content: ContentList,
    status: StationStatus,
}

impl Cutboard {
    pub fn new(id: ObjectId, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            content: ContentList::new(2),
            status: StationStatus::NotUsable,
        }
    }
}

impl ContentHolder for Cutboard {
    fn content(&self) -> &[ObjectId] {
        self.content.items()
    }

    fn max_content(&self) -> usize {
        self.content.max()
    }

    fn accepts(&self, candidate: &dyn WorldObject) -> bool {
        self.content.is_empty()
            && candidate
                .food()
                .is_some_and(|food| food.accepts_processing(FoodAxis::Chop))
    }

    fn add_content(&mut self, candidate: &mut dyn WorldObject) -> Result<(), ContentError> {
        if !self.accepts(candidate) {
            return Err(rejected(ObjectKind::Cutboard, candidate));
        }
        self.content.push(candidate.id());
        self.status = StationStatus::Ready;
        Ok(())
    }

    fn releases(&self) -> bool {
        true
    }

    fn remove_content(&mut self, id: ObjectId) -> bool {
        let removed = self.content.remove(id);
        if removed && self.content.is_empty() {
            self.status = StationStatus::NotUsable;
        }
        removed
    }
}

impl ActionTriggered for Cutboard {
    fn status(&self) -> StationStatus {
        self.status
    }

    fn action(&mut self, ctx: &mut ObjectContext<'_>) -> Result<Option<Transition>, ContentError> {
        if self.status != StationStatus::Ready {
            return Ok(None);
        }

        for id in self.content.items().to_vec() {
            let food = ctx
                .objects
                .get_mut(id)
                .ok_or(ContentError::MissingContent(id))?
                .food_mut();
            let Some(food) = food else {
                return Ok(None);
            };
            let Some(extra) = food.chop(ctx.ids) else {
                continue;
            };

            let mut created: Vec<Box<dyn WorldObject>> = Vec::with_capacity(extra.len());
            for slice in extra {
                self.content.push(slice.id());
                created.push(Box::new(slice));
            }
            self.status = StationStatus::NotUsable;
            debug!(cutboard = %self.core.id, food = %id, extra = created.len(), "chopped");
            return Ok(Some(Transition {
                created,
                removed: Vec::new(),
            }));
        }
        Ok(None)
    }
}

impl WorldObject for Cutboard {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Cutboard
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
        located(self.core.location, &[1])
    }

    fn file_name(&self) -> String {
        "cutboard".to_string()
    }
}
