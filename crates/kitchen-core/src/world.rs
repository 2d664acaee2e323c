//! World grid, object registry and the per-tick driver.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{error, trace, warn};

use crate::objects::{
    refresh_free, AbsorbingDeliversquare, Appliance, Block, Counter, Cutboard,
    Deliversquare, Floor, Plate, Switch,
};
use crate::{
    ActionTriggered, Agent, AgentAction, AgentError, Capability, ContentError, Dispenser, Food,
    IdAllocator, Interaction, Location, ObjectContext, ObjectId, ObjectKind, ObjectStore,
    StateValue, StationStatus, Transition, WorldConfig, WorldError, WorldObject,
};

/// What one [`World::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Resolved action per agent, in resolution order.
    pub interactions: Vec<(ObjectId, Interaction)>,
    pub created: Vec<ObjectId>,
    pub removed: Vec<ObjectId>,
}

/// Grid of static stations, dynamic items and agents.
///
/// Each object's own location is authoritative; `cells` is a derived index
/// kept in step by every mutation that moves, adds or drops an object.
#[derive(Debug)]
pub struct World {
    pub(crate) config: WorldConfig,
    pub(crate) ids: IdAllocator,
    pub(crate) objects: ObjectStore,
    pub(crate) cells: BTreeMap<Location, BTreeSet<ObjectId>>,
    pub(crate) agents: Vec<ObjectId>,
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            ids: IdAllocator::new(),
            objects: ObjectStore::new(),
            cells: BTreeMap::new(),
            agents: Vec::new(),
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Drop every object and start a fresh id scope.
    pub fn reset(&mut self) {
        self.ids.reset();
        self.objects.clear();
        self.cells.clear();
        self.agents.clear();
    }

    pub fn next_id(&mut self) -> ObjectId {
        self.ids.next_id()
    }

    pub fn objects(&self) -> &ObjectStore {
        &self.objects
    }

    pub fn agents(&self) -> &[ObjectId] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Register an already constructed object.
    pub fn add_object(&mut self, object: Box<dyn WorldObject>) -> ObjectId {
        let location = object.location();
        let is_agent = object.as_agent().is_some();
        let id = self.objects.insert(object);
        self.index(id, location);
        if is_agent {
            self.agents.push(id);
        }
        id
    }

    /// Build an object with a fresh id and register it.
    pub fn spawn<T: WorldObject>(&mut self, build: impl FnOnce(ObjectId) -> T) -> ObjectId {
        let id = self.ids.next_id();
        self.add_object(Box::new(build(id)))
    }

    /// Construct and register any placeable kind, the level loader's entry point.
    pub fn place(&mut self, kind: ObjectKind, location: Location) -> Result<ObjectId, WorldError> {
        if !self.config.in_bounds(location) {
            return Err(WorldError::OutOfBounds(location));
        }
        let dwell = self.config.absorb_dwell_ticks;
        let object: Box<dyn WorldObject> = match kind {
            ObjectKind::Floor => Box::new(Floor::new(self.ids.peek(), location)),
            ObjectKind::Counter => Box::new(Counter::new(self.ids.peek(), location)),
            ObjectKind::Deliversquare => Box::new(Deliversquare::new(self.ids.peek(), location)),
            ObjectKind::AbsorbingDeliversquare => Box::new(AbsorbingDeliversquare::new(
                self.ids.peek(),
                location,
                dwell,
            )),
            ObjectKind::Switch => Box::new(Switch::new(self.ids.peek(), location)),
            ObjectKind::Block => Box::new(Block::new(self.ids.peek(), location)),
            ObjectKind::Cutboard => Box::new(Cutboard::new(self.ids.peek(), location)),
            ObjectKind::Appliance(appliance) => {
                Box::new(Appliance::new(self.ids.peek(), appliance, location))
            }
            ObjectKind::Plate => Box::new(Plate::new(self.ids.peek(), location)),
            ObjectKind::Food(food) => Box::new(Food::new(self.ids.peek(), food, location)?),
            ObjectKind::Dispenser(payload) => {
                Box::new(Dispenser::new(self.ids.peek(), payload, location)?)
            }
            ObjectKind::Agent => return Err(crate::ConstructionError::NotPlaceable(kind).into()),
        };
        // Only consume the id once construction succeeded.
        self.ids.next_id();
        let dynamic = object.has(Capability::Dynamic);
        let id = self.add_object(object);

        // Items placed on a station start out as its content when it takes them.
        if dynamic {
            if let Some(station) = self.static_at(location) {
                if let Err(err) = self.add_content(station, id) {
                    trace!(station = %station, object = %id, %err, "placed loose");
                }
            }
        }
        Ok(id)
    }

    pub fn add_agent(
        &mut self,
        location: Location,
        color: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<ObjectId, WorldError> {
        let arms = self.config.arms_per_agent;
        self.add_agent_with_arms(location, color, name, arms)
    }

    pub fn add_agent_with_arms(
        &mut self,
        location: Location,
        color: impl Into<String>,
        name: impl Into<String>,
        arms: usize,
    ) -> Result<ObjectId, WorldError> {
        if !self.config.in_bounds(location) {
            return Err(WorldError::OutOfBounds(location));
        }
        let id = self.spawn(|id| Agent::new(id, location, color, name, arms));
        self.enter_cell(id, location);
        Ok(id)
    }

    /// Unregister `id` alone, detaching it from its holder or arm.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<Box<dyn WorldObject>> {
        if let Some(holder) = self.container_of(id) {
            if let Some(content) = self
                .objects
                .get_mut(holder)
                .and_then(|obj| obj.content_holder_mut())
            {
                content.remove_content(id);
            }
            self.refresh_free(holder);
        }
        if let Some(agent) = self.holder_agent_of(id) {
            if let Some(holding) = self.objects.get_as_mut::<Agent>(agent) {
                if let Err(err) = holding.put_down(id, None) {
                    warn!(agent = %agent, object = %id, %err, "removed object left in arm");
                }
            }
        }
        if self.agents.contains(&id) {
            if let Some(location) = self.objects.get(id).map(|obj| obj.location()) {
                self.leave_cell(id, location);
            }
            self.agents.retain(|agent| *agent != id);
        }
        self.discard(id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&dyn WorldObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn WorldObject> {
        self.objects.get_mut(id)
    }

    pub fn get_as<T: WorldObject>(&self, id: ObjectId) -> Option<&T> {
        self.objects.get_as::<T>(id)
    }

    pub fn food(&self, id: ObjectId) -> Option<&Food> {
        self.objects.get(id)?.food()
    }

    pub fn food_mut(&mut self, id: ObjectId) -> Option<&mut Food> {
        self.objects.get_mut(id)?.food_mut()
    }

    pub fn agent(&self, id: ObjectId) -> Result<&Agent, WorldError> {
        self.objects
            .get_as::<Agent>(id)
            .ok_or(WorldError::UnknownAgent(id))
    }

    pub fn agent_mut(&mut self, id: ObjectId) -> Result<&mut Agent, WorldError> {
        self.objects
            .get_as_mut::<Agent>(id)
            .ok_or(WorldError::UnknownAgent(id))
    }

    /// Objects at `location` having `capability`, in creation order.
    pub fn get_objects_at(&self, location: Location, capability: Capability) -> Vec<ObjectId> {
        let Some(cell) = self.cells.get(&location) else {
            return Vec::new();
        };
        cell.iter()
            .copied()
            .filter(|id| self.objects.get(*id).is_some_and(|obj| obj.has(capability)))
            .collect()
    }

    /// The static station at `location`, preferring anything over bare floor.
    pub fn static_at(&self, location: Location) -> Option<ObjectId> {
        let statics = self.get_objects_at(location, Capability::Static);
        statics
            .iter()
            .copied()
            .find(|id| self.objects.get(*id).is_some_and(|obj| obj.kind() != ObjectKind::Floor))
            .or_else(|| statics.first().copied())
    }

    pub fn agent_at(&self, location: Location) -> Option<ObjectId> {
        self.get_objects_at(location, Capability::Agent).into_iter().next()
    }

    /// A cell is enterable when in bounds and its station (if any) is walkable.
    pub fn is_walkable(&self, location: Location) -> bool {
        if !self.config.in_bounds(location) {
            return false;
        }
        match self.static_at(location).and_then(|id| self.objects.get(id)) {
            Some(station) => station.is_walkable(),
            None => true,
        }
    }

    /// `id` followed by everything nested inside it.
    pub fn recursive_content(&self, id: ObjectId) -> Vec<ObjectId> {
        self.objects.recursive_content(id)
    }

    /// The content holder whose content list names `id`.
    pub fn container_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.objects
            .iter_ordered()
            .find(|(_, obj)| obj.content_ids().contains(&id))
            .map(|(holder, _)| holder)
    }

    /// The agent holding `id` in one of its arms.
    pub fn holder_agent_of(&self, id: ObjectId) -> Option<ObjectId> {
        self.agents
            .iter()
            .copied()
            .find(|agent| self.objects.get_as::<Agent>(*agent).is_some_and(|a| a.is_holding(id)))
    }

    /// Move `id` and everything nested in it to `location`.
    pub fn relocate(&mut self, id: ObjectId, location: Location) {
        for nested in self.objects.recursive_content(id) {
            let Some(obj) = self.objects.get_mut(nested) else {
                continue;
            };
            let from = obj.location();
            if from == location {
                continue;
            }
            obj.core_mut().location = location;
            self.unindex(nested, from);
            self.index(nested, location);
        }
    }

    /// Checked insertion of `obj` into `holder`.
    ///
    /// The object leaves its previous holder or arm, moves to the holder's
    /// cell and becomes the holder's only free content. On failure nothing
    /// changes.
    pub fn add_content(&mut self, holder: ObjectId, obj: ObjectId) -> Result<(), WorldError> {
        for id in [holder, obj] {
            if !self.objects.contains(id) {
                return Err(WorldError::UnknownObject(id));
            }
        }
        let previous = self.container_of(obj);
        let holding_agent = self.holder_agent_of(obj);
        {
            let (Some(target), Some(candidate)) = (self.objects.get(holder), self.objects.get(obj))
            else {
                return Err(ContentError::NotAContainer(holder).into());
            };
            let acceptor = target
                .content_holder()
                .ok_or(ContentError::NotAContainer(holder))?;
            if previous == Some(holder) || !acceptor.accepts(candidate) {
                return Err(ContentError::Rejected {
                    holder: target.kind(),
                    candidate: candidate.kind(),
                }
                .into());
            }
        }
        if let Some(previous) = previous {
            let releases = self
                .objects
                .get(previous)
                .and_then(|obj| obj.content_holder())
                .is_some_and(|content| content.releases());
            if !releases {
                return Err(ContentError::ReleaseRefused(previous).into());
            }
        }

        let Some((holder_obj, candidate)) = self.objects.get2_mut(holder, obj) else {
            return Err(ContentError::NotAContainer(holder).into());
        };
        let location = holder_obj.location();
        holder_obj
            .content_holder_mut()
            .ok_or(ContentError::NotAContainer(holder))?
            .add_content(candidate)?;

        if let Some(previous) = previous {
            if let Some(content) = self
                .objects
                .get_mut(previous)
                .and_then(|obj| obj.content_holder_mut())
            {
                content.remove_content(obj);
            }
            self.refresh_free(previous);
        }
        if let Some(agent) = holding_agent {
            self.agent_mut(agent)?.put_down(obj, None)?;
        }
        self.relocate(obj, location);
        self.refresh_free(holder);
        Ok(())
    }

    /// Take `obj` out of `holder` if the holder releases it.
    pub fn remove_content(&mut self, holder: ObjectId, obj: ObjectId) -> Result<(), WorldError> {
        let content = self
            .objects
            .get_mut(holder)
            .ok_or(WorldError::UnknownObject(holder))?
            .content_holder_mut()
            .ok_or(ContentError::NotAContainer(holder))?;
        if !content.content().contains(&obj) {
            return Err(ContentError::NotContained { holder, object: obj }.into());
        }
        if !content.releases() {
            return Err(ContentError::ReleaseRefused(holder).into());
        }
        content.remove_content(obj);
        self.refresh_free(holder);
        if let Some(released) = self.objects.get_mut(obj) {
            released.core_mut().free = true;
        }
        Ok(())
    }

    /// Register `block` as a subscriber of `switch`.
    pub fn link(&mut self, switch: ObjectId, block: ObjectId) -> Result<(), WorldError> {
        if self.objects.get(block).and_then(|obj| obj.linked()).is_none() {
            return Err(WorldError::NotLinkable(block));
        }
        self.objects
            .get_mut(switch)
            .and_then(|obj| obj.linked_mut())
            .ok_or(WorldError::NotLinkable(switch))?
            .link(block);
        Ok(())
    }

    /// Chop a food in place. On a ready cutboard this is the board's own
    /// action, which keeps every piece on the board. Elsewhere extra pieces
    /// join the food's holder when it accepts them and otherwise lie loose on
    /// its cell. Returns the ids of the extra pieces.
    pub fn chop(&mut self, food: ObjectId) -> Result<Vec<ObjectId>, WorldError> {
        let holder = self.container_of(food);
        if let Some(board) = holder {
            let ready = self
                .objects
                .get_as::<Cutboard>(board)
                .is_some_and(|board| board.status() == StationStatus::Ready);
            if ready {
                if let Some((created, _)) = self.run_action(board)? {
                    return Ok(created);
                }
            }
        }

        let extra = self
            .objects
            .get_mut(food)
            .ok_or(WorldError::UnknownObject(food))?
            .food_mut()
            .ok_or(WorldError::NoAction(food))?
            .chop(&mut self.ids)
            .unwrap_or_default();

        let mut created = Vec::with_capacity(extra.len());
        for piece in extra {
            let id = self.add_object(Box::new(piece));
            if let Some(holder) = holder {
                if let Err(err) = self.add_content(holder, id) {
                    trace!(holder = %holder, piece = %id, %err, "piece left loose");
                }
            }
            created.push(id);
        }
        Ok(created)
    }

    /// Force a food's axis value, as a scripted state change.
    pub fn set_food_state(&mut self, food: ObjectId, value: StateValue) -> Result<bool, WorldError> {
        Ok(self
            .food_mut(food)
            .ok_or(WorldError::UnknownObject(food))?
            .set_state(value))
    }

    /// Move `obj` into an arm of `agent`, taking it out of its holder first.
    pub fn grab(&mut self, agent: ObjectId, obj: ObjectId, arm: Option<usize>) -> Result<usize, WorldError> {
        if !self.objects.contains(obj) {
            return Err(WorldError::UnknownObject(obj));
        }
        let holder = self.container_of(obj);
        if let Some(holder) = holder {
            let releases = self
                .objects
                .get(holder)
                .and_then(|h| h.content_holder())
                .is_some_and(|h| h.releases());
            if !releases {
                return Err(ContentError::ReleaseRefused(holder).into());
            }
        }

        if let Some(other) = self.holder_agent_of(obj) {
            return Err(ContentError::ReleaseRefused(other).into());
        }

        let location = {
            let agent = self.agent_mut(agent)?;
            agent.grab(obj, arm)?;
            agent.location()
        };
        if let Some(holder) = holder {
            if let Err(err) = self.remove_content(holder, obj) {
                self.agent_mut(agent)?.put_down(obj, None)?;
                return Err(err);
            }
        }
        self.relocate(obj, location);
        if let Some(held) = self.objects.get_mut(obj) {
            held.core_mut().free = true;
        }
        self.agent(agent)?
            .arm_of(obj)
            .ok_or(WorldError::Agent(AgentError::NotHeld(obj)))
    }

    /// Release a held object into `holder`.
    ///
    /// `Ok(false)` when an explicit arm was given that does not hold `obj`.
    pub fn put_down(
        &mut self,
        agent: ObjectId,
        obj: ObjectId,
        arm: Option<usize>,
        holder: ObjectId,
    ) -> Result<bool, WorldError> {
        let idx = self
            .agent(agent)?
            .arm_of(obj)
            .ok_or(AgentError::NotHeld(obj))?;
        if arm.is_some_and(|arm| arm != idx) {
            return Ok(false);
        }
        // Clears the arm as part of the insertion.
        self.add_content(holder, obj)?;
        Ok(true)
    }

    /// Invoke `station`'s action. `Ok(None)` when it did not execute.
    pub fn run_action(
        &mut self,
        station: ObjectId,
    ) -> Result<Option<(Vec<ObjectId>, Vec<ObjectId>)>, WorldError> {
        let outcome = self.with_detached(station, |obj, ctx| match obj.action_triggered_mut() {
            Some(action) => action.action(ctx).map_err(WorldError::from),
            None => Err(WorldError::NoAction(station)),
        })??;
        Ok(outcome.map(|transition| self.apply_transition(station, transition)))
    }

    /// Run `f` on `id` taken out of the store, with the rest of the world as context.
    pub fn with_detached<R>(
        &mut self,
        id: ObjectId,
        f: impl FnOnce(&mut dyn WorldObject, &mut ObjectContext<'_>) -> R,
    ) -> Result<R, WorldError> {
        let mut object = self.objects.remove(id).ok_or(WorldError::UnknownObject(id))?;
        let result = {
            let mut ctx = ObjectContext {
                objects: &mut self.objects,
                ids: &mut self.ids,
                config: &self.config,
            };
            f(object.as_mut(), &mut ctx)
        };
        self.objects.insert(object);
        Ok(result)
    }

    /// Register created objects and drop removed ones after `holder` transitioned.
    pub fn apply_transition(
        &mut self,
        holder: ObjectId,
        transition: Transition,
    ) -> (Vec<ObjectId>, Vec<ObjectId>) {
        let Transition { created, removed } = transition;
        for id in &removed {
            self.agents.retain(|agent| agent != id);
            self.discard(*id);
        }
        let created: Vec<ObjectId> = created.into_iter().map(|obj| self.add_object(obj)).collect();
        self.refresh_free(holder);
        (created, removed)
    }

    /// Advance every processing object once, in creation order.
    pub fn progress_all(&mut self) -> (Vec<ObjectId>, Vec<ObjectId>) {
        let processing: Vec<ObjectId> = self
            .objects
            .iter_ordered()
            .filter(|(_, obj)| obj.has(Capability::Processing))
            .map(|(id, _)| id)
            .collect();

        let mut created = Vec::new();
        let mut removed = Vec::new();
        for id in processing {
            // Consumed earlier this pass.
            if !self.objects.contains(id) {
                continue;
            }
            let step = self.with_detached(id, |obj, ctx| match obj.processing_mut() {
                Some(processing) => processing.progress(ctx),
                None => Ok(Transition::none()),
            });
            match step {
                Ok(Ok(transition)) if transition.is_empty() => {}
                Ok(Ok(transition)) => {
                    trace!(object = %id, ?transition, "processing transition");
                    let (c, r) = self.apply_transition(id, transition);
                    created.extend(c);
                    removed.extend(r);
                }
                Ok(Err(err)) => error!(object = %id, %err, "processing failed"),
                Err(err) => error!(object = %id, %err, "processing object vanished"),
            }
        }
        (created, removed)
    }

    /// Let every linked static propagate its pending signal.
    pub fn process_linked_objects(&mut self) {
        let linked: Vec<ObjectId> = self
            .objects
            .iter_ordered()
            .filter(|(_, obj)| obj.has(Capability::Linked) && obj.has(Capability::Static))
            .map(|(id, _)| id)
            .collect();
        for id in linked {
            let result = self.with_detached(id, |obj, ctx| {
                if let Some(linked) = obj.linked_mut() {
                    linked.process_linked_objects(ctx);
                }
            });
            if let Err(err) = result {
                error!(object = %id, %err, "linked object vanished");
            }
        }
    }

    /// Items consumed by all absorbing delivery squares so far.
    pub fn delivered_total(&self) -> u32 {
        self.objects
            .iter_ordered()
            .filter_map(|(_, obj)| obj.as_any().downcast_ref::<AbsorbingDeliversquare>())
            .map(AbsorbingDeliversquare::delivered)
            .sum()
    }

    /// One full tick: agent actions in registration order, then processing,
    /// then linked-object propagation.
    ///
    /// An agent resolved later sees the effects of agents resolved earlier.
    pub fn tick(&mut self, actions: &[(ObjectId, AgentAction)]) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for (agent, _) in actions {
            if !self.agents.contains(agent) {
                warn!(agent = %agent, "action for unknown agent ignored");
            }
        }

        for agent in self.agents.clone() {
            let Some((_, action)) = actions.iter().find(|(id, _)| *id == agent) else {
                continue;
            };
            let interaction = self.resolve_action(agent, *action);
            if let Interaction::Executed { created, removed, .. } = &interaction {
                outcome.created.extend(created.iter().copied());
                outcome.removed.extend(removed.iter().copied());
            }
            outcome.interactions.push((agent, interaction));
        }

        let (created, removed) = self.progress_all();
        outcome.created.extend(created);
        outcome.removed.extend(removed);

        self.process_linked_objects();
        outcome
    }

    pub(crate) fn enter_cell(&mut self, agent: ObjectId, location: Location) {
        let Some(station) = self.static_at(location) else {
            return;
        };
        let admitted = self
            .objects
            .get_mut(station)
            .and_then(|obj| obj.content_holder_mut())
            .is_some_and(|holder| holder.admit_agent(agent));
        if !admitted {
            trace!(agent = %agent, station = %station, "station does not track agents");
        }
    }

    pub(crate) fn leave_cell(&mut self, agent: ObjectId, location: Location) {
        if let Some(holder) = self
            .static_at(location)
            .and_then(|station| self.objects.get_mut(station))
            .and_then(|obj| obj.content_holder_mut())
        {
            holder.remove_content(agent);
        }
    }

    fn refresh_free(&mut self, holder: ObjectId) {
        let content = match self.objects.get(holder) {
            Some(obj) => obj.content_ids().to_vec(),
            None => return,
        };
        refresh_free(&mut self.objects, &content);
    }

    fn discard(&mut self, id: ObjectId) -> Option<Box<dyn WorldObject>> {
        let object = self.objects.remove(id)?;
        self.unindex(id, object.location());
        Some(object)
    }

    fn index(&mut self, id: ObjectId, location: Location) {
        self.cells.entry(location).or_default().insert(id);
    }

    fn unindex(&mut self, id: ObjectId, location: Location) {
        if let Some(cell) = self.cells.get_mut(&location) {
            cell.remove(&id);
            if cell.is_empty() {
                self.cells.remove(&location);
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}
