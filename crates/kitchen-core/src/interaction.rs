//! Interaction resolver: turns one agent action into a definite outcome.

use tracing::{debug, warn};

use crate::{
    AgentAction, Capability, Direction, Interaction, Location, ObjectId, World, WorldError,
    WorldObject,
};

impl World {
    /// The cell an agent faces.
    pub fn target_location(&self, agent: ObjectId) -> Result<Location, WorldError> {
        let agent = self.agent(agent)?;
        Ok(agent.location().offset(agent.orientation()))
    }

    /// Resolve `action` for `agent`. Local failures are logged and become
    /// [`Interaction::NoOp`]; the resolver never aborts a tick.
    pub fn resolve_action(&mut self, agent: ObjectId, action: AgentAction) -> Interaction {
        let result = match action {
            AgentAction::NoOp => Ok(Interaction::NoOp),
            AgentAction::Move { direction } => self.move_agent(agent, direction),
            AgentAction::Turn { direction } => self.turn_agent(agent, direction),
            AgentAction::Interact { arm } => self.interact(agent, arm),
            AgentAction::Execute { arm } => self.execute(agent, arm),
        };
        match result {
            Ok(interaction) => {
                debug!(agent = %agent, ?action, ?interaction, "resolved");
                interaction
            }
            Err(err) => {
                warn!(agent = %agent, ?action, %err, "action rejected");
                Interaction::NoOp
            }
        }
    }

    fn turn_agent(&mut self, agent: ObjectId, direction: Direction) -> Result<Interaction, WorldError> {
        self.agent_mut(agent)?.set_orientation(direction);
        Ok(Interaction::Turned {
            orientation: direction,
        })
    }

    fn move_agent(&mut self, agent: ObjectId, direction: Direction) -> Result<Interaction, WorldError> {
        let turned = self.turn_agent(agent, direction)?;
        let from = self.agent(agent)?.location();
        let to = from.offset(direction);
        if !self.is_walkable(to) || self.agent_at(to).is_some() {
            return Ok(turned);
        }

        self.leave_cell(agent, from);
        self.relocate(agent, to);
        self.enter_cell(agent, to);
        Ok(Interaction::Moved { to })
    }

    /// Primary interaction at the facing cell: merge or drop what is held,
    /// otherwise grab, otherwise trigger the station.
    fn interact(&mut self, agent: ObjectId, arm: Option<usize>) -> Result<Interaction, WorldError> {
        let target = self.target_location(agent)?;
        if self.agent_at(target).is_some() {
            return Ok(Interaction::NoOp);
        }
        let station = self.static_at(target);
        let dynamics = self.get_objects_at(target, Capability::Dynamic);

        let (holding, has_free) = {
            let agent = self.agent(agent)?;
            (!agent.holding_empty(arm), agent.holding_has_free(arm))
        };

        if holding {
            if let Some(merged) = self.attempt_merge(agent, &dynamics, target, station, arm)? {
                return Ok(merged);
            }
        }

        if has_free {
            if let Some(object) = self.liftable(&dynamics, station).first().copied() {
                let arm = self.grab(agent, object, arm)?;
                return Ok(Interaction::Grabbed { object, arm });
            }
        }

        if holding {
            if let Some(station) = station.filter(|id| self.has(*id, Capability::ActionTriggered)) {
                return self.execute_station(station);
            }
        }
        Ok(Interaction::NoOp)
    }

    /// Secondary interaction: trigger the facing station when an arm is free.
    fn execute(&mut self, agent: ObjectId, arm: Option<usize>) -> Result<Interaction, WorldError> {
        let target = self.target_location(agent)?;
        if self.agent_at(target).is_some() || !self.agent(agent)?.holding_has_free(arm) {
            return Ok(Interaction::NoOp);
        }
        match self
            .static_at(target)
            .filter(|id| self.has(*id, Capability::ActionTriggered))
        {
            Some(station) => self.execute_station(station),
            None => Ok(Interaction::NoOp),
        }
    }

    fn execute_station(&mut self, station: ObjectId) -> Result<Interaction, WorldError> {
        Ok(match self.run_action(station)? {
            Some((created, removed)) => Interaction::Executed {
                station,
                created,
                removed,
            },
            None => Interaction::NoOp,
        })
    }

    /// Try to put something held into something at the target cell.
    ///
    /// Occupied arms are tried in index order. For each held object, in order:
    /// 1. a top-level dynamic holder at the target accepts it;
    /// 2. it is a holder and accepts a liftable object at the target;
    /// 3. the station accepts it.
    ///
    /// The first arm with any fit wins.
    pub fn attempt_merge(
        &mut self,
        agent: ObjectId,
        dynamics: &[ObjectId],
        target: Location,
        station: Option<ObjectId>,
        arm: Option<usize>,
    ) -> Result<Option<Interaction>, WorldError> {
        let liftable = self.liftable(dynamics, station);
        debug_assert!(liftable
            .iter()
            .all(|id| self.get(*id).is_some_and(|obj| obj.location() == target)));

        let held: Vec<(usize, ObjectId)> = self
            .agent(agent)?
            .holding()
            .iter()
            .enumerate()
            .filter(|(idx, _)| arm.map_or(true, |arm| arm == *idx))
            .filter_map(|(idx, held)| (*held).map(|held| (idx, held)))
            .collect();

        for (idx, held) in held {
            let into = liftable
                .iter()
                .copied()
                .find(|holder| *holder != held && self.accepts(*holder, held));
            if let Some(into) = into {
                self.put_down(agent, held, Some(idx), into)?;
                return Ok(Some(Interaction::Merged { object: held, into }));
            }

            let scooped = liftable
                .iter()
                .copied()
                .find(|object| *object != held && self.accepts(held, *object));
            if let Some(object) = scooped {
                self.add_content(held, object)?;
                return Ok(Some(Interaction::Merged { object, into: held }));
            }

            if let Some(onto) = station.filter(|station| self.accepts(*station, held)) {
                self.put_down(agent, held, Some(idx), onto)?;
                return Ok(Some(Interaction::Dropped { object: held, onto }));
            }
        }
        Ok(None)
    }

    /// Dynamics at a cell that may be lifted: free, not held, and either loose
    /// or the tip of a releasing station. Holders first, then creation order.
    fn liftable(&self, dynamics: &[ObjectId], station: Option<ObjectId>) -> Vec<ObjectId> {
        let station_releases = station
            .and_then(|id| self.get(id))
            .and_then(|obj| obj.content_holder())
            .is_some_and(|holder| holder.releases());

        let mut out: Vec<ObjectId> = dynamics
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_some_and(|obj| obj.is_free()))
            .filter(|id| self.holder_agent_of(*id).is_none())
            .filter(|id| match self.container_of(*id) {
                None => true,
                Some(container) => Some(container) == station && station_releases,
            })
            .collect();
        out.sort_by_key(|id| (!self.has(*id, Capability::ContentHolder), *id));
        out
    }

    /// Whether `holder` is a content holder that would take `candidate`.
    fn accepts(&self, holder: ObjectId, candidate: ObjectId) -> bool {
        let Some(acceptor) = self.get(holder).and_then(|obj| obj.content_holder()) else {
            return false;
        };
        self.get(candidate)
            .is_some_and(|candidate| acceptor.accepts(candidate))
    }

    fn has(&self, id: ObjectId, capability: Capability) -> bool {
        self.get(id).is_some_and(|obj| obj.has(capability))
    }
}
