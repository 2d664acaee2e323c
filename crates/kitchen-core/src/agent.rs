use std::ops::Range;

use crate::objects::{located, Mobility, ObjectCore};
use crate::{AgentError, Direction, Location, ObjectId, ObjectKind, WorldObject};

/// Acting entity with a fixed number of arm slots.
///
/// Arm selection follows one rule everywhere: `None` considers every arm in
/// index order, `Some(i)` considers only arm `i`.
#[derive(Debug, Clone)]
pub struct Agent {
    core: ObjectCore,
    arms: Vec<Option<ObjectId>>,
    color: String,
    name: String,
    orientation: Direction,
}

impl Agent {
    pub fn new(
        id: ObjectId,
        location: Location,
        color: impl Into<String>,
        name: impl Into<String>,
        arms: usize,
    ) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            arms: vec![None; arms],
            color: color.into(),
            name: name.into(),
            orientation: Direction::default(),
        }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn orientation(&self) -> Direction {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Direction) {
        self.orientation = orientation;
    }

    pub fn holding(&self) -> &[Option<ObjectId>] {
        &self.arms
    }

    pub fn arm_count(&self) -> usize {
        self.arms.len()
    }

    pub fn arm_of(&self, obj: ObjectId) -> Option<usize> {
        self.arms.iter().position(|held| *held == Some(obj))
    }

    pub fn is_holding(&self, obj: ObjectId) -> bool {
        self.arm_of(obj).is_some()
    }

    fn slots(&self, arm: Option<usize>) -> Result<Range<usize>, AgentError> {
        match arm {
            None => Ok(0..self.arms.len()),
            Some(arm) if arm < self.arms.len() => Ok(arm..arm + 1),
            Some(arm) => Err(AgentError::ArmOutOfRange {
                arm,
                arms: self.arms.len(),
            }),
        }
    }

    /// Put `obj` into the first free considered arm; returns the arm used.
    pub fn grab(&mut self, obj: ObjectId, arm: Option<usize>) -> Result<usize, AgentError> {
        let slots = self.slots(arm)?;
        let idx = slots
            .into_iter()
            .find(|idx| self.arms[*idx].is_none())
            .ok_or(AgentError::NoFreeArm)?;
        self.arms[idx] = Some(obj);
        Ok(idx)
    }

    /// Release `obj`.
    ///
    /// Fails with [`AgentError::NotHeld`] when no arm holds it. When an explicit
    /// arm is given that does not hold it, nothing changes and `Ok(false)` is
    /// returned.
    pub fn put_down(&mut self, obj: ObjectId, arm: Option<usize>) -> Result<bool, AgentError> {
        let idx = self.arm_of(obj).ok_or(AgentError::NotHeld(obj))?;
        if arm.is_some_and(|arm| arm != idx) {
            return Ok(false);
        }
        self.arms[idx] = None;
        Ok(true)
    }

    /// First held object in the considered arms satisfying `predicate`.
    pub fn find_appropriate_holding(
        &self,
        mut predicate: impl FnMut(ObjectId) -> bool,
        arm: Option<usize>,
    ) -> Option<(usize, ObjectId)> {
        let slots = self.slots(arm).ok()?;
        slots
            .into_iter()
            .filter_map(|idx| self.arms[idx].map(|obj| (idx, obj)))
            .find(|(_, obj)| predicate(*obj))
    }

    pub fn holding_empty(&self, arm: Option<usize>) -> bool {
        match self.slots(arm) {
            Ok(slots) => self.arms[slots].iter().all(Option::is_none),
            Err(_) => true,
        }
    }

    pub fn holding_has_free(&self, arm: Option<usize>) -> bool {
        match self.slots(arm) {
            Ok(slots) => self.arms[slots].iter().any(Option::is_none),
            Err(_) => false,
        }
    }

    fn one_hot(&self) -> [i32; 4] {
        let mut out = [0; 4];
        out[usize::from(self.orientation.index()) - 1] = 1;
        out
    }
}

impl WorldObject for Agent {
    crate::objects::object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Agent
    }

    fn mobility(&self) -> Mobility {
        Mobility::Agent
    }

    fn held_ids(&self) -> Vec<ObjectId> {
        self.arms.iter().flatten().copied().collect()
    }

    fn numeric_state_representation(&self) -> Vec<i32> {
        let mut out = vec![1];
        out.extend(self.one_hot());
        out
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        let mut tail = self.one_hot().to_vec();
        tail.push(1);
        located(self.core.location, &tail)
    }

    fn file_name(&self) -> String {
        String::new()
    }
}
