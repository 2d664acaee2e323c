use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{located, Mobility, ObjectCore, ObjectKind, WorldObject};
use crate::{ConstructionError, IdAllocator, Location, ObjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FoodKind {
    Tomato,
    Pasta,
    Egg,
    Onion,
    Lettuce,
    Smoothie,
    Ice,
    Strawberry,
    Carrot,
    Cucumber,
    Banana,
    Apple,
    Watermelon,
    Bread,
}

impl FoodKind {
    pub const ALL: [FoodKind; 14] = [
        FoodKind::Tomato,
        FoodKind::Pasta,
        FoodKind::Egg,
        FoodKind::Onion,
        FoodKind::Lettuce,
        FoodKind::Smoothie,
        FoodKind::Ice,
        FoodKind::Strawberry,
        FoodKind::Carrot,
        FoodKind::Cucumber,
        FoodKind::Banana,
        FoodKind::Apple,
        FoodKind::Watermelon,
        FoodKind::Bread,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FoodKind::Tomato => "Tomato",
            FoodKind::Pasta => "Pasta",
            FoodKind::Egg => "Egg",
            FoodKind::Onion => "Onion",
            FoodKind::Lettuce => "Lettuce",
            FoodKind::Smoothie => "Smoothie",
            FoodKind::Ice => "Ice",
            FoodKind::Strawberry => "Strawberry",
            FoodKind::Carrot => "Carrot",
            FoodKind::Cucumber => "Cucumber",
            FoodKind::Banana => "Banana",
            FoodKind::Apple => "Apple",
            FoodKind::Watermelon => "Watermelon",
            FoodKind::Bread => "Bread",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// State axes this food carries.
    pub fn axes(self) -> &'static [FoodAxis] {
        match self {
            FoodKind::Tomato => &[FoodAxis::Chop, FoodAxis::Fry],
            FoodKind::Pasta => &[FoodAxis::Boil],
            FoodKind::Egg => &[FoodAxis::Fry],
            FoodKind::Onion
            | FoodKind::Lettuce
            | FoodKind::Cucumber
            | FoodKind::Apple
            | FoodKind::Watermelon => &[FoodAxis::Chop],
            FoodKind::Smoothie | FoodKind::Ice | FoodKind::Strawberry => &[FoodAxis::Blend],
            FoodKind::Carrot | FoodKind::Banana => &[FoodAxis::Chop, FoodAxis::Blend],
            FoodKind::Bread => &[FoodAxis::Chop, FoodAxis::Toast],
        }
    }

    pub fn has_axis(self, axis: FoodAxis) -> bool {
        self.axes().contains(&axis)
    }

    pub fn state_length(self) -> usize {
        match self {
            FoodKind::Tomato | FoodKind::Pasta | FoodKind::Bread => 3,
            _ => 2,
        }
    }

    pub fn feature_vector_length(self) -> usize {
        match self {
            FoodKind::Tomato | FoodKind::Carrot | FoodKind::Banana | FoodKind::Bread => 6,
            _ => 5,
        }
    }
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FoodAxis {
    Chop,
    Toast,
    Boil,
    Fry,
    Blend,
}

impl FoodAxis {
    pub fn attribute(self) -> &'static str {
        match self {
            FoodAxis::Chop => "chop_state",
            FoodAxis::Toast => "toast_state",
            FoodAxis::Boil => "boil_state",
            FoodAxis::Fry => "fry_state",
            FoodAxis::Blend => "blend_state",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ChopState {
    #[default]
    Fresh,
    Chopped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ToastState {
    #[default]
    Fresh,
    Ready,
    Toasted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BoilState {
    #[default]
    Fresh,
    Ready,
    Cooked,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum FryState {
    #[default]
    Fresh,
    Ready,
    Fried,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum BlendState {
    #[default]
    Fresh,
    Mashed,
}

/// One value on one axis. Doubles as a recipe state condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "axis", content = "value", rename_all = "snake_case"))]
pub enum StateValue {
    Chop(ChopState),
    Toast(ToastState),
    Boil(BoilState),
    Fry(FryState),
    Blend(BlendState),
}

impl StateValue {
    pub fn axis(self) -> FoodAxis {
        match self {
            StateValue::Chop(_) => FoodAxis::Chop,
            StateValue::Toast(_) => FoodAxis::Toast,
            StateValue::Boil(_) => FoodAxis::Boil,
            StateValue::Fry(_) => FoodAxis::Fry,
            StateValue::Blend(_) => FoodAxis::Blend,
        }
    }
}

/// Per-axis state; `None` for axes the food does not carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoodState {
    pub chop: Option<ChopState>,
    pub toast: Option<ToastState>,
    pub boil: Option<BoilState>,
    pub fry: Option<FryState>,
    pub blend: Option<BlendState>,
    /// Ticks spent processing toward the next terminal state.
    pub progress: u32,
}

impl FoodState {
    fn fresh(kind: FoodKind) -> Self {
        let mut state = Self::default();
        for axis in kind.axes() {
            match axis {
                FoodAxis::Chop => state.chop = Some(ChopState::Fresh),
                FoodAxis::Toast => state.toast = Some(ToastState::Fresh),
                FoodAxis::Boil => state.boil = Some(BoilState::Fresh),
                FoodAxis::Fry => state.fry = Some(FryState::Fresh),
                FoodAxis::Blend => state.blend = Some(BlendState::Fresh),
            }
        }
        state
    }
}

#[derive(Debug, Clone)]
pub struct Food {
    core: ObjectCore,
    kind: FoodKind,
    state: FoodState,
}

impl Food {
    /// Fresh food of `kind`. Smoothies only come out of a blender.
    pub fn new(id: ObjectId, kind: FoodKind, location: Location) -> Result<Self, ConstructionError> {
        if kind == FoodKind::Smoothie {
            return Err(ConstructionError::SynthesizedOnly(kind));
        }
        Ok(Self::unchecked(id, kind, location))
    }

    pub(crate) fn blended(id: ObjectId, location: Location) -> Self {
        let mut smoothie = Self::unchecked(id, FoodKind::Smoothie, location);
        smoothie.state.blend = Some(BlendState::Mashed);
        smoothie
    }

    fn unchecked(id: ObjectId, kind: FoodKind, location: Location) -> Self {
        Self {
            core: ObjectCore::new(id, location, false),
            kind,
            state: FoodState::fresh(kind),
        }
    }

    pub fn food_kind(&self) -> FoodKind {
        self.kind
    }

    pub fn state(&self) -> &FoodState {
        &self.state
    }

    pub fn chop_state(&self) -> Option<ChopState> {
        self.state.chop
    }

    pub fn toast_state(&self) -> Option<ToastState> {
        self.state.toast
    }

    pub fn boil_state(&self) -> Option<BoilState> {
        self.state.boil
    }

    pub fn fry_state(&self) -> Option<FryState> {
        self.state.fry
    }

    pub fn blend_state(&self) -> Option<BlendState> {
        self.state.blend
    }

    pub fn has_state(&self, value: StateValue) -> bool {
        match value {
            StateValue::Chop(v) => self.state.chop == Some(v),
            StateValue::Toast(v) => self.state.toast == Some(v),
            StateValue::Boil(v) => self.state.boil == Some(v),
            StateValue::Fry(v) => self.state.fry == Some(v),
            StateValue::Blend(v) => self.state.blend == Some(v),
        }
    }

    /// Force an axis to `value`. False when the food lacks that axis.
    pub fn set_state(&mut self, value: StateValue) -> bool {
        if !self.kind.has_axis(value.axis()) {
            return false;
        }
        match value {
            StateValue::Chop(v) => self.state.chop = Some(v),
            StateValue::Toast(v) => self.state.toast = Some(v),
            StateValue::Boil(v) => self.state.boil = Some(v),
            StateValue::Fry(v) => self.state.fry = Some(v),
            StateValue::Blend(v) => self.state.blend = Some(v),
        }
        true
    }

    pub fn done(&self) -> bool {
        let chopped = self.state.chop == Some(ChopState::Chopped);
        let mashed = self.state.blend == Some(BlendState::Mashed);
        match self.kind {
            FoodKind::Tomato => chopped || self.state.fry == Some(FryState::Fried),
            FoodKind::Pasta => self.state.boil == Some(BoilState::Cooked),
            FoodKind::Egg => self.state.fry == Some(FryState::Fried),
            FoodKind::Onion
            | FoodKind::Lettuce
            | FoodKind::Cucumber
            | FoodKind::Apple
            | FoodKind::Watermelon => chopped,
            FoodKind::Smoothie | FoodKind::Ice | FoodKind::Strawberry | FoodKind::Banana => mashed,
            FoodKind::Carrot => chopped || mashed,
            // Either axis counts for bread.
            FoodKind::Bread => chopped || self.state.toast == Some(ToastState::Toasted),
        }
    }

    /// Whether an appliance working on `axis` may take this food.
    pub fn accepts_processing(&self, axis: FoodAxis) -> bool {
        match axis {
            FoodAxis::Chop => self.state.chop == Some(ChopState::Fresh),
            FoodAxis::Toast => matches!(self.state.toast, Some(ToastState::Fresh | ToastState::Ready)),
            FoodAxis::Boil => matches!(self.state.boil, Some(BoilState::Fresh | BoilState::Ready)),
            FoodAxis::Fry => matches!(self.state.fry, Some(FryState::Fresh | FryState::Ready)),
            FoodAxis::Blend => self.state.blend == Some(BlendState::Fresh),
        }
    }

    /// Move a FRESH toast/boil/fry axis to READY.
    pub fn mark_ready(&mut self, axis: FoodAxis) {
        match axis {
            FoodAxis::Toast => {
                if self.state.toast == Some(ToastState::Fresh) {
                    self.state.toast = Some(ToastState::Ready);
                }
            }
            FoodAxis::Boil => {
                if self.state.boil == Some(BoilState::Fresh) {
                    self.state.boil = Some(BoilState::Ready);
                }
            }
            FoodAxis::Fry => {
                if self.state.fry == Some(FryState::Fresh) {
                    self.state.fry = Some(FryState::Ready);
                }
            }
            FoodAxis::Chop | FoodAxis::Blend => {}
        }
    }

    pub fn is_terminal(&self, axis: FoodAxis) -> bool {
        match axis {
            FoodAxis::Chop => self.state.chop == Some(ChopState::Chopped),
            FoodAxis::Toast => self.state.toast == Some(ToastState::Toasted),
            FoodAxis::Boil => self.state.boil == Some(BoilState::Cooked),
            FoodAxis::Fry => self.state.fry == Some(FryState::Fried),
            FoodAxis::Blend => self.state.blend == Some(BlendState::Mashed),
        }
    }

    /// One processing tick on `axis`. After `required_ticks` ticks from the
    /// input state the axis becomes terminal and progress resets.
    pub fn advance(&mut self, axis: FoodAxis, required_ticks: u32) {
        let advancing = match axis {
            FoodAxis::Toast => self.state.toast == Some(ToastState::Ready),
            FoodAxis::Boil => self.state.boil == Some(BoilState::Ready),
            FoodAxis::Fry => self.state.fry == Some(FryState::Ready),
            FoodAxis::Blend => self.state.blend == Some(BlendState::Fresh),
            FoodAxis::Chop => false,
        };
        if !advancing {
            return;
        }

        self.state.progress += 1;
        if self.state.progress < required_ticks.max(1) {
            return;
        }
        self.state.progress = 0;
        match axis {
            FoodAxis::Toast => self.state.toast = Some(ToastState::Toasted),
            FoodAxis::Boil => self.state.boil = Some(BoilState::Cooked),
            FoodAxis::Fry => self.state.fry = Some(FryState::Fried),
            FoodAxis::Blend => self.state.blend = Some(BlendState::Mashed),
            FoodAxis::Chop => {}
        }
    }

    /// Chop a fresh food. `None` when nothing happened; otherwise the extra
    /// objects the cut produced (a second slice for bread).
    pub fn chop(&mut self, ids: &mut IdAllocator) -> Option<Vec<Food>> {
        if self.state.chop != Some(ChopState::Fresh) {
            return None;
        }
        self.state.chop = Some(ChopState::Chopped);

        if self.kind == FoodKind::Bread {
            let mut slice = Self::unchecked(ids.next_id(), FoodKind::Bread, self.core.location);
            slice.state.chop = Some(ChopState::Chopped);
            return Some(vec![slice]);
        }
        Some(Vec::new())
    }

    fn chopped(&self) -> bool {
        self.state.chop == Some(ChopState::Chopped)
    }
}

impl WorldObject for Food {
    object_basics!();

    fn kind(&self) -> ObjectKind {
        ObjectKind::Food(self.kind)
    }

    fn mobility(&self) -> Mobility {
        Mobility::Dynamic
    }

    fn food(&self) -> Option<&Food> {
        Some(self)
    }

    fn food_mut(&mut self) -> Option<&mut Food> {
        Some(self)
    }

    fn numeric_state_representation(&self) -> Vec<i32> {
        match self.kind {
            FoodKind::Tomato | FoodKind::Pasta | FoodKind::Bread => vec![1, 0, 0],
            FoodKind::Egg => vec![1, 0],
            FoodKind::Smoothie | FoodKind::Ice | FoodKind::Strawberry => {
                vec![1, i32::from(self.state.blend == Some(BlendState::Mashed))]
            }
            _ => vec![1, i32::from(self.chopped())],
        }
    }

    fn feature_vector_representation(&self) -> Vec<i32> {
        let done = self.done();
        let tail = match self.kind {
            FoodKind::Tomato => vec![
                i32::from(!done),
                i32::from(done),
                i32::from(self.state.fry == Some(FryState::Fried)),
                1,
            ],
            FoodKind::Bread => vec![
                i32::from(!done),
                i32::from(done),
                i32::from(self.state.toast == Some(ToastState::Toasted)),
                1,
            ],
            FoodKind::Carrot | FoodKind::Banana => vec![
                i32::from(!done),
                i32::from(self.chopped()),
                i32::from(self.state.blend == Some(BlendState::Mashed)),
                1,
            ],
            _ => vec![i32::from(!done), i32::from(done), 1],
        };
        located(self.core.location, &tail)
    }

    fn file_name(&self) -> String {
        let chopped = self.chopped();
        let name = match self.kind {
            FoodKind::Tomato if self.state.fry == Some(FryState::Fried) => "TomatoSauce",
            FoodKind::Tomato if chopped => "ChoppedTomato",
            FoodKind::Tomato => "FreshTomato",
            FoodKind::Pasta if self.done() => "PenneCooked",
            FoodKind::Pasta => "PenneRaw",
            FoodKind::Egg if self.done() => "FriedEgg",
            FoodKind::Egg => "Egg",
            FoodKind::Onion if chopped => "ChoppedOnion",
            FoodKind::Onion => "FreshOnion",
            FoodKind::Lettuce if chopped => "ChoppedLettuce",
            FoodKind::Lettuce => "FreshLettuce",
            FoodKind::Smoothie => "Smoothie",
            FoodKind::Ice => "Ice",
            FoodKind::Strawberry => "Strawberry",
            FoodKind::Carrot if chopped => "ChoppedCarrot",
            FoodKind::Carrot if self.done() => "CarrotMashed",
            FoodKind::Carrot => "FreshCarrot",
            FoodKind::Cucumber => "default_dynamic",
            FoodKind::Banana if chopped => "ChoppedBanana",
            FoodKind::Banana => "FreshBanana",
            FoodKind::Apple if chopped => "ChoppedApple",
            FoodKind::Apple => "FreshApple",
            FoodKind::Watermelon if chopped => "ChoppedWatermelon",
            FoodKind::Watermelon => "FreshWatermelon",
            FoodKind::Bread if self.state.toast == Some(ToastState::Toasted) => {
                "ChoppedToastedBread"
            }
            FoodKind::Bread if chopped => "ChoppedFreshBread",
            FoodKind::Bread => "Bread",
        };
        name.to_string()
    }

    fn display_text(&self) -> String {
        match self.kind {
            FoodKind::Cucumber if self.chopped() => "Cu Cho".to_string(),
            FoodKind::Cucumber => "Cu Fre".to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(kind: FoodKind) -> Food {
        Food::new(ObjectId(0), kind, Location::new(1, 1)).expect("not synthesized")
    }

    #[test]
    fn smoothie_cannot_be_constructed_directly() {
        assert_eq!(
            Food::new(ObjectId(0), FoodKind::Smoothie, Location::default()).unwrap_err(),
            ConstructionError::SynthesizedOnly(FoodKind::Smoothie)
        );
        assert!(Food::blended(ObjectId(0), Location::default()).done());
    }

    #[test]
    fn banana_is_done_only_when_mashed() {
        let mut banana = food(FoodKind::Banana);
        let mut ids = IdAllocator::starting_at(10);
        assert_eq!(banana.chop(&mut ids).map(|extra| extra.len()), Some(0));
        assert!(!banana.done());
        assert!(banana.set_state(StateValue::Blend(BlendState::Mashed)));
        assert!(banana.done());
    }

    #[test]
    fn chopping_bread_yields_a_second_slice() {
        let mut bread = food(FoodKind::Bread);
        let mut ids = IdAllocator::starting_at(5);
        let extra = bread.chop(&mut ids).expect("fresh bread chops");
        assert_eq!(extra.len(), 1);
        assert_eq!(extra[0].id(), ObjectId(5));
        assert!(extra[0].done());
        assert!(bread.done());
        assert!(bread.chop(&mut ids).is_none());
    }

    #[test]
    fn advance_needs_ready_input() {
        let mut pasta = food(FoodKind::Pasta);
        pasta.advance(FoodAxis::Boil, 2);
        assert_eq!(pasta.boil_state(), Some(BoilState::Fresh));

        pasta.mark_ready(FoodAxis::Boil);
        pasta.advance(FoodAxis::Boil, 2);
        assert_eq!(pasta.boil_state(), Some(BoilState::Ready));
        pasta.advance(FoodAxis::Boil, 2);
        assert_eq!(pasta.boil_state(), Some(BoilState::Cooked));
        assert_eq!(pasta.state().progress, 0);
        assert!(pasta.done());
    }

    #[test]
    fn set_state_rejects_missing_axis() {
        let mut lettuce = food(FoodKind::Lettuce);
        assert!(!lettuce.set_state(StateValue::Toast(ToastState::Toasted)));
        assert!(!lettuce.has_state(StateValue::Toast(ToastState::Toasted)));
    }

    #[test]
    fn projections_have_declared_lengths() {
        for kind in FoodKind::ALL {
            let item = if kind == FoodKind::Smoothie {
                Food::blended(ObjectId(0), Location::default())
            } else {
                food(kind)
            };
            assert_eq!(item.numeric_state_representation().len(), item.state_length());
            assert_eq!(
                item.feature_vector_representation().len(),
                item.feature_vector_length()
            );
        }
    }
}
