//! Episode driver: ticks a [`World`] and re-scores its recipes after every step.

#[cfg(feature = "serde")]
use serde::Serialize;
use tracing::{debug, info};

use crate::recipe::match_recipes;
use crate::{AgentAction, Interaction, ObjectId, Recipe, World};

/// Per-recipe status after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RecipeProgress {
    pub name: String,
    pub completed: bool,
    /// Root object assigned to this recipe, if completed.
    pub assigned: Option<ObjectId>,
    pub satisfied_nodes: usize,
    pub total_nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TickReport {
    pub tick: u64,
    pub interactions: Vec<(ObjectId, Interaction)>,
    pub created: Vec<ObjectId>,
    pub removed: Vec<ObjectId>,
    pub recipes: Vec<RecipeProgress>,
    /// Running total consumed by absorbing delivery squares.
    pub delivered: u32,
}

impl TickReport {
    pub fn all_completed(&self) -> bool {
        !self.recipes.is_empty() && self.recipes.iter().all(|recipe| recipe.completed)
    }
}

#[derive(Debug)]
pub struct Episode {
    world: World,
    recipes: Vec<Recipe>,
    tick: u64,
}

impl Episode {
    pub fn new(world: World, recipes: Vec<Recipe>) -> Self {
        Self {
            world,
            recipes,
            tick: 0,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Advance one tick, then evaluate every recipe against the whole world.
    pub fn step(&mut self, actions: &[(ObjectId, AgentAction)]) -> TickReport {
        let outcome = self.world.tick(actions);
        self.tick += 1;
        debug!(
            tick = self.tick,
            created = outcome.created.len(),
            removed = outcome.removed.len(),
            "tick resolved"
        );

        TickReport {
            tick: self.tick,
            interactions: outcome.interactions,
            created: outcome.created,
            removed: outcome.removed,
            recipes: self.evaluate(),
            delivered: self.world.delivered_total(),
        }
    }

    /// Score the recipes without advancing time.
    pub fn evaluate(&mut self) -> Vec<RecipeProgress> {
        let before: Vec<bool> = self.recipes.iter().map(Recipe::completed).collect();
        let pool: Vec<ObjectId> = self.world.objects().ids().collect();
        match_recipes(&mut self.recipes, &self.world, &pool);

        self.recipes
            .iter()
            .zip(before)
            .map(|(recipe, was_completed)| {
                if recipe.completed() && !was_completed {
                    info!(
                        recipe = recipe.name(),
                        tick = self.tick,
                        root = ?recipe.matched_root(),
                        "recipe completed"
                    );
                }
                RecipeProgress {
                    name: recipe.name().to_string(),
                    completed: recipe.completed(),
                    assigned: recipe.matched_root(),
                    satisfied_nodes: recipe.satisfied_nodes().len(),
                    total_nodes: recipe.node_count(),
                }
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.recipes.is_empty() && self.recipes.iter().all(Recipe::completed)
    }
}
