//! Recipe trees and their evaluation against the object pool.
//!
//! A [`RecipeNode`] names a root kind, the state conditions the root must be
//! in, and child nodes that must be matched one-to-one against the root's
//! direct content. Every node carries a stable numeric id drawn from the
//! [`RecipeBook`] it was defined in; those ids index the goal vector.

use std::collections::BTreeSet;

use crate::{ObjectId, ObjectKind, ObjectStore, StateValue, World, WorldObject};

mod book;
mod matcher;

pub use book::RecipeBook;
pub use matcher::{expand_pool, maximum_matching, node_matches};

/// Read-only object access used by the matcher.
pub trait ObjectLookup {
    fn lookup(&self, id: ObjectId) -> Option<&dyn WorldObject>;
}

impl ObjectLookup for ObjectStore {
    fn lookup(&self, id: ObjectId) -> Option<&dyn WorldObject> {
        self.get(id)
    }
}

impl ObjectLookup for World {
    fn lookup(&self, id: ObjectId) -> Option<&dyn WorldObject> {
        self.get(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeNode {
    pub id: usize,
    pub name: String,
    pub root_type: ObjectKind,
    pub conditions: Vec<StateValue>,
    pub contains: Vec<RecipeNode>,
}

impl RecipeNode {
    /// Pre-order walk over this node and all descendants. Shared subtrees are
    /// visited once per occurrence.
    pub fn walk(&self) -> Vec<&RecipeNode> {
        let mut out = vec![self];
        let mut idx = 0;
        while idx < out.len() {
            let node = out[idx];
            out.extend(node.contains.iter());
            idx += 1;
        }
        out
    }

    /// Distinct node ids in this tree.
    pub fn node_ids(&self) -> BTreeSet<usize> {
        self.walk().into_iter().map(|node| node.id).collect()
    }
}

/// Evaluation state of one recipe tree.
#[derive(Debug, Clone)]
pub struct Recipe {
    name: String,
    root: RecipeNode,
    num_goals: usize,
    completed: bool,
    satisfied: BTreeSet<usize>,
    matched_root: Option<ObjectId>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, root: RecipeNode, num_goals: usize) -> Self {
        Self {
            name: name.into(),
            root,
            num_goals,
            completed: false,
            satisfied: BTreeSet::new(),
            matched_root: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &RecipeNode {
        &self.root
    }

    pub fn num_goals(&self) -> usize {
        self.num_goals
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Object that satisfied the root at the last evaluation.
    pub fn matched_root(&self) -> Option<ObjectId> {
        self.matched_root
    }

    /// Ids of nodes in this tree satisfied by some pool object at the last
    /// evaluation.
    pub fn satisfied_nodes(&self) -> &BTreeSet<usize> {
        &self.satisfied
    }

    /// Number of distinct nodes in this tree.
    pub fn node_count(&self) -> usize {
        self.root.node_ids().len()
    }

    /// Re-evaluate against `pool` and everything nested inside it.
    ///
    /// Each recipe is judged alone here; see [`match_recipes`] for the
    /// one-to-one assignment across several recipes.
    pub fn update_recipe_state<L: ObjectLookup + ?Sized>(&mut self, objects: &L, pool: &[ObjectId]) {
        let pool = expand_pool(objects, pool);
        self.refresh_satisfied(objects, &pool);
        self.matched_root = pool
            .iter()
            .copied()
            .find(|id| node_matches(&self.root, *id, objects));
        self.completed = self.matched_root.is_some();
    }

    /// Fixed-length goal flags indexed by node id.
    pub fn goals_completed(&self, num_goals: usize) -> Vec<bool> {
        let mut goals = vec![false; num_goals];
        for id in self.satisfied.iter().filter(|id| **id < num_goals) {
            goals[*id] = true;
        }
        goals
    }

    fn refresh_satisfied<L: ObjectLookup + ?Sized>(&mut self, objects: &L, pool: &[ObjectId]) {
        let mut satisfied = BTreeSet::new();
        for node in self.root.walk() {
            if satisfied.contains(&node.id) {
                continue;
            }
            if pool.iter().any(|id| node_matches(node, *id, objects)) {
                satisfied.insert(node.id);
            }
        }
        self.satisfied = satisfied;
    }
}

/// Evaluate several recipes at once, assigning each completed recipe a
/// distinct root object. Returns the assigned root per recipe, in order.
///
/// Two recipes never share a root object; a recipe whose only candidates are
/// taken by earlier recipes is reported incomplete.
pub fn match_recipes<L: ObjectLookup + ?Sized>(
    recipes: &mut [Recipe],
    objects: &L,
    pool: &[ObjectId],
) -> Vec<Option<ObjectId>> {
    let pool = expand_pool(objects, pool);
    let edges: Vec<Vec<usize>> = recipes
        .iter_mut()
        .map(|recipe| {
            recipe.refresh_satisfied(objects, &pool);
            pool.iter()
                .enumerate()
                .filter(|(_, id)| node_matches(&recipe.root, **id, objects))
                .map(|(idx, _)| idx)
                .collect()
        })
        .collect();

    let assigned: Vec<Option<ObjectId>> = maximum_matching(&edges, pool.len())
        .into_iter()
        .map(|slot| slot.map(|idx| pool[idx]))
        .collect();
    for (recipe, root) in recipes.iter_mut().zip(&assigned) {
        recipe.matched_root = *root;
        recipe.completed = root.is_some();
    }
    assigned
}
