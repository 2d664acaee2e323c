//! Deterministic, grid-based kitchen simulation.
//!
//! A [`World`] owns every static station, dynamic item and agent. Agents act
//! once per tick through the interaction resolver, processing stations then
//! advance their content, and [`Recipe`] trees are matched against the
//! resulting object pool.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod agent;
pub mod config;
pub mod dispenser;
pub mod episode;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod location;
pub mod objects;
pub mod recipe;
pub mod store;
pub mod world;

pub use action::{AgentAction, Interaction};
pub use agent::Agent;
pub use config::WorldConfig;
pub use dispenser::{Dispenser, Payload, DISPENSER_TABLE};
pub use episode::{Episode, RecipeProgress, TickReport};
pub use error::{AgentError, ConstructionError, ContentError, RecipeError, WorldError};
pub use ids::{IdAllocator, ObjectId};
pub use location::{Direction, Location};
pub use objects::{
    ActionTriggered, Appliance, ApplianceKind, BlendState, BoilState, Capability, ChopState,
    ContentHolder, Food, FoodAxis, FoodKind, FryState, Linked, Mobility, ObjectContext, ObjectCore,
    ObjectKind, Processing, StateValue, StationStatus, ToastState, Toggleable, Transition,
    WorldObject,
};
pub use recipe::{match_recipes, ObjectLookup, Recipe, RecipeBook, RecipeNode};
pub use store::ObjectStore;
pub use world::{TickOutcome, World};
