use thiserror::Error;

use crate::{FoodKind, Location, ObjectId, ObjectKind};

/// Failures of content-holder operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("{holder} does not accept {candidate}")]
    Rejected {
        holder: ObjectKind,
        candidate: ObjectKind,
    },
    #[error("{holder} holds {len} objects but at most {max} are allowed")]
    CapacityExceeded {
        holder: ObjectKind,
        len: usize,
        max: usize,
    },
    #[error("object {0} is not a content holder")]
    NotAContainer(ObjectId),
    #[error("object {object} is not content of {holder}")]
    NotContained { holder: ObjectId, object: ObjectId },
    #[error("{0} refuses to release its content")]
    ReleaseRefused(ObjectId),
    #[error("content object {0} is missing from the store")]
    MissingContent(ObjectId),
}

/// Failures of the arm/holding API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("no free arm")]
    NoFreeArm,
    #[error("object {0} is not held")]
    NotHeld(ObjectId),
    #[error("arm {arm} out of range (agent has {arms} arms)")]
    ArmOutOfRange { arm: usize, arms: usize },
}

/// Objects built outside their sanctioned creation path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("{0} can only be produced by a blender")]
    SynthesizedOnly(FoodKind),
    #[error("{0} cannot be placed directly")]
    NotPlaceable(ObjectKind),
    #[error("unknown object kind {0:?}")]
    UnknownKind(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    #[error("object {0} is not an agent")]
    UnknownAgent(ObjectId),
    #[error("location {0} is outside the grid")]
    OutOfBounds(Location),
    #[error("object {0} cannot take part in a switch link")]
    NotLinkable(ObjectId),
    #[error("object {0} has no action")]
    NoAction(ObjectId),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecipeError {
    #[error("unknown recipe node {0:?}")]
    UnknownNode(String),
    #[error("recipe node {0:?} is already defined")]
    DuplicateNode(String),
    #[error("unknown recipe {0:?}")]
    UnknownRecipe(String),
}
