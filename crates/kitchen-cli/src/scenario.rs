//! Scripted scenario files: a level, its agents, the recipes to score and a
//! per-tick action script.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use kitchen_core::{
    AgentAction, Direction, Episode, Location, ObjectId, ObjectKind, RecipeBook, World,
    WorldConfig,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,

    /// Overrides the configured grid bounds.
    #[serde(default)]
    pub grid: Option<Grid>,

    #[serde(default)]
    pub placements: Vec<Placement>,

    #[serde(default)]
    pub agents: Vec<AgentSpec>,

    /// Switch to block subscriptions, by cell.
    #[serde(default)]
    pub links: Vec<Link>,

    /// Registered recipe names to score every tick.
    #[serde(default)]
    pub recipes: Vec<String>,

    /// One entry per tick, mapping agent name to its action.
    #[serde(default)]
    pub script: Vec<BTreeMap<String, AgentAction>>,

    /// Extra ticks with no actions after the script ends.
    #[serde(default)]
    pub idle_ticks: u64,
}

#[derive(Debug, Deserialize)]
pub struct Grid {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize)]
pub struct Placement {
    pub kind: ObjectKind,
    pub at: Location,
}

#[derive(Debug, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub at: Location,
    #[serde(default)]
    pub arms: Option<usize>,
    #[serde(default)]
    pub facing: Option<Direction>,
}

fn default_color() -> String {
    "blue".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub switch: Location,
    pub block: Location,
}

/// A scenario turned into a live episode plus its resolved script.
#[derive(Debug)]
pub struct Prepared {
    pub episode: Episode,
    pub script: Vec<Vec<(ObjectId, AgentAction)>>,
    pub idle_ticks: u64,
}

impl Prepared {
    pub fn total_ticks(&self) -> u64 {
        self.script.len() as u64 + self.idle_ticks
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing scenario {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn display_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }

    /// Build the world, agents, links and recipes, and resolve agent names in
    /// the script.
    pub fn build(&self, mut config: WorldConfig, book: &RecipeBook) -> Result<Prepared> {
        if let Some(grid) = &self.grid {
            config = config.with_bounds(grid.width, grid.height);
        }
        let mut world = World::new(config);

        for placement in &self.placements {
            world
                .place(placement.kind, placement.at)
                .with_context(|| format!("placing {} at {}", placement.kind, placement.at))?;
        }

        let mut agents = BTreeMap::new();
        for spec in &self.agents {
            let added = match spec.arms {
                Some(arms) => world.add_agent_with_arms(spec.at, &spec.color, &spec.name, arms),
                None => world.add_agent(spec.at, &spec.color, &spec.name),
            };
            let id = added.with_context(|| format!("adding agent {:?}", spec.name))?;
            if let Some(facing) = spec.facing {
                world.agent_mut(id)?.set_orientation(facing);
            }
            if agents.insert(spec.name.clone(), id).is_some() {
                bail!("duplicate agent name {:?}", spec.name);
            }
        }

        for link in &self.links {
            let switch = world
                .static_at(link.switch)
                .with_context(|| format!("no switch at {}", link.switch))?;
            let block = world
                .static_at(link.block)
                .with_context(|| format!("no block at {}", link.block))?;
            world.link(switch, block)?;
        }

        let recipes = self
            .recipes
            .iter()
            .map(|name| book.recipe(name).with_context(|| format!("recipe {name:?}")))
            .collect::<Result<Vec<_>>>()?;

        let script = self
            .script
            .iter()
            .enumerate()
            .map(|(idx, step)| {
                step.iter()
                    .map(|(name, action)| {
                        agents
                            .get(name)
                            .map(|id| (*id, *action))
                            .with_context(|| format!("tick {}: unknown agent {name:?}", idx + 1))
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Prepared {
            episode: Episode::new(world, recipes),
            script,
            idle_ticks: self.idle_ticks,
        })
    }
}
