//! Kitchen CLI - scenario runner for the grid kitchen simulation.
//!
//! Single binary that provides:
//! - `kitchen run <scenario>` - play a scripted scenario and report recipe progress
//! - `kitchen check <scenario>` - build a scenario without running it
//! - `kitchen recipes` - list the built-in recipes

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use kitchen_core::{Interaction, RecipeBook, RecipeProgress, TickReport, WorldConfig};

mod scenario;

use scenario::Scenario;

#[derive(Parser)]
#[command(name = "kitchen")]
#[command(about = "Grid kitchen simulation runner", version)]
struct Cli {
    /// Simulation config (YAML); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scenario tick by tick
    Run {
        /// Scenario file (YAML)
        scenario: PathBuf,

        /// Print one JSON tick report per line instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Build a scenario and report what it contains
    Check {
        /// Scenario file (YAML)
        scenario: PathBuf,
    },

    /// List the built-in recipes
    Recipes,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref())?;
    let book = RecipeBook::standard();

    match cli.command {
        Commands::Run { scenario, json } => run_scenario(config, &book, &scenario, json),
        Commands::Check { scenario } => check_scenario(config, &book, &scenario),
        Commands::Recipes => list_recipes(&book),
    }
}

fn load_config(path: Option<&Path>) -> Result<WorldConfig> {
    let Some(path) = path else {
        return Ok(WorldConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn run_scenario(config: WorldConfig, book: &RecipeBook, path: &Path, json: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let fallback = path.display().to_string();
    let mut prepared = scenario.build(config, book)?;
    info!(
        scenario = scenario.display_name(&fallback),
        ticks = prepared.total_ticks(),
        recipes = prepared.episode.recipes().len(),
        "Starting scenario"
    );

    let idle = std::iter::repeat_with(Vec::new).take(prepared.idle_ticks as usize);
    let mut progress = Vec::new();
    for actions in prepared.script.iter().cloned().chain(idle) {
        let report = prepared.episode.step(&actions);
        if json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_tick(&report);
        }
        progress = report.recipes;
    }
    if progress.is_empty() {
        progress = prepared.episode.evaluate();
    }

    if !json {
        println!();
        println!("Recipes after {} ticks:", prepared.episode.tick_count());
        for recipe in &progress {
            print_recipe(recipe);
        }
        println!("Delivered: {}", prepared.episode.world().delivered_total());
    }
    info!(complete = prepared.episode.is_complete(), "Scenario finished");
    Ok(())
}

fn check_scenario(config: WorldConfig, book: &RecipeBook, path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let fallback = path.display().to_string();
    let prepared = scenario.build(config, book)?;
    let world = prepared.episode.world();

    println!("Scenario: {}", scenario.display_name(&fallback));
    println!(
        "Grid: {}x{}",
        world.config().width,
        world.config().height
    );
    println!("Objects: {}", world.len());
    println!("Agents: {}", world.agents().len());
    println!("Recipes: {}", prepared.episode.recipes().len());
    for recipe in prepared.episode.recipes() {
        println!("  - {} ({} nodes)", recipe.name(), recipe.node_count());
    }
    println!("Ticks: {}", prepared.total_ticks());
    Ok(())
}

fn list_recipes(book: &RecipeBook) -> Result<()> {
    println!("Recipes ({} goal nodes):", book.num_goals());
    for name in book.recipe_names() {
        let recipe = book.recipe(name)?;
        println!("  {:<28} {} nodes", name, recipe.node_count());
    }
    Ok(())
}

fn print_tick(report: &TickReport) {
    for (agent, interaction) in &report.interactions {
        if matches!(interaction, Interaction::NoOp) {
            continue;
        }
        println!("tick {:>4}  {agent}  {interaction:?}", report.tick);
    }
    for id in &report.removed {
        println!("tick {:>4}  removed {id}", report.tick);
    }
}

fn print_recipe(recipe: &RecipeProgress) {
    let mark = if recipe.completed { "x" } else { " " };
    println!(
        "  [{mark}] {} ({}/{} nodes)",
        recipe.name, recipe.satisfied_nodes, recipe.total_nodes
    );
}
