//! Headless Hearthfall runner
//!
//! Loads config and rules, restores a snapshot when one exists, seeds the
//! world with mobs and items, runs the requested number of ticks and saves
//! the snapshot again.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;

use hearthfall::core::error::{Result, SimError};
use hearthfall::core::types::Coord;
use hearthfall::rules::load_rules;
use hearthfall::services::{
    EventLog, GridMap, GridPathfinder, HttpWorldRegistry, Services, StaticWorldRegistry,
    WorldRegistry,
};
use hearthfall::{GameRules, Simulation, SimulationConfig, World};

/// Headless simulation runner
#[derive(Parser, Debug)]
#[command(name = "hearthfall")]
#[command(about = "Run the world simulation without a client attached")]
struct Args {
    /// Simulation config (TOML); defaults when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Game rules (TOML)
    #[arg(long, default_value = "data/rules.toml")]
    rules: PathBuf,

    /// Ticks to run
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// Overrides the configured RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Snapshot file: loaded if present, written after the run
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// World registry endpoint; falls back to WORLD_REGISTRY_URL
    #[arg(long)]
    registry_url: Option<String>,

    /// Mobs to spawn, as template=count (repeatable)
    #[arg(long, value_parser = parse_spawn)]
    spawn: Vec<(String, usize)>,

    /// Items to place, as type=x,y (repeatable)
    #[arg(long, value_parser = parse_place)]
    place: Vec<(String, Coord)>,

    /// Map width in cells
    #[arg(long, default_value_t = 64)]
    width: i32,

    /// Map height in cells
    #[arg(long, default_value_t = 64)]
    height: i32,
}

#[derive(Serialize)]
struct RunSummary {
    final_tick: u64,
    mobs: usize,
    items: usize,
    entity_errors: usize,
    events: BTreeMap<String, usize>,
}

fn parse_spawn(s: &str) -> std::result::Result<(String, usize), String> {
    let (template, count) = s
        .split_once('=')
        .ok_or_else(|| format!("expected template=count, got '{}'", s))?;
    let count = count
        .parse()
        .map_err(|e| format!("bad count in '{}': {}", s, e))?;
    Ok((template.to_string(), count))
}

fn parse_place(s: &str) -> std::result::Result<(String, Coord), String> {
    let (item_type, cell) = s
        .split_once('=')
        .ok_or_else(|| format!("expected type=x,y, got '{}'", s))?;
    let (x, y) = cell
        .split_once(',')
        .ok_or_else(|| format!("expected x,y in '{}'", s))?;
    let x = x.trim().parse().map_err(|e| format!("bad x in '{}': {}", s, e))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in '{}': {}", s, e))?;
    Ok((item_type.to_string(), Coord::new(x, y)))
}

fn registry(args: &Args) -> Box<dyn WorldRegistry> {
    let client = match &args.registry_url {
        Some(url) => HttpWorldRegistry::new(url.clone()),
        None => HttpWorldRegistry::from_env(),
    };
    match client {
        Ok(client) => Box::new(client),
        Err(e) => {
            tracing::warn!("No world registry ({}), portals lead nowhere", e);
            Box::new(StaticWorldRegistry::default())
        }
    }
}

fn build(args: &Args, events: Arc<EventLog>) -> Result<Simulation> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let rules: GameRules = load_rules(&args.rules)?;

    let services = Services::new(
        Box::new(GridMap::open(args.width, args.height)),
        Box::new(GridPathfinder::new(config.max_path_nodes)),
        registry(args),
        Box::new(events),
    );

    match &args.snapshot {
        Some(path) if path.exists() => Simulation::load(config, rules, services, path),
        _ => Simulation::new(World::new(config, rules)?, services),
    }
}

fn populate(sim: &mut Simulation, args: &Args) -> Result<()> {
    for (template, count) in &args.spawn {
        if sim.world.rules.template(template).is_none() {
            return Err(SimError::UnknownTemplate(template.clone()));
        }
        for _ in 0..*count {
            let cell = sim.services.geometry.spawn_coord(&mut sim.world.rng);
            sim.world.spawn_mob(template, cell)?;
        }
        tracing::info!("Spawned {} x {}", count, template);
    }
    for (item_type, cell) in &args.place {
        sim.world.generate_item(item_type, BTreeMap::new(), Some(*cell))?;
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let events = Arc::new(EventLog::new());
    let mut sim = build(&args, events.clone())?;
    populate(&mut sim, &args)?;

    tracing::info!(
        "Running {} ticks from tick {} with {} mobs and {} items",
        args.ticks,
        sim.world.now(),
        sim.world.store.mob_count(),
        sim.world.store.item_count()
    );

    let mut summary = RunSummary {
        final_tick: 0,
        mobs: 0,
        items: 0,
        entity_errors: 0,
        events: BTreeMap::new(),
    };
    for _ in 0..args.ticks {
        let report = sim.step(1.0);
        summary.entity_errors += report.errors.len();
        for event in events.drain() {
            *summary.events.entry(event.event).or_default() += 1;
        }
    }
    summary.final_tick = sim.world.now();
    summary.mobs = sim.world.store.mob_count();
    summary.items = sim.world.store.item_count();

    if let Some(path) = &args.snapshot {
        sim.save_snapshot(path)?;
    }

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hearthfall=info")),
        )
        .init();

    if let Err(e) = run(Args::parse()) {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
