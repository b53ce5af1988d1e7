use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dungeon_common::WALL_BUCKET_SIZE;
use dungeon_input::{Action, DirectionPad};
use dungeon_kernel::WorldEvent;
use dungeon_tools::{DebugTextDump, WorldInspector};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

mod config;
mod demo;

use config::LevelConfig;

#[derive(Parser)]
#[command(name = "dungeon-cli", about = "Headless driver for the dungeon world engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Level config (JSON). Defaults to the built-in arena.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and a summary of the level
    Info,
    /// Run the simulation headless
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "60")]
        ticks: u64,
        /// Milliseconds per tick
        #[arg(short, long, default_value = "16")]
        elapsed_ms: f32,
        /// Comma-separated player actions, one per tick, cycled
        /// (e.g. `right,right,up,stop`)
        #[arg(short, long, default_value = "right,right,down,down,left,left,up,up")]
        script: String,
        /// Fire a bolt every N ticks (0 disables)
        #[arg(short, long, default_value = "20")]
        bolt_every: u64,
        /// Print the render list after the last tick
        #[arg(long)]
        dump: bool,
    },
    /// Query the wall buckets around a point
    Buckets {
        x: f32,
        y: f32,
        /// Also print the pathfinding grid
        #[arg(long)]
        grid: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let level = LevelConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            let world = level.build_world()?;
            println!("dungeon-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("bucket size: {WALL_BUCKET_SIZE}");
            println!("{}", WorldInspector::summary(&world));
        }
        Commands::Simulate {
            ticks,
            elapsed_ms,
            script,
            bolt_every,
            dump,
        } => {
            let actions = script
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(str::parse::<Action>)
                .collect::<Result<Vec<_>, _>>()?;

            let mut world = level.build_world()?;
            let player = world.player().id();
            let mut pad = DirectionPad::new();

            for tick in 0..ticks {
                if let Some(action) = actions.get(tick as usize % actions.len().max(1)) {
                    match *action {
                        Action::Move(direction) => {
                            pad.release_all();
                            pad.press(direction);
                        }
                        Action::Stop => pad.release_all(),
                        Action::Noop => {}
                    }
                }
                pad.apply(&mut world, player);

                if bolt_every > 0 && tick % bolt_every == 0 {
                    demo::fire_bolt(&mut world)?;
                }

                let report = world.step(elapsed_ms);
                for event in world.drain_events() {
                    if let WorldEvent::Despawned { id, kind } = event {
                        tracing::info!(tick = report.tick, %id, %kind, "despawned");
                    }
                }
                if world.player_state().is_dead() {
                    println!("player died at tick {}", report.tick);
                    break;
                }
            }

            println!("{}", WorldInspector::summary(&world));
            println!(
                "player: {} health={}",
                world.player().position(),
                world.player_state().health()
            );
            for id in WorldInspector::list_entities(&world) {
                if let Some(info) = WorldInspector::inspect_entity(&world, id) {
                    if info.kind != dungeon_common::EntityKind::Wall {
                        println!("  {info}");
                    }
                }
            }
            if dump {
                print!("{}", DebugTextDump::new(&world));
            }
        }
        Commands::Buckets { x, y, grid } => {
            let world = level.build_world()?;
            let pos = Vec2::new(x, y);
            let buckets = world.wall_buckets();
            let coord = buckets.bucket_of(pos);
            let (cols, rows) = buckets.dimensions();
            println!(
                "point ({x}, {y}) -> bucket ({}, {}) of {cols}x{rows}",
                coord.x, coord.y
            );
            let near = world.walls_near_point(pos);
            println!("{} walls in 3x3 neighborhood:", near.len());
            for wall in near {
                let r = wall.rect();
                println!("  {} at ({}, {}) {}x{}", wall.id(), r.x, r.y, r.w, r.h);
            }
            if grid {
                print!("{}", DebugTextDump::new(&world).path_grid());
            }
        }
    }

    Ok(())
}
