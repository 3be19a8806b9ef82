/// Headless driver: compile a deck plan, or park a player on one and watch
/// the guards react.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use stealthdeck::sim::level::{self, CompileOptions, TEMPLATE_IDS};
use stealthdeck::{GuardEvent, Level, Mission, Pos, TuningConfig};

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "Stealthdeck guard AI driver", long_about = None)]
struct Args {
    /// Tuning file. Without it, stealthdeck.toml is searched next to the
    /// binary, then in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the built-in templates
    Templates,
    /// Compile a template and print the deck plan
    Compile(LevelArgs),
    /// Tick the guards against a stationary player
    Simulate {
        #[command(flatten)]
        level: LevelArgs,
        /// Player position as `x,y` (defaults to the entry point)
        #[arg(long)]
        player: Option<Pos>,
        #[arg(long, default_value_t = 30.0)]
        seconds: f64,
        #[arg(long, default_value_t = 250)]
        dt_ms: u64,
        /// Player is hiding in a barrel
        #[arg(long, default_value_t = false)]
        hiding: bool,
        /// Also print guard movement
        #[arg(long, default_value_t = false)]
        moves: bool,
    },
}

#[derive(clap::Args)]
struct LevelArgs {
    #[arg(short, long, default_value = level::DEFAULT_TEMPLATE)]
    template: String,
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Add the hard-mode guard
    #[arg(long, default_value_t = false)]
    hard: bool,
}

impl LevelArgs {
    fn compile(&self) -> Level {
        let options = if self.hard { CompileOptions::hard() } else { CompileOptions::default() };
        level::compile(&self.template, self.seed, options)
    }
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let tuning = match &args.config {
        Some(path) => TuningConfig::from_path(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => TuningConfig::load(),
    };

    match args.command {
        Command::Templates => {
            for id in TEMPLATE_IDS {
                println!("{id}");
            }
        }
        Command::Compile(level_args) => print_level(&level_args.compile()),
        Command::Simulate { level, player, seconds, dt_ms, hiding, moves } => {
            let level = level.compile();
            let player = player.unwrap_or(level.spawn_point);
            simulate(level, tuning, player, seconds, dt_ms, hiding, moves)?;
        }
    }
    Ok(())
}

fn print_level(level: &Level) {
    println!("{} [{}] seed {}", level.name, level.template_id, level.seed);
    print!("{}", level.to_ascii());
    println!("entry {}  exit {}", level.spawn_point, level.exit_point);
    for (i, obj) in level.objectives.iter().enumerate() {
        println!("objective {i}: {} at {}", obj.label, obj.pos);
    }
    for (i, spawn) in level.guard_spawns.iter().enumerate() {
        let route: Vec<String> = spawn.waypoints.iter().map(|p| p.to_string()).collect();
        let t = spawn.guard_type.template();
        println!(
            "guard {i}: {} at {} facing {:?}, vision {} step {}ms calls {} hp {}/{}/{}, route {}",
            spawn.guard_type.label(),
            spawn.pos,
            spawn.facing,
            t.vision_range,
            t.move_interval.as_millis(),
            t.cascade_range,
            t.combat.hp,
            t.combat.attack,
            t.combat.defense,
            route.join(" "),
        );
    }
}

fn simulate(
    level: Level,
    tuning: TuningConfig,
    player: Pos,
    seconds: f64,
    dt_ms: u64,
    hiding: bool,
    moves: bool,
) -> Result<()> {
    if !level.in_bounds(player) {
        bail!("player {player} is outside the {}x{} map", level.width, level.height);
    }
    if dt_ms == 0 {
        bail!("--dt-ms must be positive");
    }
    let total = Duration::try_from_secs_f64(seconds).context("--seconds")?;
    let dt = Duration::from_millis(dt_ms);
    let ticks = total.as_millis() / dt.as_millis();

    let mut mission = Mission::new(level, tuning);
    let mut clock = Duration::ZERO;
    tracing::info!(%player, ticks = ticks as u64, guards = mission.roster.len(), "simulating");

    for _ in 0..ticks {
        clock += dt;
        for event in mission.tick(player, hiding, dt) {
            if !moves && matches!(event, GuardEvent::Moved { .. }) { continue; }
            println!("{:>7.2}s  {event}", clock.as_secs_f64());
        }
        if mission.engaged_guard().is_some() {
            break;
        }
    }

    println!("-- after {:.2}s --", clock.as_secs_f64());
    if mission.level.is_exit(player) {
        println!("player stands on the exit");
    }
    for (id, guard) in mission.roster.iter() {
        println!(
            "guard {}: {} at {} facing {:?}",
            id.0,
            guard.state.label(),
            guard.pos,
            guard.facing,
        );
    }
    Ok(())
}
