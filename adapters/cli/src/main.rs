#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a single Skirmish battle and narrates it.

mod narration;

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish_content::{Archetype, RosterBuilder, DEFAULT_TEAM_A, DEFAULT_TEAM_B};
use skirmish_core::TeamId;
use skirmish_system_battle::{Battle, BattleConfig, DEFAULT_ROUND_CAP};
use skirmish_system_combat::ToHitRule;
use skirmish_world::{ArenaConfig, DEFAULT_ARENA_SIZE};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::narration::{Narrator, OutputFormat};

/// Runs a seeded turn-based skirmish between two teams.
#[derive(Debug, Parser)]
#[command(name = "skirmish", version)]
struct Args {
    /// Seed for every random roll; a random seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Side length of the square arena.
    #[arg(long, default_value_t = DEFAULT_ARENA_SIZE)]
    grid_size: u32,

    /// Rounds played before the battle is declared a draw.
    #[arg(long, default_value_t = DEFAULT_ROUND_CAP)]
    round_cap: u32,

    /// Comma-separated archetypes for team A (wolf, bear, barbarian, pathfinder).
    #[arg(long, value_delimiter = ',')]
    team_a: Vec<Archetype>,

    /// Comma-separated archetypes for team B.
    #[arg(long, value_delimiter = ',')]
    team_b: Vec<Archetype>,

    /// Narration format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Add the attacker's attack bonus to armor checks instead of the defender's.
    #[arg(long)]
    attacker_to_hit: bool,
}

impl Args {
    fn battle_config(&self) -> BattleConfig {
        BattleConfig {
            arena: ArenaConfig::square(self.grid_size),
            round_cap: self.round_cap,
            to_hit: if self.attacker_to_hit {
                ToHitRule::AttackerBonus
            } else {
                ToHitRule::DefenderBonus
            },
        }
    }
}

/// Entry point for the Skirmish command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "starting skirmish");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut builder = RosterBuilder::new();
    let team_a = builder.roster(TeamId::A, line_up(&args.team_a, &DEFAULT_TEAM_A), &mut rng);
    let team_b = builder.roster(TeamId::B, line_up(&args.team_b, &DEFAULT_TEAM_B), &mut rng);

    let stdout = io::stdout();
    let mut narrator = Narrator::new(args.format, stdout.lock());
    narrator.seed(seed)?;
    narrator.roster(&team_a)?;
    narrator.roster(&team_b)?;

    let mut events = Vec::new();
    let mut battle = Battle::new(team_a, team_b, args.battle_config(), rng, &mut events)
        .context("failed to set up the battle")?;
    narrator.events(&events)?;

    while !battle.state().is_over() {
        events.clear();
        let _ = battle.play_round(&mut events);
        narrator.events(&events)?;
    }

    narrator
        .into_inner()
        .flush()
        .context("failed to flush narration")
}

fn line_up<'a>(requested: &'a [Archetype], fallback: &'a [Archetype]) -> &'a [Archetype] {
    if requested.is_empty() {
        fallback
    } else {
        requested
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
