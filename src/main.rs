//! Acorn Hunt battle simulator
//!
//! Runs one battle from a RON run config or inline arguments and prints the
//! action log.

use acorn_battle::battle::playback::{replay, PlaybackHost, PlaybackSpeed};
use acorn_battle::config::{parse_skill, PartyMemberConfig, RunConfig};
use acorn_battle::errors::ConfigError;
use acorn_battle::{BattleAction, BattleOutcome, ContentLibrary, EngineOptions, RunState};
use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "acorn_battle=info";

#[derive(Parser)]
#[command(name = "acorn-battle")]
#[command(about = "Acorn Hunt battle simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Tracing filter, e.g. `acorn_battle=debug`. Falls back to RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a single battle
    Simulate(SimulateArgs),

    /// List the ids of all standard content
    List,
}

#[derive(Parser)]
struct SimulateArgs {
    /// RON run config. Inline arguments are ignored when given.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Party members as `id` or `id:health`
    #[arg(long, value_delimiter = ',', default_value = "player")]
    party: Vec<String>,

    /// Enemy ids. Generated from the seed when empty.
    #[arg(long, value_delimiter = ',')]
    enemies: Vec<String>,

    /// Which battle of the run to generate an encounter for
    #[arg(long)]
    battle_number: Option<u32>,

    #[arg(long = "relic")]
    relics: Vec<String>,

    /// Skills as `character:skill`
    #[arg(long = "skill")]
    skills: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Replay the log with turn pacing instead of printing it at once
    #[arg(long)]
    playback: Option<PlaybackSpeed>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl SimulateArgs {
    fn run_config(&self) -> Result<RunConfig, ConfigError> {
        if let Some(path) = &self.config {
            return RunConfig::load(path);
        }
        let party = self
            .party
            .iter()
            .map(|entry| parse_member(entry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RunConfig {
            seed: self.seed,
            party,
            enemies: self.enemies.clone(),
            battle_number: self.battle_number,
            relics: self.relics.clone(),
            skills: self.skills.clone(),
            options: EngineOptions::default(),
        })
    }
}

fn parse_member(entry: &str) -> Result<PartyMemberConfig, ConfigError> {
    let Some((id, health)) = entry.split_once(':') else {
        return Ok(PartyMemberConfig {
            id: entry.to_string(),
            health: None,
        });
    };
    let health = health
        .parse::<i32>()
        .map_err(|err| ConfigError::Parse(format!("bad health in {:?}: {}", entry, err)))?;
    Ok(PartyMemberConfig {
        id: id.to_string(),
        health: Some(health),
    })
}

/// Prints actions as the playback layer releases them.
struct ConsoleHost;

impl PlaybackHost for ConsoleHost {
    fn on_action_start(&mut self, action: &BattleAction) {
        println!("{}", action.message);
    }
}

fn simulate(library: &ContentLibrary, config: &RunConfig) -> Result<BattleOutcome, Box<dyn Error>> {
    let mut run = RunState::new(config.seed, &config.party, library)?;
    for relic in &config.relics {
        run.add_relic(library, relic)?;
    }
    for entry in &config.skills {
        let (character, skill) =
            parse_skill(entry).ok_or_else(|| ConfigError::Parse(format!("expected character:skill, got {:?}", entry)))?;
        run.unlock_skill(library, character, skill)?;
    }

    let enemies = if config.enemies.is_empty() {
        run.battles_fought = config.battle_number.unwrap_or(1).saturating_sub(1);
        run.next_encounter(library)?
    } else {
        config
            .enemies
            .iter()
            .map(|id| library.enemy(id))
            .collect::<Result<Vec<_>, _>>()?
    };

    let outcome = run.run_battle(library, &enemies, config.options)?;
    info!(acorns = run.acorns, secondary = run.secondary, "run totals");
    Ok(outcome)
}

fn print_summary(outcome: &BattleOutcome) {
    println!();
    println!(
        "{} after {} rounds{}",
        if outcome.victory { "Victory" } else { "Defeat" },
        outcome.rounds,
        if outcome.stalemate { " (round cap)" } else { "" }
    );
    println!(
        "Acorns: {} (+{} bonus)  Secondary: {}  XP: {}",
        outcome.acorns_earned, outcome.bonus_acorns, outcome.secondary_earned, outcome.experience
    );
    for survivor in &outcome.survivors {
        println!(
            "  {:<16} {:>3}/{:<3}",
            survivor.name(),
            survivor.stats.health,
            survivor.stats.max_health
        );
    }
}

fn list(library: &ContentLibrary) {
    println!("Characters:");
    for character in library.characters() {
        println!("  {:<10} {}", character.id, character.name);
        for skill in library.skills_for(&character.id) {
            println!("      {}:{}", character.id, skill.id);
        }
    }
    println!("Enemies:");
    for enemy in library.encounter_enemies() {
        println!("  {:<14} {} ({})", enemy.id, enemy.name, enemy.tier);
    }
    println!("Relics:");
    for relic in library.relics() {
        println!("  {:<22} {}", relic.id, relic.description);
    }
}

async fn execute(cli: Cli) -> Result<(), Box<dyn Error>> {
    let library = ContentLibrary::standard()?;
    match cli.command {
        Command::List => list(library),
        Command::Simulate(args) => {
            let config = args.run_config()?;
            let outcome = simulate(library, &config)?;
            match (args.format, args.playback) {
                (OutputFormat::Json, _) => println!("{}", serde_json::to_string_pretty(&outcome)?),
                (OutputFormat::Text, Some(speed)) => {
                    replay(&outcome.actions, speed, &mut ConsoleHost).await;
                    print_summary(&outcome);
                }
                (OutputFormat::Text, None) => {
                    for action in &outcome.actions {
                        println!("{}", action);
                    }
                    print_summary(&outcome);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match execute(cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            eprintln!("Error: {}", err);
            std::process::ExitCode::FAILURE
        }
    }
}
