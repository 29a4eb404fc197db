//! raid_sim - Headless raid runner with synthetic players
//!
//! Runs a single encounter against the raid_core registry, printing every
//! event as it is announced and a summary once the raid resolves.

mod simulation;

use clap::Parser;
use raid_core::encounter::make_rng;
use raid_core::prelude::*;
use simulation::{builtin_profiles, builtin_rewards, run_simulation, ChannelHost, SimOptions};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "raid_sim")]
#[command(about = "Simulate a raid boss encounter with synthetic players")]
struct Cli {
    /// Number of synthetic players
    #[arg(short, long, default_value_t = 5)]
    players: u64,

    /// Chance a player idles through a turn (0.0 - 1.0)
    #[arg(long, default_value_t = 0.1)]
    afk_chance: f64,

    /// Boss profile name; random when omitted
    #[arg(short, long)]
    boss: Option<String>,

    /// Directory holding bosses.toml and rewards.toml
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Settings TOML file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// RNG seed for a reproducible raid
    #[arg(long)]
    seed: Option<u64>,

    /// Join window length in seconds
    #[arg(long, default_value_t = 3)]
    join_secs: u64,

    /// Action window length in seconds
    #[arg(long, default_value_t = 2)]
    action_secs: u64,

    /// Print events and the summary as JSON lines
    #[arg(long)]
    json: bool,
}

fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    // If RAID_LOG_PATH is set, append to that file
    if let Ok(path) = std::env::var("RAID_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    // Fallback to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(cli: &Cli) -> RaidSettings {
    let mut settings = match &cli.settings {
        Some(path) => match RaidSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Falling back to default settings");
                RaidSettings::default()
            }
        },
        None => RaidSettings::default(),
    };
    settings.join_window_secs = cli.join_secs;
    settings.action_window_secs = cli.action_secs.max(1);
    if cli.seed.is_some() {
        settings.seed = cli.seed;
    }
    settings
}

fn config_provider(cli: &Cli) -> Arc<dyn ConfigProvider> {
    match &cli.config_dir {
        Some(dir) => Arc::new(TomlConfigProvider::from_dir(dir)),
        None => Arc::new(StaticConfig::new(builtin_profiles(), builtin_rewards())),
    }
}

fn print_event(event: &RaidEvent, json: bool) {
    if json {
        match event.to_json() {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!(error = %e, kind = event.kind(), "Could not encode event"),
        }
    } else {
        println!("{}\n", event);
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let settings = load_settings(&cli);
    let mut rng = make_rng(&settings);
    let (host, mut events) = ChannelHost::channel();
    let registry = RaidRegistry::new(Arc::new(host), config_provider(&cli), settings);

    let options = SimOptions {
        players: cli.players,
        afk_chance: cli.afk_chance,
        boss: cli.boss.clone(),
    };
    let context = ContextId(1);
    tracing::info!(players = options.players, boss = ?options.boss, "Starting simulation");

    let json = cli.json;
    let result = run_simulation(&registry, &mut events, context, &options, &mut rng, |event| {
        print_event(event, json)
    })
    .await;

    match result {
        Ok(summary) if json => match serde_json::to_string(&summary) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!(error = %e, "Could not encode summary"),
        },
        Ok(summary) => println!("{}", summary.summary()),
        Err(e) => {
            tracing::error!(error = %e, "Simulation could not start");
            std::process::exit(1);
        }
    }
}
