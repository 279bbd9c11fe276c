//! hand_fireworks — interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;

use firework_core::FireworksConfig;
use hand_fireworks::app::{run, AppConfig};

#[derive(Parser, Debug)]
#[command(name = "hand_fireworks", version, about = "Hand-gesture fireworks show")]
struct Cli {
    /// TOML file with show tuning (pool cap, debounce, finale timing, …)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 1280)]
    width: usize,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Seed the random source for a reproducible show
    #[arg(long)]
    seed: Option<u64>,

    /// MIDI channel (0–15) for launch whistles
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..16))]
    midi_channel: u8,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => "warn",
        (_, 0)    => "info",
        (_, 1)    => "debug",
        _         => "trace",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║         Hand Fireworks — Gesture-Triggered Light Show        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Keyboard simulation  (use --features leap for hardware)");
    println!();

    if let Err(e) = load(&cli).and_then(run) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn load(cli: &Cli) -> anyhow::Result<AppConfig> {
    let fireworks = match &cli.config {
        Some(path) => FireworksConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FireworksConfig::default(),
    };
    anyhow::ensure!(cli.width > 0 && cli.height > 0, "window size must be non-zero");

    Ok(AppConfig {
        fireworks,
        width:        cli.width,
        height:       cli.height,
        midi_channel: cli.midi_channel,
        seed:         cli.seed,
    })
}
