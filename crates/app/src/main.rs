use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arcade_core::Clock;
use arcade_core::model::Difficulty;
use services::{ArcadeApi, SessionService};
use tracing::{debug, warn};
use ui::{Runner, spawn_backend};
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_PLAYER: &str = "Player";
const LOG_FILE: &str = "arcade.log";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidApiUrl { raw: String },
    InvalidDifficulty { raw: String },
    EmptyPlayerName,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
            ArgsError::InvalidDifficulty { raw } => {
                write!(f, "invalid --difficulty value: {raw} (easy|medium|hard)")
            }
            ArgsError::EmptyPlayerName => write!(f, "--player requires a non-empty name"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api <url>] [--player <name>] [--difficulty <level>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api {DEFAULT_API_URL}");
    eprintln!("  --player {DEFAULT_PLAYER}");
    eprintln!("  --difficulty medium");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ARCADE_API_URL, ARCADE_PLAYER");
    eprintln!();
    eprintln!("Set RUST_LOG to write diagnostics to {LOG_FILE}.");
}

struct Args {
    api_url: Url,
    player_name: String,
    difficulty: Difficulty,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api_raw =
            std::env::var("ARCADE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        let mut player_name =
            std::env::var("ARCADE_PLAYER").unwrap_or_else(|_| DEFAULT_PLAYER.into());
        let mut difficulty = Difficulty::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    api_raw = require_value(args, "--api")?;
                }
                "--player" => {
                    player_name = require_value(args, "--player")?;
                }
                "--difficulty" => {
                    let value = require_value(args, "--difficulty")?;
                    difficulty = Difficulty::from_str(&value)
                        .map_err(|_| ArgsError::InvalidDifficulty { raw: value })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if player_name.trim().is_empty() {
            return Err(ArgsError::EmptyPlayerName);
        }
        let api_url =
            Url::parse(&api_raw).map_err(|_| ArgsError::InvalidApiUrl { raw: api_raw })?;

        Ok(Self {
            api_url,
            player_name,
            difficulty,
        })
    }
}

/// Diagnostics go to a file, never the terminal: the frame loop owns the
/// screen. Enabled only when `RUST_LOG` is set.
fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var("RUST_LOG").is_err() {
        return Ok(());
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(LOG_FILE)?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing()?;

    let api = ArcadeApi::new(args.api_url);
    // Purely informational; the game degrades to local play either way.
    match api.health().await {
        Ok(health) => debug!(status = %health.status, "backend reachable"),
        Err(err) => warn!(%err, "backend unreachable, playing offline"),
    }

    let service = SessionService::new(Arc::new(api), Clock::default());
    let (client, events) = spawn_backend(service);

    let mut runner = Runner::new(client, events, args.player_name, args.difficulty);
    tokio::task::block_in_place(|| runner.run())?;

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
