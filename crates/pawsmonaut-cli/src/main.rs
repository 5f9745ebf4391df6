//! Pawsmonauts CLI - play in the terminal, run headless games, check configs

use anyhow::{bail, Context};
use clap::Parser;
use pawsmonaut_core::{
    AgentView, GameHost, GameSnapshot, Location, LogKind, PlayerAction, Team,
};
use pawsmonaut_session::{SessionConfig, SessionId, SessionStore};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pawsmonaut")]
#[command(about = "Pawsmonauts - find the Impawster before it is too late")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Play a game in the terminal
    Play {
        /// Your astronaut's name
        #[arg(short, long)]
        name: Option<String>,
        /// Seed for a reproducible game
        #[arg(short, long)]
        seed: Option<u64>,
        /// Configuration file path (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run games without a human at the controls
    Autoplay {
        /// Seed of the first game; later games count up from it
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of games to run
        #[arg(short, long, default_value_t = 10)]
        games: u32,
        /// Configuration file path (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Check configuration validity
    Check {
        /// Configuration file path (JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Play { name, seed, config }) => {
            let mut config = load_config(config.as_deref())?;
            if seed.is_some() {
                config.game.seed = seed;
            }
            play(config, name.as_deref()).await
        }
        Some(Commands::Autoplay {
            seed,
            games,
            config,
        }) => {
            let config = load_config(config.as_deref())?;
            autoplay(config, seed, games)
        }
        Some(Commands::Check { config }) => {
            let config = load_config(Some(&config))?;
            println!("Config OK");
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        None => {
            println!("Pawsmonauts v{} - Use --help for commands", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Reads a JSON config, or the defaults when no path is given.
fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    let config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<SessionConfig>(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    config.validate().context("invalid configuration")?;
    debug!(?config, "configuration loaded");
    Ok(config)
}

// =============================================================================
// INTERACTIVE PLAY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Night,
    Vote,
}

async fn play(config: SessionConfig, name: Option<&str>) -> anyhow::Result<()> {
    let store = SessionStore::new(config)?;
    let (id, mut snapshot) = store.create(name).await?;
    info!(session = %id, "interactive game started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut step = Step::Night;

    render(&snapshot);
    while !snapshot.game_over {
        prompt(step, &snapshot)?;
        let Some(line) = lines.next_line().await? else {
            println!("\nBye!");
            return Ok(());
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
            println!("Bye!");
            return Ok(());
        }

        let action = match parse_input(step, line, &snapshot) {
            Ok(action) => action,
            Err(err) => {
                println!("  {err}");
                continue;
            }
        };

        match submit(&store, id, action).await? {
            Some(next) => {
                snapshot = next;
                step = match step {
                    Step::Night => Step::Vote,
                    Step::Vote => Step::Night,
                };
                render(&snapshot);
            }
            None => continue,
        }
    }

    match snapshot.winner {
        Some(Team::Crew) => println!("\nThe Impawster was caught. Well done!"),
        Some(Team::Impostor) => println!("\nThe Impawster got away with it."),
        None => {}
    }
    store.remove(id).await;
    Ok(())
}

/// Applies an action. Rejected actions are reported and yield `None`.
async fn submit(
    store: &SessionStore,
    id: SessionId,
    action: PlayerAction,
) -> anyhow::Result<Option<GameSnapshot>> {
    match store.submit(id, action).await {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(err) if err.is_rejected_action() => {
            println!("  {err}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn prompt(step: Step, snapshot: &GameSnapshot) -> std::io::Result<()> {
    match step {
        Step::Night => {
            println!("\nNight falls. Where do you go?");
            for (i, location) in Location::ALL.iter().enumerate() {
                println!("  {}. {location}", i + 1);
            }
        }
        Step::Vote => {
            println!("\nWho gets ejected? (blank to skip)");
            for (i, agent) in snapshot.agents.iter().enumerate() {
                if agent.alive {
                    println!("  {}. {} {}", i + 1, agent.avatar, agent.name);
                }
            }
        }
    }
    print!("> ");
    std::io::stdout().flush()
}

/// Accepts a list number or a name.
fn parse_input(step: Step, line: &str, snapshot: &GameSnapshot) -> anyhow::Result<PlayerAction> {
    match step {
        Step::Night => {
            if let Ok(n) = line.parse::<usize>() {
                return match Location::ALL.get(n.wrapping_sub(1)) {
                    Some(location) => Ok(PlayerAction::night(*location)),
                    None => bail!("pick 1 to {}", Location::ALL.len()),
                };
            }
            Ok(PlayerAction::night(line.parse::<Location>()?))
        }
        Step::Vote => {
            if line.is_empty() {
                return Ok(PlayerAction::abstain());
            }
            if let Ok(n) = line.parse::<usize>() {
                return match snapshot.agents.get(n.wrapping_sub(1)) {
                    Some(agent) => Ok(PlayerAction::vote(agent.name.clone())),
                    None => bail!("no agent number {n}"),
                };
            }
            Ok(PlayerAction::vote(line))
        }
    }
}

fn render(snapshot: &GameSnapshot) {
    println!();
    for entry in &snapshot.log {
        match entry.kind {
            LogKind::System => println!("** {}", entry.message),
            LogKind::Sabotage => println!("!! {}", entry.message),
            _ => println!("   {}", entry.message),
        }
    }
    println!("\n--- Turn {} ---", snapshot.turn);
    for agent in &snapshot.agents {
        let status = if agent.alive { "" } else { " (ejected)" };
        let marker = if agent.player_controlled { " <- you" } else { "" };
        println!(
            "  {} {:<18} {:>5.1}%{status}{marker}",
            agent.avatar,
            agent.name,
            agent.suspicion_score * 100.0
        );
    }
}

// =============================================================================
// AUTOPLAY
// =============================================================================

fn autoplay(config: SessionConfig, seed: Option<u64>, games: u32) -> anyhow::Result<()> {
    let mut chooser = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut crew_wins = 0;
    let mut impostor_wins = 0;

    for i in 0..games {
        let mut game_config = config.game.clone();
        if let Some(seed) = seed {
            game_config.seed = Some(seed.wrapping_add(u64::from(i)));
        }

        let mut host = GameHost::new(game_config);
        let mut snapshot = host.start_game(None)?;
        while !snapshot.game_over {
            let location = Location::ALL
                .choose(&mut chooser)
                .copied()
                .unwrap_or(Location::Bridge);
            snapshot = host.submit_action(PlayerAction::night(location))?;
            if snapshot.game_over {
                break;
            }
            snapshot = host.submit_action(vote_for_top_suspect(&snapshot))?;
        }

        match snapshot.winner {
            Some(Team::Crew) => crew_wins += 1,
            Some(Team::Impostor) => impostor_wins += 1,
            None => {}
        }
        let winner = snapshot
            .winner
            .map_or_else(|| "nobody".to_string(), |team| team.to_string());
        println!(
            "Game {:>3}: {winner} wins after {} round(s)",
            i + 1,
            snapshot.turn.saturating_sub(1)
        );
    }

    println!("\nCrew: {crew_wins}  Impostor: {impostor_wins}  ({games} games)");
    Ok(())
}

/// Votes for the most suspicious living agent other than the player.
/// A ghost player abstains.
fn vote_for_top_suspect(snapshot: &GameSnapshot) -> PlayerAction {
    if !snapshot.player().is_some_and(|p| p.alive) {
        return PlayerAction::abstain();
    }
    let top = snapshot
        .living()
        .filter(|a| !a.player_controlled)
        .fold(None::<&AgentView>, |best, agent| match best {
            Some(b) if b.suspicion_score >= agent.suspicion_score => Some(b),
            _ => Some(agent),
        });
    match top {
        Some(agent) => PlayerAction::vote(agent.name.clone()),
        None => PlayerAction::abstain(),
    }
}
