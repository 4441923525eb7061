use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voxplay_app::config::AppConfig;
use voxplay_app::runtime::{mount, GameRuntime, RuntimeOptions};
use voxplay_app::stdin_voice::LineRecognizer;
use voxplay_app::users::{authenticate, JsonFileStore, NewUser, UserStore};
use voxplay_foundation::clock::real_clock;
use voxplay_foundation::shutdown::ShutdownHandler;
use voxplay_games::catalog::{self, GameCategory};
use voxplay_speech::{ConnectivityMonitor, VoiceSessionManager};
use voxplay_tts::{ConsoleSynthesizer, TtsConfig};

#[derive(Parser)]
#[command(name = "voxplay", about = "Voice-controlled mini games", version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, env = "VOXPLAY_CONFIG", default_value = "voxplay.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available games
    List {
        /// Only show games in this category (quiz, skills, coding, creative, music)
        #[arg(long)]
        category: Option<String>,
    },
    /// Play a game; each line you type is treated as a spoken utterance
    Play {
        /// Game id from `list`
        game: String,
        /// Shuffle the question order (quiz only)
        #[arg(long)]
        shuffle: bool,
        /// Disable spoken feedback
        #[arg(long)]
        mute: bool,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        age: u8,
        #[arg(long)]
        password: String,
    },
    /// Log in
    Login {
        email: String,
        password: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_category(raw: &str) -> Result<GameCategory> {
    match raw.to_lowercase().as_str() {
        "quiz" => Ok(GameCategory::Quiz),
        "skills" => Ok(GameCategory::Skills),
        "coding" => Ok(GameCategory::Coding),
        "creative" => Ok(GameCategory::Creative),
        "music" => Ok(GameCategory::Music),
        other => bail!("unknown category `{}`", other),
    }
}

fn list_games(category: Option<String>) -> Result<()> {
    let games: Vec<&catalog::GameDescriptor> = match category {
        Some(raw) => catalog::by_category(parse_category(&raw)?),
        None => catalog::CATALOG.iter().collect(),
    };
    for game in games {
        println!("{:<10} {} - {}", game.id, game.title, game.description);
    }
    Ok(())
}

async fn play(config: AppConfig, game_id: &str, shuffle: bool, mute: bool) -> Result<()> {
    let descriptor = catalog::find(game_id).ok_or_else(|| {
        anyhow!(
            "unknown game `{}`; try one of: {}",
            game_id,
            catalog::CATALOG
                .iter()
                .map(|g| g.id)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    let mut game =
        mount(game_id, shuffle).ok_or_else(|| anyhow!("game `{}` cannot be mounted", game_id))?;

    let shutdown = ShutdownHandler::new().install().await;

    let (event_tx, event_rx) = mpsc::channel(32);
    let recognizer = LineRecognizer::new(event_tx);
    let connectivity = ConnectivityMonitor::new(true);
    let session = VoiceSessionManager::new(
        Box::new(recognizer),
        event_rx,
        connectivity.subscribe(),
        config.recognition.clone(),
    );

    let tts_config = TtsConfig {
        enabled: config.tts.enabled && !mute,
        ..config.tts.clone()
    };
    let tts = ConsoleSynthesizer::new(tts_config);

    println!("=== {} ===", descriptor.title);
    println!("{}", descriptor.instructions);
    println!("(Type what you would say. Ctrl-C quits.)");

    let mut runtime = GameRuntime::new(
        session,
        Box::new(tts),
        real_clock(),
        RuntimeOptions { speak: !mute },
    );
    let summary = runtime.run_game(game.as_mut(), &shutdown).await;

    println!("\n{}", summary);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Command::List { category } => list_games(category)?,
        Command::Play {
            game,
            shuffle,
            mute,
        } => play(config, &game, shuffle, mute).await?,
        Command::Signup {
            first_name,
            last_name,
            email,
            mobile,
            age,
            password,
        } => {
            let store = JsonFileStore::new(&config.store_path);
            let user = store.create(NewUser {
                first_name,
                last_name,
                email,
                mobile,
                age,
                password,
            })?;
            println!("Account created for {}.", user.email);
        }
        Command::Login { email, password } => {
            let store = JsonFileStore::new(&config.store_path);
            match authenticate(&store, &email, &password)? {
                Some(current) => {
                    info!(email = %current.email, admin = current.is_admin, "Logged in");
                    println!("Welcome, {}!", current.email);
                }
                None => {
                    println!("Invalid email or password.");
                    std::process::exit(1);
                }
            }
        }
        Command::Logout => {
            let store = JsonFileStore::new(&config.store_path);
            store.set_current(None)?;
            println!("Logged out.");
        }
        Command::Whoami => {
            let store = JsonFileStore::new(&config.store_path);
            match store.current()? {
                Some(current) if current.is_admin => println!("{} (admin)", current.email),
                Some(current) => println!("{}", current.email),
                None => println!("Not logged in."),
            }
        }
    }
    Ok(())
}
