//! gamegen CLI.
//!
//! Usage:
//!   gamegen simple --theme "space pirates"    # one game, one level
//!   gamegen complete --theme turtles --levels 5
//!   gamegen list                              # saved games

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gamegen::director::Director;
use gamegen::packager::Packager;
use gamegen_config::GamegenConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gamegen")]
#[command(about = "Generate top-down arcade games with Gemini")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gemini API key (overrides GEMINI_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a single game: concept, one level, code and assets
    Simple {
        #[arg(long)]
        theme: Option<String>,
        /// Code file name inside the games directory
        #[arg(long)]
        output: Option<String>,
    },
    /// Generate a multi-level game with analysis and a style guide
    Complete {
        #[arg(long)]
        theme: Option<String>,
        /// Number of levels (defaults to game.default_levels)
        #[arg(long)]
        levels: Option<usize>,
    },
    /// List saved games
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = GamegenConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(key) = cli.api_key {
        config.gemini.api_key = Some(key);
    }
    init_tracing(&config);

    match cli.command {
        Commands::Simple { theme, output } => run_simple(&config, theme, output).await,
        Commands::Complete { theme, levels } => run_complete(&config, theme, levels).await,
        Commands::List => run_list(&config),
    }
}

fn init_tracing(config: &GamegenConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_simple(
    config: &GamegenConfig,
    theme: Option<String>,
    output: Option<String>,
) -> Result<()> {
    config.api_key()?;
    let director = Director::from_config(config)?;
    let mut agent = director.creation_agent();

    let package = agent.create(theme.as_deref()).await;
    let path = agent
        .save(&package, output.as_deref())
        .context("failed to save game")?;

    println!("Created \"{}\"", package.concept.title);
    println!("  {}", path.display());
    Ok(())
}

async fn run_complete(
    config: &GamegenConfig,
    theme: Option<String>,
    levels: Option<usize>,
) -> Result<()> {
    config.api_key()?;
    let mut director = Director::from_config(config)?;
    let levels = levels.unwrap_or(config.game.default_levels);

    let package = director.create_complete(theme.as_deref(), levels).await;
    let dir = director
        .save_complete(&package)
        .await
        .context("failed to save game")?;

    println!(
        "Created \"{}\" ({} levels, risk {:?}, {:?})",
        package.concept.title,
        package.levels.len(),
        package.analysis.risk_level,
        package.analysis.recommendation,
    );
    println!("  {}", dir.display());
    Ok(())
}

fn run_list(config: &GamegenConfig) -> Result<()> {
    let packager = Packager::on_disk(&config.directories.games);
    let games = packager.list_games().context("failed to list games")?;

    if games.is_empty() {
        println!("No games in {}", config.directories.games.display());
        return Ok(());
    }
    for game in games {
        println!(
            "{:<40} {:>2} level(s)  {}  {}",
            game.title.as_deref().unwrap_or("(untitled)"),
            game.levels,
            game.created_at.as_deref().unwrap_or("-"),
            game.path.display(),
        );
    }
    Ok(())
}
