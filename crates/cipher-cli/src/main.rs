mod app;
mod logger;
mod render;

use anyhow::{Context, Result};
use app::{App, AppAction};
use cipher_core::{Game, GameConfig, QuoteRepository};
use clap::{Parser, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Decrypt famous quotes enciphered with shift and substitution ciphers.
#[derive(Debug, Parser)]
#[command(name = "cipherquest", version, about)]
struct Args {
    /// JSON array of `{ "quote_cleaned": ..., "Author": ... }` records
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// JSON game configuration; overrides --mode
    #[arg(long)]
    config: Option<PathBuf>,

    /// Preset used when no config file is given
    #[arg(long, value_enum, default_value_t = Mode::Countdown)]
    mode: Mode,

    /// Seed for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// 5 minute countdown, score by time left
    Countdown,
    /// Count-up clock, score by hints kept
    Stopwatch,
}

fn default_corpus_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cipherquest")
        .join("quotes.json")
}

fn load_corpus(path: &Path) -> Result<QuoteRepository> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading quote corpus {}", path.display()))?;
    QuoteRepository::from_json_str(&json)
        .with_context(|| format!("loading quote corpus {}", path.display()))
}

fn load_config(args: &Args) -> Result<GameConfig> {
    match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            GameConfig::from_json_str(&json)
                .with_context(|| format!("loading config {}", path.display()))
        }
        None => Ok(match args.mode {
            Mode::Countdown => GameConfig::countdown(),
            Mode::Stopwatch => GameConfig::stopwatch(),
        }),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(args.verbose).context("installing logger")?;

    let config = load_config(&args)?;
    let corpus_path = args.corpus.clone().unwrap_or_else(default_corpus_path);
    let quotes = load_corpus(&corpus_path)?;

    let game = match args.seed {
        Some(seed) => Game::with_seed(config, quotes, seed)?,
        None => Game::new(config, quotes)?,
    };
    log::debug!("[SESSION] {:?}", game);

    run_app(App::new(game))
}

fn run_app(mut app: App) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut last_tick = Instant::now();

    app.redraw(&mut stdout)?;
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        // Time spent typing counts against the round
        app.tick(last_tick.elapsed().as_secs_f64());
        last_tick = Instant::now();

        match app.handle_line(&line, &mut stdout)? {
            AppAction::Continue => {}
            AppAction::Quit => break,
        }
    }

    let game = app.game();
    writeln!(stdout, "Final score: {} (level {})", game.score(), game.level())?;
    Ok(())
}
