use crate::render;
use anyhow::{bail, Context, Result};
use cipher_core::{Game, HintOutcome, MoveResult};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Result of handling a command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Continue,
    Quit,
}

/// One line of player input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    Next,
    Restart,
    Select(char),
    Assign { cipher: char, plain: char },
    /// Assign to the selected cipher letter
    Put(char),
    Clear(char),
    Hint,
    Check,
    /// Frequency table, optionally exported as JSON
    Freq(Option<PathBuf>),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  new               deal a new puzzle at this level
  next              next level (after a solve)
  restart           back to level 1 with score 0
  select X          select cipher letter X
  assign X Y | X=Y  read cipher letter X as plain letter Y
  put Y             read the selected cipher letter as Y
  clear X           forget the guess for X
  hint              reveal one letter
  check             check the decryption
  freq [file]       letter frequencies, optionally saved as JSON
  show              redraw
  help              this text
  quit";

fn parse_letter(token: &str) -> Result<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(c.to_ascii_uppercase()),
        _ => bail!("expected a single letter, got '{}'", token),
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        if let Some((cipher, plain)) = line.split_once('=') {
            return Ok(Command::Assign {
                cipher: parse_letter(cipher.trim())?,
                plain: parse_letter(plain.trim())?,
            });
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = tokens.split_first() else {
            return Ok(Command::Show);
        };

        let command = match (verb.to_ascii_lowercase().as_str(), args) {
            ("new" | "n", []) => Command::New,
            ("next", []) => Command::Next,
            ("restart", []) => Command::Restart,
            ("select" | "s", [x]) => Command::Select(parse_letter(x)?),
            ("assign" | "a", [x, y]) => Command::Assign {
                cipher: parse_letter(x)?,
                plain: parse_letter(y)?,
            },
            ("put" | "p", [y]) => Command::Put(parse_letter(y)?),
            ("clear" | "c", [x]) => Command::Clear(parse_letter(x)?),
            ("hint" | "h", []) => Command::Hint,
            ("check", []) => Command::Check,
            ("freq" | "f", []) => Command::Freq(None),
            ("freq" | "f", [path]) => Command::Freq(Some(PathBuf::from(*path))),
            ("show", []) => Command::Show,
            ("help" | "?", []) => Command::Help,
            ("quit" | "q" | "exit", []) => Command::Quit,
            _ => bail!("unknown command '{}', type 'help'", line),
        };
        Ok(command)
    }
}

/// Line-oriented controller owning one game session
pub struct App {
    game: Game,
    /// Error from the last command, shown once
    notice: Option<String>,
}

impl App {
    pub fn new(game: Game) -> Self {
        Self { game, notice: None }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Advance the round clock by wall time
    pub fn tick(&mut self, dt: f64) {
        self.game.tick(dt);
    }

    /// Keep an engine rejection for display instead of failing the session
    fn note<T>(&mut self, result: cipher_core::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.notice = Some(e.to_string());
                None
            }
        }
    }

    pub fn handle_line(&mut self, line: &str, out: &mut impl Write) -> Result<AppAction> {
        match Command::parse(line) {
            Ok(command) => self.execute(command, out),
            Err(e) => {
                self.notice = Some(e.to_string());
                self.redraw(out)?;
                Ok(AppAction::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<AppAction> {
        match command {
            Command::New => self.game.new_puzzle(),
            Command::Next => {
                let result = self.game.next_level();
                self.note(result);
            }
            Command::Restart => self.game.restart(),
            Command::Select(c) => {
                let result = self.game.select_cipher_char(c);
                self.note(result);
            }
            Command::Assign { cipher, plain } => {
                let result = self.game.assign_letter(cipher, plain);
                self.after_move(result);
            }
            Command::Put(plain) => {
                let result = self.game.assign_to_selected(plain);
                self.after_move(result);
            }
            Command::Clear(c) => {
                let result = self.game.clear_letter(c);
                if let Some(false) = self.note(result) {
                    self.notice = Some(round_over_notice());
                }
            }
            Command::Hint => {
                let result = self.game.request_hint();
                if let Some(HintOutcome::RoundOver) = self.note(result) {
                    self.notice = Some(round_over_notice());
                }
            }
            Command::Check => {
                if !self.game.check_solution() && !self.game.puzzle().is_expired() {
                    self.notice = Some("Not solved yet".to_string());
                }
            }
            Command::Freq(path) => {
                self.show_frequency(path, out)?;
                return Ok(AppAction::Continue);
            }
            Command::Show => {}
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                return Ok(AppAction::Continue);
            }
            Command::Quit => return Ok(AppAction::Quit),
        }
        self.redraw(out)?;
        Ok(AppAction::Continue)
    }

    fn after_move(&mut self, result: cipher_core::Result<MoveResult>) {
        match self.note(result) {
            Some(MoveResult::Assigned { evicted: Some(previous) }) => {
                self.notice = Some(format!("{} lost its letter", previous));
            }
            Some(MoveResult::RoundOver) => self.notice = Some(round_over_notice()),
            _ => {}
        }
    }

    fn show_frequency(&mut self, path: Option<PathBuf>, out: &mut impl Write) -> Result<()> {
        let report = self.game.analyze_frequency();
        render::render_frequency(out, &report)?;
        if let Some(path) = path {
            let json = serde_json::to_string_pretty(&report)?;
            fs::write(&path, json)
                .with_context(|| format!("writing frequency report to {}", path.display()))?;
            writeln!(out, "Saved to {}", path.display())?;
            log::info!("[FREQ] report written to {}", path.display());
        }
        Ok(())
    }

    pub fn redraw(&mut self, out: &mut impl Write) -> Result<()> {
        let notice = self.notice.take();
        render::render(out, &self.game.view(), notice.as_deref())?;
        Ok(())
    }
}

fn round_over_notice() -> String {
    "This round is over. Type 'new' or 'next'.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipher_core::{CipherChoice, GameConfig, QuoteRepository, TimerMode};

    fn app(config: GameConfig) -> App {
        let quotes = QuoteRepository::from_pairs(vec![("Hello world", "Anonymous")]).unwrap();
        App::new(Game::with_seed(config, quotes, 21).unwrap())
    }

    fn run(app: &mut App, line: &str) -> (AppAction, String) {
        let mut out = Vec::new();
        let action = app.handle_line(line, &mut out).unwrap();
        (action, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("new").unwrap(), Command::New);
        assert_eq!(Command::parse("  ").unwrap(), Command::Show);
        assert_eq!(Command::parse("s k").unwrap(), Command::Select('K'));
        assert_eq!(
            Command::parse("assign k h").unwrap(),
            Command::Assign { cipher: 'K', plain: 'H' }
        );
        assert_eq!(
            Command::parse("q = e").unwrap(),
            Command::Assign { cipher: 'Q', plain: 'E' }
        );
        assert_eq!(Command::parse("PUT z").unwrap(), Command::Put('Z'));
        assert_eq!(
            Command::parse("freq out.json").unwrap(),
            Command::Freq(Some(PathBuf::from("out.json")))
        );
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("assign KH").is_err());
        assert!(Command::parse("select 7").is_err());
        assert!(Command::parse("a = bc").is_err());
        assert!(Command::parse("dance").is_err());
    }

    #[test]
    fn test_quit() {
        let mut app = app(GameConfig::countdown());
        assert_eq!(run(&mut app, "quit").0, AppAction::Quit);
    }

    #[test]
    fn test_solve_through_commands() {
        let config = GameConfig {
            cipher: CipherChoice::Shift,
            ..GameConfig::countdown()
        };
        let mut app = app(config);
        let letters: Vec<char> = app.game().puzzle().mapping().domain().collect();
        let mut last = String::new();
        for cipher in letters {
            let plain = app.game().puzzle().answer_for(cipher).unwrap();
            last = run(&mut app, &format!("{}={}", cipher, plain)).1;
        }
        assert!(last.contains("HELLO WORLD"));
        assert!(last.contains("Correct! +180 points"));
        assert!(last.contains("-- Anonymous"));

        let (_, text) = run(&mut app, "next");
        assert!(text.contains("Level 2"));
        assert!(text.contains("Score 180"));
    }

    #[test]
    fn test_engine_rejection_is_a_notice() {
        let mut app = app(GameConfig::countdown());
        let outside = ('A'..='Z')
            .find(|&c| !app.game().puzzle().mapping().contains(c))
            .unwrap();

        let (action, text) = run(&mut app, &format!("select {}", outside));
        assert_eq!(action, AppAction::Continue);
        assert!(text.contains(&format!("! '{}'", outside)));

        let (_, text) = run(&mut app, "put A");
        assert!(text.contains("! No cipher letter selected"));

        let (_, text) = run(&mut app, "next");
        assert!(text.contains("! "));
        assert_eq!(app.game().level(), 1);

        // Shown once
        let (_, text) = run(&mut app, "show");
        assert!(!text.contains("! "));
    }

    #[test]
    fn test_expired_round() {
        let config = GameConfig {
            timer: TimerMode::Countdown { budget_secs: 5.0 },
            ..GameConfig::countdown()
        };
        let mut app = app(config);
        app.tick(6.0);
        let (_, text) = run(&mut app, "show");
        assert!(text.contains("Time's up! Game over."));
        assert!(text.contains("Time left 00:00"));

        let (_, text) = run(&mut app, "hint");
        assert!(text.contains("Type 'new' or 'next'."));
    }

    #[test]
    fn test_hint_command() {
        let mut app = app(GameConfig::countdown());
        let (_, text) = run(&mut app, "hint");
        assert!(text.contains("2 hints remaining."));
        assert_eq!(app.game().puzzle().hints_remaining(), 2);
    }

    #[test]
    fn test_freq_export() {
        let mut app = app(GameConfig::countdown());
        let path = std::env::temp_dir().join(format!("cipherquest-freq-{}.json", std::process::id()));
        let (_, text) = run(&mut app, &format!("freq {}", path.display()));
        assert!(text.contains("Letter  Cipher%  English%"));
        assert!(text.contains("Saved to"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["letter_count"], 10);
        assert!(json.get("correlation").is_none());
        let _ = fs::remove_file(&path);
    }
}
