use crate::cipher::{CipherFamily, CipherGenerator};
use crate::clock::RoundClock;
use crate::config::GameConfig;
use crate::error::{EngineError, Result};
use crate::frequency::{self, FrequencyReport};
use crate::hint::{HintAdvisor, HintOutcome};
use crate::puzzle::{CheckOutcome, MoveResult, PuzzleState};
use crate::quotes::QuoteRepository;
use crate::scoring::ScoringPolicy;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

/// Read-only snapshot for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PuzzleView {
    pub level: u32,
    pub family: CipherFamily,
    pub ciphertext: String,
    pub decryption: String,
    pub author: String,
    pub solved: bool,
    pub expired: bool,
    pub message: String,
    /// Running total across puzzles
    pub score: u64,
    pub hints_remaining: u32,
    /// Countdown time left, `None` on a stopwatch
    pub time_remaining_secs: Option<f64>,
    /// Stopwatch time used, `None` on a countdown
    pub elapsed_secs: Option<f64>,
    pub selected: Option<char>,
    /// Plain letters currently assigned
    pub used_plain_letters: Vec<char>,
}

/// A game session: the current round plus level and running score.
///
/// All state lives here; a controller owns one `Game` and drives it with
/// the command methods.
pub struct Game {
    config: GameConfig,
    quotes: QuoteRepository,
    generator: CipherGenerator,
    policy: Box<dyn ScoringPolicy>,
    rng: StdRng,
    puzzle: PuzzleState,
    level: u32,
    score: u64,
    message: String,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("level", &self.level)
            .field("score", &self.score)
            .field("policy", &self.policy.name())
            .field("quotes", &self.quotes.len())
            .finish()
    }
}

impl Game {
    /// Start a session seeded from OS entropy
    pub fn new(config: GameConfig, quotes: QuoteRepository) -> Result<Self> {
        Self::with_rng(config, quotes, StdRng::from_entropy())
    }

    /// Start a reproducible session
    pub fn with_seed(config: GameConfig, quotes: QuoteRepository, seed: u64) -> Result<Self> {
        Self::with_rng(config, quotes, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, quotes: QuoteRepository, mut rng: StdRng) -> Result<Self> {
        config.validate()?;
        let generator = CipherGenerator::with_max_fixed_points(config.max_fixed_points);
        let policy = config.scoring.policy();
        let puzzle = Self::deal(&config, &quotes, &generator, &mut rng);

        let mut game = Self {
            config,
            quotes,
            generator,
            policy,
            rng,
            puzzle,
            level: 1,
            score: 0,
            message: String::new(),
        };
        game.announce_round();
        Ok(game)
    }

    /// Replace the configured scoring rule with a custom policy
    pub fn with_policy(mut self, policy: Box<dyn ScoringPolicy>) -> Self {
        log::debug!("[SCORE] policy set to {}", policy.name());
        self.policy = policy;
        self
    }

    fn deal(
        config: &GameConfig,
        quotes: &QuoteRepository,
        generator: &CipherGenerator,
        rng: &mut StdRng,
    ) -> PuzzleState {
        let quote = quotes.choose(rng).clone();
        let family = config.cipher.pick(rng);
        let (key, _) = generator.generate(quote.text(), family, rng);
        PuzzleState::new(
            quote,
            key,
            config.hints_per_round,
            RoundClock::from_mode(config.timer),
        )
    }

    fn announce_round(&mut self) {
        self.message = format!("Level {}: Decrypt the {}", self.level, self.puzzle.family());
        log::info!(
            "[ROUND] level:{} family:{:?} letters:{}",
            self.level,
            self.puzzle.family(),
            self.puzzle.mapping().domain_len()
        );
    }

    fn record_solve(&mut self, points: u32) {
        self.score = self.score.saturating_add(u64::from(points));
        self.message = format!("Correct! +{} points", points);
        log::info!(
            "[SCORE] level:{} +{} total:{} policy:{}",
            self.level,
            points,
            self.score,
            self.policy.name()
        );
    }

    // ==================== Commands ====================

    /// Discard the current round and deal a new one at the same level
    pub fn new_puzzle(&mut self) {
        if !self.puzzle.is_over() {
            log::debug!("[ROUND] abandoned level:{}", self.level);
        }
        self.puzzle = Self::deal(&self.config, &self.quotes, &self.generator, &mut self.rng);
        self.announce_round();
    }

    /// Advance to the next level after a solve
    pub fn next_level(&mut self) -> Result<()> {
        if !self.puzzle.is_solved() {
            return Err(EngineError::RoundNotSolved);
        }
        self.level += 1;
        self.new_puzzle();
        Ok(())
    }

    /// Back to level 1 with a zero score
    pub fn restart(&mut self) {
        self.level = 1;
        self.score = 0;
        self.new_puzzle();
    }

    pub fn select_cipher_char(&mut self, cipher: char) -> Result<()> {
        self.puzzle.select_cipher_char(cipher)
    }

    pub fn assign_letter(&mut self, cipher: char, plain: char) -> Result<MoveResult> {
        let result = self.puzzle.assign_letter(cipher, plain, self.policy.as_ref())?;
        if let MoveResult::Solved { points } = result {
            self.record_solve(points);
        }
        Ok(result)
    }

    /// Assign `plain` to the selected cipher letter
    pub fn assign_to_selected(&mut self, plain: char) -> Result<MoveResult> {
        let cipher = self.puzzle.selected().ok_or(EngineError::NoSelection)?;
        self.assign_letter(cipher, plain)
    }

    /// Remove the guess for one cipher letter
    pub fn clear_letter(&mut self, cipher: char) -> Result<bool> {
        self.puzzle.clear_letter(cipher)
    }

    pub fn request_hint(&mut self) -> Result<HintOutcome> {
        let outcome = HintAdvisor::request(&mut self.puzzle, self.policy.as_ref(), &mut self.rng)?;
        match outcome {
            HintOutcome::Revealed { hint, check } => {
                self.message = format!(
                    "Hint used: {} → {}. {} hints remaining.",
                    hint.cipher,
                    hint.plain,
                    self.puzzle.hints_remaining()
                );
                if let CheckOutcome::Solved { points } = check {
                    self.record_solve(points);
                }
            }
            HintOutcome::NoHintsRemaining => self.message = "No hints remaining!".to_string(),
            HintOutcome::NothingToReveal => self.message = "No more letters to hint!".to_string(),
            HintOutcome::RoundOver => {}
        }
        Ok(outcome)
    }

    /// Check the decryption; true when the round is solved
    pub fn check_solution(&mut self) -> bool {
        let outcome = self.puzzle.check_solution(self.policy.as_ref());
        if let CheckOutcome::Solved { points } = outcome {
            self.record_solve(points);
        }
        outcome.is_solved()
    }

    /// Frequency statistics of the current ciphertext
    pub fn analyze_frequency(&self) -> FrequencyReport {
        frequency::analyze(self.puzzle.ciphertext())
    }

    /// Advance the round clock by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        if self.puzzle.tick(dt) {
            self.message = "Time's up! Game over.".to_string();
            log::info!("[ROUND] expired level:{}", self.level);
        }
    }

    // ==================== Queries ====================

    pub fn puzzle(&self) -> &PuzzleState {
        &self.puzzle
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn current_decryption(&self) -> String {
        self.puzzle.current_decryption()
    }

    pub fn view(&self) -> PuzzleView {
        let clock = self.puzzle.clock();
        PuzzleView {
            level: self.level,
            family: self.puzzle.family(),
            ciphertext: self.puzzle.ciphertext().to_string(),
            decryption: self.puzzle.current_decryption(),
            author: self.puzzle.quote().author().to_string(),
            solved: self.puzzle.is_solved(),
            expired: self.puzzle.is_expired(),
            message: self.message.clone(),
            score: self.score,
            hints_remaining: self.puzzle.hints_remaining(),
            time_remaining_secs: clock.remaining_secs(),
            elapsed_secs: clock.elapsed_secs(),
            selected: self.puzzle.selected(),
            used_plain_letters: self.puzzle.mapping().used_plain_letters(),
        }
    }
}
