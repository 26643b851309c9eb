//! Cipher puzzle engine.
//!
//! Deals enciphered quotations (shift or substitution), tracks the player's
//! letter mapping, and runs the round rules: hints, a countdown or stopwatch
//! clock, solution checking and scoring. [`Game`] ties these together into a
//! session; everything below it can be used on its own.
//!
//! ```
//! use cipher_core::{Game, GameConfig, QuoteRepository};
//!
//! let quotes = QuoteRepository::from_pairs(vec![("Fortune favors the bold.", "Virgil")]).unwrap();
//! let mut game = Game::with_seed(GameConfig::countdown(), quotes, 7).unwrap();
//! assert_eq!(game.level(), 1);
//!
//! game.request_hint().unwrap();
//! assert_eq!(game.puzzle().hints_remaining(), 2);
//! ```

pub mod cipher;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod frequency;
pub mod hint;
pub mod mapping;
pub mod puzzle;
pub mod quotes;
pub mod scoring;

pub use cipher::{CipherFamily, CipherGenerator, CipherKey, SubstitutionKey};
pub use clock::{format_time, RoundClock};
pub use config::{CipherChoice, GameConfig, TimerMode};
pub use engine::{Game, PuzzleView};
pub use error::{EngineError, Result};
pub use frequency::FrequencyReport;
pub use hint::{HintAdvisor, HintOutcome, HintRecord};
pub use mapping::{PlayerMapping, PLACEHOLDER};
pub use puzzle::{CheckOutcome, MoveResult, PuzzleState};
pub use quotes::{Quote, QuoteRepository};
pub use scoring::{HintsPreservedRule, ScoreContext, ScoringPolicy, ScoringRule, TimeRemainingRule};
