use crate::error::Result;
use crate::puzzle::{CheckOutcome, PuzzleState};
use crate::scoring::ScoringPolicy;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// A revealed mapping entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HintRecord {
    pub cipher: char,
    pub plain: char,
}

/// What a hint request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintOutcome {
    /// One letter revealed; `check` is the solution check that followed
    Revealed { hint: HintRecord, check: CheckOutcome },
    /// Hint budget spent; nothing changed
    NoHintsRemaining,
    /// Every letter is already correct; nothing changed and no hint spent
    NothingToReveal,
    /// The round is solved or expired
    RoundOver,
}

/// Picks which cipher letter a hint reveals
pub struct HintAdvisor;

impl HintAdvisor {
    /// Reveal one unassigned or wrongly assigned letter, chosen uniformly at
    /// random, then check whether the puzzle is solved.
    ///
    /// Player-facing conditions come back as a [`HintOutcome`]; an `Err`
    /// means the reveal itself was rejected by the puzzle.
    pub fn request<R: Rng + ?Sized>(
        puzzle: &mut PuzzleState,
        policy: &dyn ScoringPolicy,
        rng: &mut R,
    ) -> Result<HintOutcome> {
        if puzzle.is_over() {
            return Ok(HintOutcome::RoundOver);
        }
        if puzzle.hints_remaining() == 0 {
            return Ok(HintOutcome::NoHintsRemaining);
        }

        let candidates = puzzle.unresolved_letters();
        let Some(&cipher) = candidates.choose(rng) else {
            return Ok(HintOutcome::NothingToReveal);
        };

        let plain = puzzle.reveal(cipher)?;
        log::debug!(
            "[HINT] revealed {} -> {} remaining:{}",
            cipher,
            plain,
            puzzle.hints_remaining()
        );

        let check = puzzle.check_solution(policy);
        Ok(HintOutcome::Revealed {
            hint: HintRecord { cipher, plain },
            check,
        })
    }
}
