use crate::cipher::{CipherFamily, CipherKey};
use crate::clock::RoundClock;
use crate::error::{EngineError, Result};
use crate::mapping::PlayerMapping;
use crate::quotes::Quote;
use crate::scoring::{ScoreContext, ScoringPolicy};

/// Result of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// The mapping was updated; `evicted` lost its plain letter to this move
    Assigned { evicted: Option<char> },
    /// The mapping was updated and completes the plaintext
    Solved { points: u32 },
    /// The round is already solved or expired; nothing changed
    RoundOver,
}

/// Result of checking the player's decryption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Solved by this check
    Solved { points: u32 },
    /// Solved by an earlier check; no further award
    AlreadySolved,
    Incorrect,
    /// The countdown ran out before a solve
    Expired,
}

impl CheckOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, CheckOutcome::Solved { .. } | CheckOutcome::AlreadySolved)
    }
}

/// One round: the quote, its key and ciphertext, and the player's progress
#[derive(Debug, Clone)]
pub struct PuzzleState {
    quote: Quote,
    key: CipherKey,
    ciphertext: String,
    mapping: PlayerMapping,
    hints_remaining: u32,
    clock: RoundClock,
    solved: bool,
    expired: bool,
    selected: Option<char>,
    points_awarded: u32,
}

impl PuzzleState {
    /// Start a round; the ciphertext is derived from the quote and key
    pub fn new(quote: Quote, key: CipherKey, hints: u32, clock: RoundClock) -> Self {
        let ciphertext = key.encrypt(quote.text());
        let mapping = PlayerMapping::for_ciphertext(&ciphertext);
        Self {
            quote,
            key,
            ciphertext,
            mapping,
            hints_remaining: hints,
            clock,
            solved: false,
            expired: false,
            selected: None,
            points_awarded: 0,
        }
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn plaintext(&self) -> &str {
        self.quote.text()
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn key(&self) -> &CipherKey {
        &self.key
    }

    pub fn family(&self) -> CipherFamily {
        self.key.family()
    }

    pub fn mapping(&self) -> &PlayerMapping {
        &self.mapping
    }

    pub fn hints_remaining(&self) -> u32 {
        self.hints_remaining
    }

    pub fn clock(&self) -> &RoundClock {
        &self.clock
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Solved or expired
    pub fn is_over(&self) -> bool {
        self.solved || self.expired
    }

    pub fn selected(&self) -> Option<char> {
        self.selected
    }

    /// Points this round earned (0 until solved)
    pub fn points_awarded(&self) -> u32 {
        self.points_awarded
    }

    /// The ciphertext as the player currently reads it
    pub fn current_decryption(&self) -> String {
        self.mapping.apply(&self.ciphertext)
    }

    /// The true plain letter for a cipher letter of this round
    pub fn answer_for(&self, cipher: char) -> Option<char> {
        if self.mapping.contains(cipher) {
            self.key.plain_for(cipher.to_ascii_uppercase())
        } else {
            None
        }
    }

    /// Whether the player's guess for `cipher` matches the key
    pub fn is_correct(&self, cipher: char) -> bool {
        match (self.mapping.get(cipher), self.answer_for(cipher)) {
            (Some(guess), Some(answer)) => guess == answer,
            _ => false,
        }
    }

    /// Domain letters that are unassigned or assigned wrongly
    pub fn unresolved_letters(&self) -> Vec<char> {
        self.mapping
            .domain()
            .filter(|&c| !self.is_correct(c))
            .collect()
    }

    /// Mark the cipher letter the next plain-letter pick applies to
    pub fn select_cipher_char(&mut self, cipher: char) -> Result<()> {
        if !self.mapping.contains(cipher) {
            return Err(EngineError::InvalidCipherLetter(cipher));
        }
        self.selected = Some(cipher.to_ascii_uppercase());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Assign `cipher -> plain` and check whether that solves the round
    pub fn assign_letter(
        &mut self,
        cipher: char,
        plain: char,
        policy: &dyn ScoringPolicy,
    ) -> Result<MoveResult> {
        if !self.mapping.contains(cipher) {
            return Err(EngineError::InvalidCipherLetter(cipher));
        }
        if !plain.is_ascii_alphabetic() {
            return Err(EngineError::InvalidPlainLetter(plain));
        }
        if self.is_over() {
            return Ok(MoveResult::RoundOver);
        }

        let evicted = self.mapping.assign(cipher, plain)?;
        match self.check_solution(policy) {
            CheckOutcome::Solved { points } => Ok(MoveResult::Solved { points }),
            _ => Ok(MoveResult::Assigned { evicted }),
        }
    }

    /// Remove the guess for `cipher`. Returns false if the round is over.
    pub fn clear_letter(&mut self, cipher: char) -> Result<bool> {
        if !self.mapping.contains(cipher) {
            return Err(EngineError::InvalidCipherLetter(cipher));
        }
        if self.is_over() {
            return Ok(false);
        }
        self.mapping.clear(cipher)?;
        Ok(true)
    }

    /// Compare the decryption with the plaintext, awarding points on the
    /// first successful check only
    pub fn check_solution(&mut self, policy: &dyn ScoringPolicy) -> CheckOutcome {
        if self.solved {
            return CheckOutcome::AlreadySolved;
        }
        if self.expired {
            return CheckOutcome::Expired;
        }
        if self.current_decryption() != self.plaintext() {
            return CheckOutcome::Incorrect;
        }

        let points = policy.award(&self.score_context());
        self.solved = true;
        self.points_awarded = points;
        CheckOutcome::Solved { points }
    }

    /// Reveal the true plain letter for `cipher`, spending one hint
    pub(crate) fn reveal(&mut self, cipher: char) -> Result<char> {
        let answer = self
            .answer_for(cipher)
            .ok_or(EngineError::InvalidCipherLetter(cipher))?;
        self.mapping.assign(cipher, answer)?;
        self.hints_remaining = self.hints_remaining.saturating_sub(1);
        Ok(answer)
    }

    #[cfg(test)]
    pub(crate) fn mapping_mut(&mut self) -> &mut PlayerMapping {
        &mut self.mapping
    }

    /// Advance the round clock. Returns true when this tick expired the round.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.is_over() {
            return false;
        }
        if self.clock.advance(dt) {
            self.expired = true;
            return true;
        }
        false
    }

    pub fn score_context(&self) -> ScoreContext {
        ScoreContext {
            family: self.family(),
            time_remaining_secs: self.clock.remaining_secs(),
            elapsed_secs: self.clock.elapsed_secs(),
            hints_remaining: self.hints_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::SubstitutionKey;
    use crate::config::TimerMode;
    use crate::scoring::{HintsPreservedRule, TimeRemainingRule};

    fn hello_world() -> PuzzleState {
        PuzzleState::new(
            Quote::new("HELLO WORLD", "Anonymous"),
            CipherKey::shift(3).unwrap(),
            3,
            RoundClock::from_mode(TimerMode::Countdown { budget_secs: 300.0 }),
        )
    }

    #[test]
    fn test_new_derives_ciphertext() {
        let puzzle = hello_world();
        assert_eq!(puzzle.ciphertext(), "KHOOR ZRUOG");
        assert_eq!(puzzle.current_decryption(), "_____ _____");
        assert_eq!(puzzle.mapping().domain_len(), 7);
        assert_eq!(puzzle.family(), CipherFamily::Shift);
    }

    #[test]
    fn test_shift_cipher_solve() {
        let mut puzzle = hello_world();
        let moves = [
            ('K', 'H'),
            ('H', 'E'),
            ('O', 'L'),
            ('R', 'O'),
            ('Z', 'W'),
            ('U', 'R'),
        ];
        for (cipher, plain) in moves {
            assert_eq!(
                puzzle.assign_letter(cipher, plain, &TimeRemainingRule),
                Ok(MoveResult::Assigned { evicted: None })
            );
        }
        assert!(!puzzle.is_solved());

        let result = puzzle.assign_letter('G', 'D', &TimeRemainingRule).unwrap();
        assert_eq!(result, MoveResult::Solved { points: 100 + 30 + 50 });
        assert_eq!(puzzle.current_decryption(), "HELLO WORLD");
        assert!(puzzle.is_solved());
        assert!(puzzle.check_solution(&TimeRemainingRule).is_solved());
    }

    #[test]
    fn test_check_is_idempotent() {
        let mut puzzle = hello_world();
        for c in puzzle.mapping().domain().collect::<Vec<_>>() {
            let answer = puzzle.answer_for(c).unwrap();
            puzzle.mapping.assign(c, answer).unwrap();
        }
        assert_eq!(
            puzzle.check_solution(&HintsPreservedRule),
            CheckOutcome::Solved { points: 250 }
        );
        assert_eq!(
            puzzle.check_solution(&HintsPreservedRule),
            CheckOutcome::AlreadySolved
        );
        assert_eq!(puzzle.points_awarded(), 250);
    }

    #[test]
    fn test_incorrect_check_changes_nothing() {
        let mut puzzle = hello_world();
        puzzle.assign_letter('K', 'Q', &TimeRemainingRule).unwrap();
        assert_eq!(
            puzzle.check_solution(&TimeRemainingRule),
            CheckOutcome::Incorrect
        );
        assert!(!puzzle.is_solved());
        assert_eq!(puzzle.mapping().get('K'), Some('Q'));
    }

    #[test]
    fn test_assign_outside_domain_rejected() {
        let mut puzzle = hello_world();
        assert_eq!(
            puzzle.assign_letter('A', 'B', &TimeRemainingRule),
            Err(EngineError::InvalidCipherLetter('A'))
        );
        assert_eq!(
            puzzle.assign_letter('K', '#', &TimeRemainingRule),
            Err(EngineError::InvalidPlainLetter('#'))
        );
        assert_eq!(puzzle.mapping().assigned_count(), 0);
    }

    #[test]
    fn test_substitution_eviction() {
        let key = SubstitutionKey::from_letters("QWERTYUIOPASDFGHJKLZXCVBNM").unwrap();
        // S->L, A->Q, X->B, Y->N
        let mut puzzle = PuzzleState::new(
            Quote::new("SAXY", "Anonymous"),
            CipherKey::Substitution(key),
            3,
            RoundClock::from_mode(TimerMode::Stopwatch),
        );
        assert_eq!(puzzle.ciphertext(), "LQBN");

        puzzle.assign_letter('L', 'A', &HintsPreservedRule).unwrap();
        let result = puzzle.assign_letter('N', 'A', &HintsPreservedRule).unwrap();
        assert_eq!(result, MoveResult::Assigned { evicted: Some('L') });
        assert_eq!(puzzle.mapping().get('L'), None);
        assert_eq!(puzzle.mapping().get('N'), Some('A'));
    }

    #[test]
    fn test_unresolved_letters() {
        let mut puzzle = hello_world();
        puzzle.assign_letter('K', 'H', &TimeRemainingRule).unwrap();
        puzzle.assign_letter('H', 'X', &TimeRemainingRule).unwrap();
        let unresolved = puzzle.unresolved_letters();
        assert!(!unresolved.contains(&'K'));
        assert!(unresolved.contains(&'H'));
        assert_eq!(unresolved.len(), 6);
    }

    #[test]
    fn test_select_cipher_char() {
        let mut puzzle = hello_world();
        puzzle.select_cipher_char('r').unwrap();
        assert_eq!(puzzle.selected(), Some('R'));
        assert_eq!(
            puzzle.select_cipher_char('A'),
            Err(EngineError::InvalidCipherLetter('A'))
        );
        assert_eq!(puzzle.selected(), Some('R'));
        puzzle.clear_selection();
        assert_eq!(puzzle.selected(), None);
    }

    #[test]
    fn test_time_exhaustion() {
        let mut puzzle = PuzzleState::new(
            Quote::new("HELLO WORLD", "Anonymous"),
            CipherKey::shift(3).unwrap(),
            3,
            RoundClock::from_mode(TimerMode::Countdown { budget_secs: 10.0 }),
        );
        assert!(puzzle.tick(15.0));
        assert_eq!(puzzle.clock().remaining_secs(), Some(0.0));
        assert!(puzzle.is_expired());
        assert!(!puzzle.is_solved());

        // No scoring after expiry
        assert_eq!(
            puzzle.assign_letter('K', 'H', &TimeRemainingRule),
            Ok(MoveResult::RoundOver)
        );
        assert_eq!(puzzle.check_solution(&TimeRemainingRule), CheckOutcome::Expired);
        assert_eq!(puzzle.points_awarded(), 0);
    }

    #[test]
    fn test_zero_budget_round_expires_on_first_tick() {
        let mut puzzle = PuzzleState::new(
            Quote::new("HELLO WORLD", "Anonymous"),
            CipherKey::shift(3).unwrap(),
            3,
            RoundClock::from_mode(TimerMode::Countdown { budget_secs: 0.0 }),
        );
        assert!(puzzle.tick(0.0));
        assert!(puzzle.is_expired());
        // Reported once
        assert!(!puzzle.tick(1.0));

        for c in puzzle.mapping().domain().collect::<Vec<_>>() {
            let answer = puzzle.answer_for(c).unwrap();
            assert_eq!(
                puzzle.assign_letter(c, answer, &TimeRemainingRule),
                Ok(MoveResult::RoundOver)
            );
        }
        assert!(!puzzle.is_solved());
    }

    #[test]
    fn test_clock_frozen_after_solve() {
        let mut puzzle = hello_world();
        for c in puzzle.mapping().domain().collect::<Vec<_>>() {
            let answer = puzzle.answer_for(c).unwrap();
            puzzle.assign_letter(c, answer, &TimeRemainingRule).unwrap();
        }
        assert!(puzzle.is_solved());
        assert!(!puzzle.tick(1000.0));
        assert_eq!(puzzle.clock().remaining_secs(), Some(300.0));
        assert!(!puzzle.is_expired());
    }

    #[test]
    fn test_clear_letter() {
        let mut puzzle = hello_world();
        puzzle.assign_letter('K', 'H', &TimeRemainingRule).unwrap();
        assert_eq!(puzzle.clear_letter('K'), Ok(true));
        assert_eq!(puzzle.mapping().get('K'), None);
        assert!(puzzle.clear_letter('A').is_err());
    }
}
