//! End-to-end rounds through the public API

use cipher_core::{
    frequency, CheckOutcome, CipherFamily, CipherGenerator, CipherKey, Game, GameConfig,
    HintAdvisor, HintOutcome, MoveResult, PlayerMapping, PuzzleState, Quote, QuoteRepository,
    RoundClock, ScoringRule, SubstitutionKey, TimeRemainingRule, TimerMode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn countdown_puzzle(text: &str, key: CipherKey, budget_secs: f64) -> PuzzleState {
    PuzzleState::new(
        Quote::new(text, "Anonymous"),
        key,
        3,
        RoundClock::from_mode(TimerMode::Countdown { budget_secs }),
    )
}

#[test]
fn test_shift_cipher_solve() {
    let key = CipherKey::shift(3).unwrap();
    assert_eq!(key.encrypt("HELLO WORLD"), "KHOOR ZRUOG");

    let mut puzzle = countdown_puzzle("HELLO WORLD", key, 300.0);
    assert_eq!(puzzle.ciphertext(), "KHOOR ZRUOG");
    assert_eq!(puzzle.current_decryption(), "_____ _____");

    let moves = [
        ('K', 'H'),
        ('H', 'E'),
        ('O', 'L'),
        ('R', 'O'),
        ('Z', 'W'),
        ('U', 'R'),
        ('G', 'D'),
    ];
    let mut last = None;
    for (cipher, plain) in moves {
        last = Some(puzzle.assign_letter(cipher, plain, &TimeRemainingRule).unwrap());
    }
    assert_eq!(puzzle.current_decryption(), "HELLO WORLD");
    assert!(matches!(last, Some(MoveResult::Solved { .. })));
    assert!(puzzle.is_solved());
    assert_eq!(
        puzzle.check_solution(&TimeRemainingRule),
        CheckOutcome::AlreadySolved
    );
}

#[test]
fn test_substitution_eviction() {
    let mut mapping = PlayerMapping::for_ciphertext("XY");
    mapping.assign('X', 'A').unwrap();
    let evicted = mapping.assign('Y', 'A').unwrap();

    assert_eq!(evicted, Some('X'));
    assert_eq!(mapping.get('X'), None);
    assert_eq!(mapping.get('Y'), Some('A'));
}

#[test]
fn test_frequency_report_without_correlation() {
    let report = frequency::analyze("EEEEAAAA");
    assert_eq!(report.observed.len(), 2);
    assert_eq!(report.observed[&'E'], 50.0);
    assert_eq!(report.observed[&'A'], 50.0);
    assert!(report.correlation.is_none());

    let json = serde_json::to_value(&report).unwrap();
    assert!(json.get("correlation").is_none());
}

#[test]
fn test_time_exhaustion() {
    let mut puzzle = countdown_puzzle("HELLO WORLD", CipherKey::shift(3).unwrap(), 10.0);
    assert!(puzzle.tick(15.0));
    assert_eq!(puzzle.clock().remaining_secs(), Some(0.0));
    assert!(puzzle.is_expired());
    assert!(!puzzle.is_solved());

    // Nothing scores after expiry
    assert_eq!(
        puzzle.assign_letter('K', 'H', &TimeRemainingRule),
        Ok(MoveResult::RoundOver)
    );
    assert_eq!(
        puzzle.check_solution(&TimeRemainingRule),
        CheckOutcome::Expired
    );
    assert_eq!(puzzle.points_awarded(), 0);
}

#[test]
fn test_round_trip_both_families() {
    let mut rng = StdRng::seed_from_u64(77);
    let generator = CipherGenerator::new();
    let texts = [
        "HELLO WORLD",
        "IT'S 9:30 - TIME FOR COFFEE!",
        "",
        "ÉCOLE ÜBER ALLES",
        "the quick brown fox",
    ];
    for text in texts {
        for &family in CipherFamily::all() {
            for _ in 0..20 {
                let (key, ciphertext) = generator.generate(text, family, &mut rng);
                assert_eq!(key.family(), family);
                assert_eq!(key.decrypt(&ciphertext), text);
                assert_eq!(ciphertext.chars().count(), text.chars().count());
            }
        }
    }
}

#[test]
fn test_generated_keys_are_bijections() {
    let mut rng = StdRng::seed_from_u64(5);
    let generator = CipherGenerator::new();
    for _ in 0..500 {
        let key = generator.substitution_key(&mut rng);
        let mut letters: Vec<char> = key.to_letters().chars().collect();
        letters.sort_unstable();
        letters.dedup();
        assert_eq!(letters.len(), 26);
        assert!(key.fixed_points() <= 21);
        assert!(SubstitutionKey::from_letters(&key.to_letters()).is_ok());
    }
}

#[test]
fn test_mapping_stays_unique_under_random_play() {
    let text = "SPHINX OF BLACK QUARTZ, JUDGE MY VOW";
    let mut rng = StdRng::seed_from_u64(31);
    let (key, _) = CipherGenerator::new().generate(text, CipherFamily::Substitution, &mut rng);
    let mut puzzle = PuzzleState::new(
        Quote::new(text, "Anonymous"),
        key,
        3,
        RoundClock::from_mode(TimerMode::Stopwatch),
    );
    let domain: Vec<char> = puzzle.mapping().domain().collect();

    for _ in 0..1000 {
        let cipher = domain[rng.gen_range(0..domain.len())];
        let plain = (b'A' + rng.gen_range(0..26u8)) as char;
        if puzzle.is_solved() {
            break;
        }
        puzzle.assign_letter(cipher, plain, &TimeRemainingRule).unwrap();

        let used = puzzle.mapping().used_plain_letters();
        let mut unique = used.clone();
        unique.dedup();
        assert_eq!(used, unique);
    }
}

#[test]
fn test_hint_reveals_true_inverse() {
    let text = "PACK MY BOX WITH FIVE DOZEN LIQUOR JUGS";
    let mut rng = StdRng::seed_from_u64(19);
    let (key, _) = CipherGenerator::new().generate(text, CipherFamily::Substitution, &mut rng);
    let mut puzzle = countdown_puzzle(text, key.clone(), 300.0);

    for expected_left in [2, 1, 0] {
        let HintOutcome::Revealed { hint, .. } =
            HintAdvisor::request(&mut puzzle, &TimeRemainingRule, &mut rng).unwrap()
        else {
            panic!("expected a reveal");
        };
        assert_eq!(key.plain_for(hint.cipher), Some(hint.plain));
        assert_eq!(puzzle.hints_remaining(), expected_left);
    }
    assert_eq!(
        HintAdvisor::request(&mut puzzle, &TimeRemainingRule, &mut rng).unwrap(),
        HintOutcome::NoHintsRemaining
    );
}

#[test]
fn test_session_over_two_levels() {
    let quotes = QuoteRepository::from_json_str(
        r#"[
            { "quote_cleaned": "Knowledge is power.", "Author": "Francis Bacon" },
            { "quote_cleaned": "Less is more.", "Author": "Ludwig Mies van der Rohe" }
        ]"#,
    )
    .unwrap();
    let config = GameConfig {
        scoring: ScoringRule::HintsPreserved,
        ..GameConfig::countdown()
    };
    let mut game = Game::with_seed(config, quotes, 11).unwrap();

    for level in 1..=2u32 {
        assert_eq!(game.level(), level);
        game.tick(5.0);
        let letters: Vec<char> = game.puzzle().mapping().domain().collect();
        for cipher in letters {
            let plain = game.puzzle().answer_for(cipher).unwrap();
            game.assign_letter(cipher, plain).unwrap();
        }
        assert!(game.check_solution());
        let view = game.view();
        assert!(view.solved);
        assert_eq!(view.decryption, game.puzzle().plaintext());
        game.next_level().unwrap();
    }

    // Two solves with all three hints left, 250 each
    assert_eq!(game.score(), 500);
}

#[test]
fn test_empty_corpus_fails_startup() {
    assert!(QuoteRepository::from_json_str("[]").is_err());
    assert!(QuoteRepository::new(vec![Quote::new("---", "Nobody")]).is_err());
}
