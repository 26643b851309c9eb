//! Basic example of using the cipher puzzle engine

use cipher_core::{
    frequency, CipherFamily, CipherGenerator, Game, GameConfig, HintOutcome, MoveResult,
    QuoteRepository,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    // Encrypt a line directly
    let mut rng = StdRng::seed_from_u64(2024);
    let generator = CipherGenerator::new();
    let (key, ciphertext) =
        generator.generate("ATTACK AT DAWN!", CipherFamily::Substitution, &mut rng);
    println!("Plaintext:  ATTACK AT DAWN!");
    println!("Ciphertext: {}", ciphertext);
    println!("Decrypted:  {}\n", key.decrypt(&ciphertext));

    // Play a round
    let quotes = QuoteRepository::from_pairs(vec![
        ("Well done is better than well said.", "Benjamin Franklin"),
        ("Fortune favors the bold.", "Virgil"),
    ])
    .expect("corpus has letters");
    let mut game = Game::with_seed(GameConfig::countdown(), quotes, 7).expect("valid config");

    println!("{}", game.message());
    println!("Ciphertext: {}", game.puzzle().ciphertext());

    let report = frequency::analyze(game.puzzle().ciphertext());
    println!("Most common cipher letters:");
    for (letter, pct) in report.ranked().iter().take(3) {
        println!("  {}  {:5.1}%", letter, pct);
    }

    // Spend a hint
    if let Ok(HintOutcome::Revealed { hint, .. }) = game.request_hint() {
        println!("\nHint: {} -> {}", hint.cipher, hint.plain);
    }
    println!("Progress:   {}", game.current_decryption());

    // Cheat the rest from the key
    game.tick(42.0);
    let letters: Vec<char> = game.puzzle().mapping().domain().collect();
    for cipher in letters {
        let Some(plain) = game.puzzle().answer_for(cipher) else {
            continue;
        };
        if let Ok(MoveResult::Solved { points }) = game.assign_letter(cipher, plain) {
            println!("\nSolved for {} points", points);
        }
    }

    println!("{}", game.message());
    println!("Author: {}", game.puzzle().quote().author());
    println!("Score:  {}", game.score());
}
