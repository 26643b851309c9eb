use crate::error::{EngineError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of letters in the cipher alphabet
pub const ALPHABET_LEN: usize = 26;

/// Upper bound on letters a generated substitution key may leave unchanged
pub const MAX_FIXED_POINTS: usize = 21;

/// Position of an uppercase ASCII letter in the alphabet
pub fn letter_index(c: char) -> Option<usize> {
    if c.is_ascii_uppercase() {
        Some((c as u8 - b'A') as usize)
    } else {
        None
    }
}

/// Letter at an alphabet position (0 = 'A')
pub fn index_letter(idx: usize) -> char {
    debug_assert!(idx < ALPHABET_LEN);
    (b'A' + idx as u8) as char
}

/// Apply a letter transform to every A-Z character, passing everything else through
fn transform(text: &str, f: impl Fn(usize) -> usize) -> String {
    text.chars()
        .map(|c| match letter_index(c) {
            Some(idx) => index_letter(f(idx)),
            None => c,
        })
        .collect()
}

/// Cipher family used for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherFamily {
    /// Every letter moved a fixed distance along the alphabet
    Shift,
    /// Arbitrary letter-for-letter permutation
    Substitution,
}

impl CipherFamily {
    pub fn all() -> &'static [CipherFamily] {
        &[CipherFamily::Shift, CipherFamily::Substitution]
    }
}

impl std::fmt::Display for CipherFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CipherFamily::Shift => write!(f, "Shift Cipher"),
            CipherFamily::Substitution => write!(f, "Substitution Cipher"),
        }
    }
}

/// A permutation of the alphabet together with its inverse.
///
/// The inverse is computed once at construction so that decrypting a single
/// letter (hints, answer checks) is a table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionKey {
    forward: [u8; ALPHABET_LEN],
    inverse: [u8; ALPHABET_LEN],
}

impl SubstitutionKey {
    /// Build a key from a forward table, where `forward[i]` is the cipher
    /// position of plain letter `i`.
    pub fn from_permutation(forward: [u8; ALPHABET_LEN]) -> Result<Self> {
        let mut inverse = [u8::MAX; ALPHABET_LEN];
        for (plain, &cipher) in forward.iter().enumerate() {
            let slot = inverse
                .get_mut(cipher as usize)
                .ok_or_else(|| EngineError::InvalidKey(format!("position {} out of range", cipher)))?;
            if *slot != u8::MAX {
                return Err(EngineError::InvalidKey(format!(
                    "'{}' is the image of more than one letter",
                    index_letter(cipher as usize)
                )));
            }
            *slot = plain as u8;
        }
        Ok(Self { forward, inverse })
    }

    /// Build a key from the 26 cipher letters for A..Z, e.g. `"QWERTY..."`
    pub fn from_letters(letters: &str) -> Result<Self> {
        let mut forward = [0u8; ALPHABET_LEN];
        let mut count = 0;
        for c in letters.chars() {
            let idx = letter_index(c.to_ascii_uppercase())
                .ok_or_else(|| EngineError::InvalidKey(format!("'{}' is not a letter", c)))?;
            if count == ALPHABET_LEN {
                return Err(EngineError::InvalidKey("more than 26 letters".to_string()));
            }
            forward[count] = idx as u8;
            count += 1;
        }
        if count != ALPHABET_LEN {
            return Err(EngineError::InvalidKey(format!(
                "expected 26 letters, got {}",
                count
            )));
        }
        Self::from_permutation(forward)
    }

    /// Identity permutation
    pub fn identity() -> Self {
        let table: [u8; ALPHABET_LEN] = std::array::from_fn(|i| i as u8);
        Self {
            forward: table,
            inverse: table,
        }
    }

    /// Cipher letter for a plain letter
    pub fn encrypt_char(&self, plain: char) -> Option<char> {
        letter_index(plain).map(|idx| index_letter(self.forward[idx] as usize))
    }

    /// Plain letter for a cipher letter
    pub fn decrypt_char(&self, cipher: char) -> Option<char> {
        letter_index(cipher).map(|idx| index_letter(self.inverse[idx] as usize))
    }

    /// Number of letters that map to themselves
    pub fn fixed_points(&self) -> usize {
        self.forward
            .iter()
            .enumerate()
            .filter(|&(plain, &cipher)| plain == cipher as usize)
            .count()
    }

    /// Forward table as 26 cipher letters for A..Z
    pub fn to_letters(&self) -> String {
        self.forward
            .iter()
            .map(|&idx| index_letter(idx as usize))
            .collect()
    }
}

/// Key for one of the two cipher families
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CipherKey {
    Shift { amount: u8 },
    Substitution(SubstitutionKey),
}

impl CipherKey {
    /// Shift key, amount in 1..=25
    pub fn shift(amount: u8) -> Result<Self> {
        if !(1..ALPHABET_LEN as u8).contains(&amount) {
            return Err(EngineError::InvalidKey(format!(
                "shift amount {} outside 1..=25",
                amount
            )));
        }
        Ok(CipherKey::Shift { amount })
    }

    pub fn family(&self) -> CipherFamily {
        match self {
            CipherKey::Shift { .. } => CipherFamily::Shift,
            CipherKey::Substitution(_) => CipherFamily::Substitution,
        }
    }

    fn encrypt_index(&self, idx: usize) -> usize {
        match self {
            CipherKey::Shift { amount } => (idx + *amount as usize) % ALPHABET_LEN,
            CipherKey::Substitution(key) => key.forward[idx] as usize,
        }
    }

    fn decrypt_index(&self, idx: usize) -> usize {
        match self {
            CipherKey::Shift { amount } => (idx + ALPHABET_LEN - *amount as usize) % ALPHABET_LEN,
            CipherKey::Substitution(key) => key.inverse[idx] as usize,
        }
    }

    /// Encrypt text; characters outside A-Z are copied unchanged
    pub fn encrypt(&self, plaintext: &str) -> String {
        transform(plaintext, |idx| self.encrypt_index(idx))
    }

    /// Decrypt text; characters outside A-Z are copied unchanged
    pub fn decrypt(&self, ciphertext: &str) -> String {
        transform(ciphertext, |idx| self.decrypt_index(idx))
    }

    /// The plain letter a cipher letter stands for
    pub fn plain_for(&self, cipher: char) -> Option<char> {
        letter_index(cipher).map(|idx| index_letter(self.decrypt_index(idx)))
    }
}

/// Produces random keys and the matching ciphertext
#[derive(Debug, Clone)]
pub struct CipherGenerator {
    max_fixed_points: usize,
}

impl Default for CipherGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CipherGenerator {
    pub fn new() -> Self {
        Self {
            max_fixed_points: MAX_FIXED_POINTS,
        }
    }

    /// Generator with a custom bound on substitution fixed points
    pub fn with_max_fixed_points(max_fixed_points: usize) -> Self {
        Self { max_fixed_points }
    }

    /// Generate a key of the given family and encrypt `plaintext` with it
    pub fn generate<R: Rng + ?Sized>(
        &self,
        plaintext: &str,
        family: CipherFamily,
        rng: &mut R,
    ) -> (CipherKey, String) {
        let key = match family {
            CipherFamily::Shift => self.shift_key(rng),
            CipherFamily::Substitution => CipherKey::Substitution(self.substitution_key(rng)),
        };
        let ciphertext = key.encrypt(plaintext);
        (key, ciphertext)
    }

    /// Uniform shift in 1..=25
    pub fn shift_key<R: Rng + ?Sized>(&self, rng: &mut R) -> CipherKey {
        CipherKey::Shift {
            amount: rng.gen_range(1..ALPHABET_LEN as u8),
        }
    }

    /// Shuffle the alphabet until no more than `max_fixed_points` letters stay put
    pub fn substitution_key<R: Rng + ?Sized>(&self, rng: &mut R) -> SubstitutionKey {
        let mut forward: [u8; ALPHABET_LEN] = std::array::from_fn(|i| i as u8);
        let mut attempts = 0u32;

        loop {
            forward.shuffle(rng);
            attempts += 1;

            let fixed = forward
                .iter()
                .enumerate()
                .filter(|&(plain, &cipher)| plain == cipher as usize)
                .count();
            if fixed <= self.max_fixed_points {
                break;
            }
        }

        if attempts > 1 {
            log::debug!("[KEY] substitution key resampled attempts:{}", attempts);
        }

        let mut inverse = [0u8; ALPHABET_LEN];
        for (plain, &cipher) in forward.iter().enumerate() {
            inverse[cipher as usize] = plain as u8;
        }
        SubstitutionKey { forward, inverse }
    }
}
