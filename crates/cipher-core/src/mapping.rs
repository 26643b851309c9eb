use crate::cipher::{index_letter, letter_index, ALPHABET_LEN};
use crate::error::{EngineError, Result};

/// Glyph shown for a cipher letter the player has not assigned yet
pub const PLACEHOLDER: char = '_';

/// The player's partial guess from cipher letters to plain letters.
///
/// The domain is fixed at construction to the letters present in the
/// ciphertext. A plain letter is held by at most one cipher letter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerMapping {
    guesses: [Option<u8>; ALPHABET_LEN],
    /// Bitset of cipher letters present in the ciphertext
    domain: u32,
}

impl PlayerMapping {
    /// Empty mapping over the distinct letters of `ciphertext`
    pub fn for_ciphertext(ciphertext: &str) -> Self {
        let domain = ciphertext
            .chars()
            .filter_map(letter_index)
            .fold(0u32, |bits, idx| bits | (1 << idx));
        Self {
            guesses: [None; ALPHABET_LEN],
            domain,
        }
    }

    fn domain_index(&self, cipher: char) -> Result<usize> {
        letter_index(cipher.to_ascii_uppercase())
            .filter(|&idx| self.domain & (1 << idx) != 0)
            .ok_or(EngineError::InvalidCipherLetter(cipher))
    }

    fn plain_index(plain: char) -> Result<usize> {
        letter_index(plain.to_ascii_uppercase()).ok_or(EngineError::InvalidPlainLetter(plain))
    }

    /// Whether `cipher` occurs in the ciphertext
    pub fn contains(&self, cipher: char) -> bool {
        self.domain_index(cipher).is_ok()
    }

    /// Cipher letters in the domain, in alphabetical order
    pub fn domain(&self) -> impl Iterator<Item = char> + '_ {
        (0..ALPHABET_LEN)
            .filter(|&idx| self.domain & (1 << idx) != 0)
            .map(index_letter)
    }

    pub fn domain_len(&self) -> usize {
        self.domain.count_ones() as usize
    }

    /// Current guess for a cipher letter
    pub fn get(&self, cipher: char) -> Option<char> {
        letter_index(cipher.to_ascii_uppercase())
            .and_then(|idx| self.guesses[idx])
            .map(|p| index_letter(p as usize))
    }

    /// Cipher letter currently holding `plain`
    pub fn owner_of(&self, plain: char) -> Option<char> {
        let target = letter_index(plain.to_ascii_uppercase())? as u8;
        self.guesses
            .iter()
            .position(|&g| g == Some(target))
            .map(index_letter)
    }

    /// Set `cipher -> plain`.
    ///
    /// If another cipher letter held `plain` it loses it; that letter is
    /// returned so the caller can report it.
    pub fn assign(&mut self, cipher: char, plain: char) -> Result<Option<char>> {
        let c = self.domain_index(cipher)?;
        let p = Self::plain_index(plain)? as u8;

        let mut evicted = None;
        for (idx, guess) in self.guesses.iter_mut().enumerate() {
            if idx != c && *guess == Some(p) {
                *guess = None;
                evicted = Some(index_letter(idx));
            }
        }
        self.guesses[c] = Some(p);
        Ok(evicted)
    }

    /// Remove the guess for `cipher`, returning the plain letter it held
    pub fn clear(&mut self, cipher: char) -> Result<Option<char>> {
        let c = self.domain_index(cipher)?;
        Ok(self.guesses[c].take().map(|p| index_letter(p as usize)))
    }

    /// Plain letters currently in use, in alphabetical order
    pub fn used_plain_letters(&self) -> Vec<char> {
        let mut used: Vec<char> = self
            .guesses
            .iter()
            .flatten()
            .map(|&p| index_letter(p as usize))
            .collect();
        used.sort_unstable();
        used
    }

    /// Number of domain letters with a guess
    pub fn assigned_count(&self) -> usize {
        self.guesses.iter().filter(|g| g.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.assigned_count() == self.domain_len()
    }

    /// Render `ciphertext` through the mapping: guesses for assigned letters,
    /// [`PLACEHOLDER`] for unassigned ones, everything else unchanged.
    pub fn apply(&self, ciphertext: &str) -> String {
        ciphertext
            .chars()
            .map(|c| match letter_index(c) {
                Some(idx) => self.guesses[idx]
                    .map(|p| index_letter(p as usize))
                    .unwrap_or(PLACEHOLDER),
                None => c,
            })
            .collect()
    }
}
