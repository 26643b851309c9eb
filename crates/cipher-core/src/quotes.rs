use crate::error::{EngineError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A quotation to be enciphered. The text is stored uppercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    text: String,
    author: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into().to_uppercase(),
            author: author.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Whether the text has anything to decrypt
    fn has_letters(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_uppercase())
    }
}

/// One corpus record as exported by the quote cleaning pipeline
#[derive(Debug, Deserialize)]
struct QuoteRecord {
    quote_cleaned: String,
    #[serde(rename = "Author", default)]
    author: String,
}

/// Source of random quotes for new puzzles. Never empty.
#[derive(Debug, Clone)]
pub struct QuoteRepository {
    quotes: Vec<Quote>,
}

impl QuoteRepository {
    /// Build a repository, dropping quotes without any letter.
    ///
    /// Fails with [`EngineError::EmptyCorpus`] if nothing usable remains.
    pub fn new(quotes: Vec<Quote>) -> Result<Self> {
        let total = quotes.len();
        let quotes: Vec<Quote> = quotes.into_iter().filter(Quote::has_letters).collect();

        if quotes.len() < total {
            log::warn!(
                "[CORPUS] skipped {} quotes without letters",
                total - quotes.len()
            );
        }
        if quotes.is_empty() {
            return Err(EngineError::EmptyCorpus);
        }

        log::info!("[CORPUS] loaded {} quotes", quotes.len());
        Ok(Self { quotes })
    }

    /// Build from `(text, author)` pairs
    pub fn from_pairs<I, T, A>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, A)>,
        T: Into<String>,
        A: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(text, author)| Quote::new(text, author))
                .collect(),
        )
    }

    /// Parse a JSON array of `{ "quote_cleaned": ..., "Author": ... }` records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<QuoteRecord> =
            serde_json::from_str(json).map_err(|e| EngineError::CorpusFormat(e.to_string()))?;
        Self::from_pairs(records.into_iter().map(|r| (r.quote_cleaned, r.author)))
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Uniformly random quote
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Quote {
        &self.quotes[rng.gen_range(0..self.quotes.len())]
    }
}
