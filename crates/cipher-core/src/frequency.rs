//! Letter-frequency statistics for a ciphertext.
//!
//! The report is plain data for an external chart renderer: observed
//! percentages for the letters that occur, the English reference table, and
//! the Pearson correlation between the two once every letter has appeared.

use crate::cipher::{index_letter, letter_index, ALPHABET_LEN};
use serde::Serialize;
use std::collections::BTreeMap;

/// Relative frequency of each letter A..Z in English text, in percent
pub const ENGLISH_FREQUENCIES: [f64; ALPHABET_LEN] = [
    8.167, 1.492, 2.782, 4.253, 12.702, 2.228, 2.015, 6.094, 6.966, 0.153, 0.772, 4.025, 2.406,
    6.749, 7.507, 1.929, 0.095, 5.987, 6.327, 9.056, 2.758, 0.978, 2.360, 0.150, 1.974, 0.074,
];

const VARIANCE_EPSILON: f64 = 1e-9;

/// Frequency statistics of one ciphertext
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyReport {
    /// Percent of all letters, for letters present in the text only
    pub observed: BTreeMap<char, f64>,
    /// [`ENGLISH_FREQUENCIES`] keyed by letter
    pub reference: BTreeMap<char, f64>,
    /// Pearson coefficient, present only when all 26 letters occur
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<f64>,
    /// Number of letters counted
    pub letter_count: usize,
}

impl FrequencyReport {
    /// Observed percentages A..Z with absent letters as 0
    pub fn observed_vector(&self) -> [f64; ALPHABET_LEN] {
        std::array::from_fn(|idx| {
            self.observed
                .get(&index_letter(idx))
                .copied()
                .unwrap_or(0.0)
        })
    }

    /// Whether every letter of the alphabet occurs
    pub fn covers_alphabet(&self) -> bool {
        self.observed.len() == ALPHABET_LEN
    }

    /// Observed letters, most frequent first (ties alphabetical)
    pub fn ranked(&self) -> Vec<(char, f64)> {
        let mut ranked: Vec<(char, f64)> = self.observed.iter().map(|(&c, &p)| (c, p)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

/// Count letters of `ciphertext` and compare with English
pub fn analyze(ciphertext: &str) -> FrequencyReport {
    let mut counts = [0usize; ALPHABET_LEN];
    for idx in ciphertext
        .chars()
        .filter_map(|c| letter_index(c.to_ascii_uppercase()))
    {
        counts[idx] += 1;
    }
    let total: usize = counts.iter().sum();

    let observed: BTreeMap<char, f64> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(idx, &count)| (index_letter(idx), count as f64 / total as f64 * 100.0))
        .collect();

    let reference: BTreeMap<char, f64> = ENGLISH_FREQUENCIES
        .iter()
        .enumerate()
        .map(|(idx, &pct)| (index_letter(idx), pct))
        .collect();

    let mut report = FrequencyReport {
        observed,
        reference,
        correlation: None,
        letter_count: total,
    };
    if report.covers_alphabet() {
        report.correlation = pearson(&report.observed_vector(), &ENGLISH_FREQUENCIES);
    }
    report
}

/// Pearson correlation coefficient; `None` when either series is constant
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.is_empty() {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    // Rounding leaves a constant series with a tiny nonzero variance
    if var_x < VARIANCE_EPSILON || var_y < VARIANCE_EPSILON {
        return None;
    }
    let r = cov / (var_x * var_y).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}
