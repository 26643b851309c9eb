use cipher_core::{format_time, FrequencyReport, PuzzleView};
use std::io::{self, Write};

const RULE: &str = "----------------------------------------";

pub fn render(out: &mut impl Write, view: &PuzzleView, notice: Option<&str>) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "Level {}  {}  Score {}",
        view.level, view.family, view.score
    )?;
    writeln!(
        out,
        "{}  Hints {}",
        clock_label(view),
        view.hints_remaining
    )?;
    writeln!(out)?;

    writeln!(out, "  {}", view.ciphertext)?;
    writeln!(out, "  {}", view.decryption)?;
    if view.solved {
        writeln!(out, "  -- {}", view.author)?;
    }
    writeln!(out)?;

    if !view.used_plain_letters.is_empty() {
        let used: String = view.used_plain_letters.iter().collect();
        writeln!(out, "Used: {}", used)?;
    }
    if let Some(selected) = view.selected {
        writeln!(out, "Selected: {}", selected)?;
    }
    if !view.message.is_empty() {
        writeln!(out, "{}", view.message)?;
    }
    if let Some(notice) = notice {
        writeln!(out, "! {}", notice)?;
    }
    Ok(())
}

fn clock_label(view: &PuzzleView) -> String {
    match (view.time_remaining_secs, view.elapsed_secs) {
        (Some(remaining), _) => format!("Time left {}", format_time(remaining.max(0.0) as u64)),
        (None, Some(elapsed)) => format!("Time {}", format_time(elapsed.max(0.0) as u64)),
        (None, None) => String::new(),
    }
}

/// Observed vs. English percentages, one row per letter
pub fn render_frequency(out: &mut impl Write, report: &FrequencyReport) -> io::Result<()> {
    writeln!(out, "Letter  Cipher%  English%")?;
    for (letter, pct) in report.ranked() {
        let reference = report.reference.get(&letter).copied().unwrap_or(0.0);
        let bar = "#".repeat((pct / 2.0).round() as usize);
        writeln!(out, "  {}     {:5.1}    {:5.1}  {}", letter, pct, reference, bar)?;
    }
    match report.correlation {
        Some(r) => writeln!(out, "Correlation with English: {:.3}", r)?,
        None => writeln!(out, "Correlation needs all 26 letters in the ciphertext")?,
    }
    Ok(())
}
