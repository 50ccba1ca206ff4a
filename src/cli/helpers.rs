//! Shared helper functions for CLI commands.

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

use crate::models::{AnalysisResult, ReadabilityLabel, Severity, Suggestion};

/// Truncate for display, appending "..." when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Spinner shown while a document is being reviewed.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

pub fn styled_score(score: u8) -> StyledObject<String> {
    let text = format!("{:>3}", score);
    match score {
        80.. => style(text).green(),
        60..=79 => style(text).yellow(),
        _ => style(text).red(),
    }
}

pub fn styled_readability(label: ReadabilityLabel) -> StyledObject<&'static str> {
    match label {
        ReadabilityLabel::Excellent | ReadabilityLabel::VeryGood => style(label.as_str()).green(),
        ReadabilityLabel::Good => style(label.as_str()).cyan(),
        ReadabilityLabel::Fair => style(label.as_str()).yellow(),
        ReadabilityLabel::Poor => style(label.as_str()).red(),
    }
}

fn styled_severity(severity: Severity) -> StyledObject<&'static str> {
    match severity {
        Severity::High => style(severity.as_str()).red().bold(),
        Severity::Medium => style(severity.as_str()).yellow(),
        Severity::Low => style(severity.as_str()).dim(),
    }
}

/// Print score, counts and readability.
pub fn print_summary(result: &AnalysisResult) {
    println!(
        "  {:<14} {}/100",
        "Score:",
        styled_score(result.score)
    );
    println!(
        "  {:<14} {}",
        "Readability:",
        styled_readability(result.readability)
    );
    println!(
        "  {:<14} {} grammar, {} formatting, {} style",
        "Issues:", result.grammar_issues, result.formatting_issues, result.style_issues
    );
}

/// Print suggestions as an indented list.
pub fn print_suggestions(suggestions: &[Suggestion]) {
    if suggestions.is_empty() {
        println!("  {}", style("No suggestions").dim());
        return;
    }
    println!("\n  {}", style("Suggestions:").cyan());
    for (i, s) in suggestions.iter().enumerate() {
        println!(
            "  {:>2}. [{} / {}] {}",
            i + 1,
            style(s.kind.as_str()).bold(),
            styled_severity(s.severity),
            s.issue
        );
        if !s.suggestion.is_empty() {
            println!("      {} {}", style("→").green(), s.suggestion);
        }
        if !s.explanation.is_empty() {
            println!("      {}", style(&s.explanation).dim());
        }
    }
}
