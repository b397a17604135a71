// Colored terminal output for scan results, news, and tips.
//
// This module handles all terminal-specific formatting. The main.rs
// display calls delegate here; nothing in the analysis core prints.

use colored::Colorize;

use crate::analysis::result::{AnalysisResult, RiskLevel};
use crate::news::ScamNewsEntry;
use crate::stats::ScanStats;

/// Display a full scan verdict.
pub fn display_result(result: &AnalysisResult) {
    let url = super::truncate_chars(&result.url, 80);
    println!("\n{}", format!("=== Scan: {url} ===").bold());
    println!(
        "  Verdict: {}   Risk score: {}/100",
        colorize_level(result.risk_level),
        result.score
    );

    println!("\n  {}", result.summary);

    if !result.threats.is_empty() {
        println!("\n  Detected threats:");
        for threat in &result.threats {
            println!("    {} {}", "!".red(), threat);
        }
    }

    if !result.recommendations.is_empty() {
        println!("\n  Recommendations:");
        for rec in &result.recommendations {
            println!("    - {rec}");
        }
    }

    let tech = &result.technical_details;
    println!(
        "\n  {} protocol: {}  ip-literal: {}  punycode: {}{}",
        "Technical:".dimmed(),
        tech.protocol,
        yes_no(tech.is_ip_address),
        yes_no(tech.has_punycode),
        tech.domain_age
            .as_deref()
            .map(|age| format!("  domain age: {age}"))
            .unwrap_or_default(),
    );
    println!();
}

/// Display the scam-news feed.
pub fn display_news(entries: &[ScamNewsEntry]) {
    if entries.is_empty() {
        println!("No scam alerts published yet.");
        return;
    }

    println!("\n{}", "=== Latest Scam Alerts ===".bold());
    for entry in entries {
        println!();
        println!("  {} {}", entry.title.bold(), format!("[{}]", entry.id).dimmed());
        println!("  {}", format!("{} — {}", entry.date, entry.author).dimmed());
        println!("  {}", entry.description);
    }
    println!();
}

/// Display the daily tips list.
pub fn display_tips(tips: &[String]) {
    println!("\n{}", "=== Today's Security Tips ===".bold());
    for (i, tip) in tips.iter().enumerate() {
        println!("  {}. {tip}", i + 1);
    }
    println!();
}

/// Display the usage counters.
pub fn display_stats(stats: &ScanStats) {
    println!("\n{}", "=== Usage ===".bold());
    println!("  Scans analyzed: {}", stats.total);
    println!("  Safe:           {}", stats.safe.to_string().green());
    println!("  Suspicious:     {}", stats.suspicious.to_string().yellow());
    println!("  Dangerous:      {}", stats.dangerous.to_string().red());
    println!();
}

fn colorize_level(level: RiskLevel) -> colored::ColoredString {
    match level {
        RiskLevel::Safe => level.as_str().green().bold(),
        RiskLevel::Suspicious => level.as_str().yellow().bold(),
        RiskLevel::Dangerous => level.as_str().red().bold(),
        RiskLevel::Unknown => level.as_str().dimmed(),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
