//! Shared console output for the exonkit binaries.

use std::time::Instant;

use colored::Colorize;

use crate::perf;

pub fn banner(subtitle: &str) {
    eprintln!();
    eprintln!("{} {}", "exonkit".bold().cyan(), subtitle.dimmed());
    eprintln!();
}

pub fn section(title: &str) {
    let bar = "─".repeat(50);
    eprintln!("{} {}", title.bold().blue(), bar.dimmed());
}

pub fn kv(key: &str, value: &str) {
    eprintln!("  {:<20} {}", key.dimmed(), value);
}

pub fn success(msg: &str) {
    eprintln!("  {} {}", "✓".green().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg.yellow());
}

/// Final block: elapsed time, and throughput when `bases` were processed.
pub fn print_summary(start: Instant, bases: u64) {
    let elapsed = start.elapsed();
    eprintln!();
    eprintln!("{}  {}", "Time".dimmed(), perf::format_elapsed(elapsed).bold());
    if bases > 0 {
        eprintln!(
            "{}  {} ({})",
            "Bases".dimmed(),
            perf::format_bases(bases).bold(),
            perf::throughput(bases, elapsed).unwrap_or_else(|| "N/A".to_string())
        );
    }
    eprintln!();
}

/// Route `log` output to stderr; `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_env("RUST_LOG")
        .init();
}
