use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use exonkit::cli;
use exonkit::config::ExportConfig;
use exonkit::export::ExportMode;
use exonkit::pipeline::{self, ChromosomeSummary, PipelineOptions};

#[derive(Parser)]
#[command(
    name = "export_exons",
    about = "Export CCDS exon bases and a location index per chromosome"
)]
struct Cli {
    /// Path to the JSON configuration file (defaults apply when omitted)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Directory holding the catalog and sequence files; overrides the configuration
    #[arg(short = 'd', long = "dir")]
    directory: Option<PathBuf>,

    /// Chromosomes to export, comma separated; overrides the configuration
    #[arg(long = "chromosomes", value_delimiter = ',')]
    chromosomes: Vec<String>,

    /// Locate every exon in the input sequence before exporting; writes the input-side exon files
    #[arg(long = "locate")]
    locate: bool,

    /// Index layout: plain, reference or resolved
    #[arg(short = 'm', long = "mode", default_value = "plain")]
    mode: String,
}

fn report(summary: &ChromosomeSummary) {
    let id = &summary.chromosome;
    if summary.is_empty() {
        cli::kv(&format!("chr{id}"), &"no catalog rows".dimmed().to_string());
        return;
    }

    let mut line = format!(
        "{} rows, {} duplicates removed",
        summary.parse.rows, summary.dedup.removed
    );
    if summary.parse.failed > 0 {
        line.push_str(&format!(", {} rows failed", summary.parse.failed));
    }
    if let Some(locate) = &summary.locate {
        line.push_str(&format!(
            ", {} located ({} moved), {} not found",
            locate.located, locate.moved, locate.not_found
        ));
    }
    if let Some(dedup) = &summary.relocated_dedup
        && dedup.removed > 0
    {
        line.push_str(&format!(", {} collapsed after locating", dedup.removed));
    }
    line.push_str(&format!(
        ", {} exons / {} bases exported",
        summary.export.exons, summary.export.bases
    ));
    cli::kv(&format!("chr{id}"), &line);
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();
    cli::init_logging();

    cli::banner("Export Exons");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let mode: ExportMode = cli_args
        .mode
        .parse()
        .with_context(|| format!("invalid --mode '{}'", cli_args.mode))?;
    let mut config = ExportConfig::load(cli_args.config.as_deref())?;
    config
        .apply_overrides(cli_args.directory, cli_args.chromosomes)
        .context("invalid command-line overrides")?;

    cli::kv("Directory", &config.directory.display().to_string());
    cli::kv("Catalog", &config.catalog_path().display().to_string());
    cli::kv("Chromosomes", &config.chromosomes.join(","));
    cli::kv("Locate", if cli_args.locate { "yes" } else { "no" });
    cli::kv("Mode", &mode.to_string());
    eprintln!();

    // ── Export ───────────────────────────────────────────
    cli::section("Export");

    let options = PipelineOptions {
        locate: cli_args.locate,
        mode,
    };
    let mut total_bases = 0u64;
    let mut total_exons = 0usize;
    let mut failed = 0usize;
    for id in &config.chromosomes {
        match pipeline::process_chromosome(&config, id, &options) {
            Ok(summary) => {
                report(&summary);
                total_bases += summary.export.bases;
                total_exons += summary.export.exons;
            }
            Err(e) => {
                cli::warning(&format!("chr{id}: {e}"));
                failed += 1;
            }
        }
    }
    eprintln!();

    if failed == config.chromosomes.len() {
        bail!("no chromosome could be exported");
    }
    cli::success(&format!(
        "{total_exons} exons exported from {} of {} chromosomes",
        config.chromosomes.len() - failed,
        config.chromosomes.len()
    ));
    cli::print_summary(start, total_bases);
    Ok(())
}
