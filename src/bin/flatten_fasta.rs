use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;

use exonkit::cli;
use exonkit::config::ExportConfig;
use exonkit::pipeline;

#[derive(Parser)]
#[command(
    name = "flatten_fasta",
    about = "Convert per-chromosome FASTA files into flat base files"
)]
struct Cli {
    /// Path to the JSON configuration file (defaults apply when omitted)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Directory holding the FASTA files; overrides the configuration
    #[arg(short = 'd', long = "dir")]
    directory: Option<PathBuf>,

    /// Chromosomes to convert, comma separated; overrides the configuration
    #[arg(long = "chromosomes", value_delimiter = ',')]
    chromosomes: Vec<String>,

    /// Also convert the input (sample) FASTA files
    #[arg(long = "input")]
    input: bool,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();
    cli::init_logging();

    cli::banner("Flatten FASTA");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let mut config = ExportConfig::load(cli_args.config.as_deref())?;
    config
        .apply_overrides(cli_args.directory, cli_args.chromosomes)
        .context("invalid command-line overrides")?;

    cli::kv("Directory", &config.directory.display().to_string());
    cli::kv("Chromosomes", &config.chromosomes.join(","));
    cli::kv("Input FASTA", if cli_args.input { "yes" } else { "no" });
    eprintln!();

    // ── Conversion ───────────────────────────────────────
    cli::section("Conversion");

    let mut total_bases = 0u64;
    let mut failed = 0usize;
    for id in &config.chromosomes {
        match pipeline::flatten_chromosome(&config, id, cli_args.input) {
            Ok(written) => {
                for (path, bases) in written {
                    cli::kv(&format!("chr{id}"), &format!("{path} ({bases} bases)"));
                    total_bases += bases;
                }
            }
            Err(e) => {
                cli::warning(&format!("chr{id}: {e}"));
                failed += 1;
            }
        }
    }
    eprintln!();

    if failed == config.chromosomes.len() {
        bail!("no chromosome could be converted");
    }
    cli::success(&format!(
        "{} of {} chromosomes converted",
        config.chromosomes.len() - failed,
        config.chromosomes.len()
    ));
    cli::print_summary(start, total_bases);
    Ok(())
}
