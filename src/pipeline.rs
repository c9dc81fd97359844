//! Per-chromosome export: catalog → dedup → (locate → dedup) → export → verify.
//!
//! Every sequence file is opened inside [`process_chromosome`] and dropped before it
//! returns, on success or failure.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::annotation::{AnnotationGraph, ChromosomeKey};
use crate::catalog::{self, ParseReport};
use crate::config::ExportConfig;
use crate::dedup::{DedupReport, deduplicate};
use crate::error::Error;
use crate::export::{ExonExporter, ExportMode, ExportReport, read_index, verify_alignment};
use crate::fasta;
use crate::locate::{LocateReport, locate_exons};
use crate::source::{FlatSequenceFile, MemorySequence, SequenceSource};

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Resolve exon coordinates against the input sequence before exporting.
    pub locate: bool,
    pub mode: ExportMode,
}

/// What happened to one chromosome.
#[derive(Debug, Clone, Default)]
pub struct ChromosomeSummary {
    pub chromosome: String,
    pub parse: ParseReport,
    pub dedup: DedupReport,
    pub locate: Option<LocateReport>,
    /// Second deduplication, run only after locating.
    pub relocated_dedup: Option<DedupReport>,
    pub export: ExportReport,
}

impl ChromosomeSummary {
    /// True when the catalog had no rows for the chromosome and nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parse.rows == 0
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>, Error> {
    let file = File::create(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to create {}: {e}", path.display()),
        ))
    })?;
    Ok(BufWriter::new(file))
}

/// Outputs are written under this name and renamed once verified.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".partial");
    PathBuf::from(name)
}

fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != ErrorKind::NotFound
    {
        warn!("failed to remove {}: {e}", path.display());
    }
}

fn write_outputs(
    graph: &mut AnnotationGraph,
    chromosome: ChromosomeKey,
    source: &mut dyn SequenceSource,
    bases_path: &Path,
    locations_path: &Path,
    mode: ExportMode,
) -> Result<ExportReport, Error> {
    let mut bases_out = create_output(bases_path)?;
    let mut index_out = create_output(locations_path)?;
    ExonExporter::write(graph, chromosome, source, &mut bases_out, &mut index_out, mode)
}

/// Run the whole export for `chromosome_id`.
///
/// Without locating, exon coordinates refer to the reference bases file and bases are
/// read from it. With locating, the exons are moved onto the input bases file and
/// read from there. Each mode writes its own pair of output files, and neither
/// file appears unless the export completed and verified.
pub fn process_chromosome(
    config: &ExportConfig,
    chromosome_id: &str,
    options: &PipelineOptions,
) -> Result<ChromosomeSummary, Error> {
    let mut summary = ChromosomeSummary {
        chromosome: chromosome_id.to_string(),
        ..Default::default()
    };

    let mut graph = AnnotationGraph::new();
    summary.parse = catalog::parse_catalog_file(&config.catalog_path(), &mut graph, chromosome_id)?;
    let Some(chromosome) = graph.find_chromosome(chromosome_id) else {
        warn!("chromosome {chromosome_id}: no catalog rows");
        return Ok(summary);
    };

    summary.dedup = deduplicate(&mut graph, chromosome);

    let mut reference = FlatSequenceFile::open(&config.reference_bases_path(chromosome_id))?;
    let mut target: Option<MemorySequence> = None;
    if options.locate {
        let input = MemorySequence::load(&config.input_bases_path(chromosome_id))?;
        summary.locate = Some(locate_exons(
            &mut graph,
            chromosome,
            &mut reference,
            input.as_bytes(),
        )?);
        summary.relocated_dedup = Some(deduplicate(&mut graph, chromosome));
        target = Some(input);
    }

    let source: &mut dyn SequenceSource = match target.as_mut() {
        Some(input) => input,
        None => &mut reference,
    };

    let (bases_path, locations_path) = config.export_paths(chromosome_id, options.locate);
    let bases_partial = partial_path(&bases_path);
    let locations_partial = partial_path(&locations_path);
    let written = write_outputs(
        &mut graph,
        chromosome,
        source,
        &bases_partial,
        &locations_partial,
        options.mode,
    )
    .and_then(|report| {
        verify_output(&bases_partial, &locations_partial, &report)?;
        std::fs::rename(&bases_partial, &bases_path)?;
        std::fs::rename(&locations_partial, &locations_path)?;
        Ok(report)
    });
    summary.export = match written {
        Ok(report) => report,
        Err(e) => {
            discard(&bases_partial);
            discard(&locations_partial);
            return Err(e);
        }
    };

    info!(
        "chromosome {chromosome_id}: wrote {} and {}",
        bases_path.display(),
        locations_path.display()
    );
    Ok(summary)
}

/// Re-read the written files and check that index and bases agree.
pub fn verify_output(
    bases_path: &Path,
    locations_path: &Path,
    expected: &ExportReport,
) -> Result<(), Error> {
    let records = read_index(BufReader::new(File::open(locations_path)?))?;
    if records.len() != expected.exons {
        return Err(Error::Validation(format!(
            "verification failed: expected {} index records, got {}",
            expected.exons,
            records.len()
        )));
    }
    let bases_len = std::fs::metadata(bases_path)?.len();
    if bases_len != expected.bases {
        return Err(Error::Validation(format!(
            "verification failed: expected {} bases, file holds {bases_len}",
            expected.bases
        )));
    }
    verify_alignment(&records, bases_len)
}

/// Flatten the reference FASTA of `chromosome_id`, and the input FASTA as well when
/// `include_input` is set. Returns the number of bases written per file.
pub fn flatten_chromosome(
    config: &ExportConfig,
    chromosome_id: &str,
    include_input: bool,
) -> Result<Vec<(String, u64)>, Error> {
    let mut pairs = vec![(
        config.reference_fasta_path(chromosome_id),
        config.reference_bases_path(chromosome_id),
    )];
    if include_input {
        pairs.push((
            config.input_fasta_path(chromosome_id),
            config.input_bases_path(chromosome_id),
        ));
    }

    let mut written = Vec::with_capacity(pairs.len());
    for (fasta_path, bases_path) in pairs {
        let bases = fasta::flatten_fasta_file(&fasta_path, &bases_path)?;
        info!(
            "chromosome {chromosome_id}: {} → {} ({bases} bases)",
            fasta_path.display(),
            bases_path.display()
        );
        written.push((bases_path.display().to_string(), bases));
    }
    Ok(written)
}
