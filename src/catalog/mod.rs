//! CCDS catalog reader: populates an [`AnnotationGraph`] one chromosome at a time.

pub mod entry;
pub mod parser;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::annotation::{AnnotationGraph, MatchType};
use crate::error::Error;

use entry::CatalogRow;
use parser::ParsedLine;

/// Counts gathered while compiling one chromosome from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Rows on the requested chromosome that were applied to the graph.
    pub rows: usize,
    /// Rows on other chromosomes.
    pub skipped: usize,
    /// Rows that failed to parse; each is logged and dropped.
    pub failed: usize,
    /// Rows repeating a coding-sequence id already seen under the same accession.
    pub duplicates: usize,
    /// Rows whose match type was not recognized.
    pub unknown_match_types: usize,
    /// Exons attached to the graph.
    pub exons: usize,
}

/// Compile the rows of `chromosome_id` from the catalog file at `path`.
pub fn parse_catalog_file(
    path: &Path,
    graph: &mut AnnotationGraph,
    chromosome_id: &str,
) -> Result<ParseReport, Error> {
    let file = File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open catalog {}: {e}", path.display()),
        ))
    })?;
    parse_catalog(BufReader::new(file), graph, chromosome_id)
}

/// Compile the rows of `chromosome_id` from a catalog reader into `graph`.
///
/// A malformed row is logged and skipped; the remaining rows are still read. Only I/O
/// failures abort the parse.
pub fn parse_catalog<R: BufRead>(
    reader: R,
    graph: &mut AnnotationGraph,
    chromosome_id: &str,
) -> Result<ParseReport, Error> {
    let mut report = ParseReport::default();

    for (line_num, raw) in reader.split(b'\n').enumerate() {
        let line_num = line_num + 1;
        let raw = raw?;
        let parsed = String::from_utf8(raw)
            .map_err(|e| Error::Parse(format!("line is not valid UTF-8: {e}")))
            .and_then(|line| parser::parse_line(&line, chromosome_id));
        match parsed {
            Ok(ParsedLine::Row(row)) => apply_row(graph, *row, &mut report),
            Ok(ParsedLine::OtherChromosome) => report.skipped += 1,
            Ok(ParsedLine::Comment) => continue,
            Err(e) => {
                warn!("skipping catalog line {line_num}: {e}");
                report.failed += 1;
            }
        }
    }

    debug!(
        "chromosome {chromosome_id}: {} rows, {} exons, {} failed",
        report.rows, report.exons, report.failed
    );
    Ok(report)
}

fn apply_row(graph: &mut AnnotationGraph, row: CatalogRow, report: &mut ParseReport) {
    if let MatchType::Unknown(ref raw) = row.match_type {
        warn!("{}: unknown match type '{raw}'", row.ccds_id);
        report.unknown_match_types += 1;
    }

    let chromosome = graph.get_or_insert_chromosome(&row.chromosome);
    let gene = graph.get_or_insert_gene(chromosome, &row.gene_id, &row.gene_name, row.strand);
    let accession = graph.get_or_insert_accession(gene, &row.accession);
    let (coding_sequence, created) =
        graph.get_or_insert_coding_sequence(accession, &row.ccds_id, row.status, row.match_type);

    report.rows += 1;
    if !created {
        warn!(
            "{}: repeated under accession {}, keeping the first row",
            row.ccds_id, row.accession
        );
        report.duplicates += 1;
        return;
    }

    for span in row.locations {
        let before = graph.exon_count();
        match graph.get_or_insert_exon(coding_sequence, span.from, span.to) {
            Ok(_) if graph.exon_count() > before => report.exons += 1,
            Ok(_) => debug!("{}: exon {span} listed twice", row.ccds_id),
            Err(e) => warn!("{}: {e}", row.ccds_id),
        }
    }
}
