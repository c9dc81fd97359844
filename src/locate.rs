//! Relocation of exons onto a chromosome sequence from a different assembly or sample.
//!
//! Each exon's bases are read from a reference source whose coordinates match the
//! catalog, then searched for verbatim in the target sequence. The first match from
//! the left becomes the exon's new start.

use log::{debug, info};
use memchr::memmem;

use crate::annotation::{AnnotationGraph, ChromosomeKey, ExonKey};
use crate::error::Error;
use crate::source::SequenceSource;
use crate::strand::Strand;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocateReport {
    /// Exons found in the target.
    pub located: usize,
    /// Located exons whose start changed.
    pub moved: usize,
    /// Exons absent from the target; these were detached from their owners.
    pub not_found: usize,
}

/// First offset of `needle` in `haystack`, scanning from the start.
#[must_use]
pub fn find_first(haystack: &[u8], needle: &[u8]) -> Option<u64> {
    memmem::find(haystack, needle).map(|offset| offset as u64)
}

/// Resolve the exons of every public coding sequence on `chromosome` against `target`.
///
/// `reference` supplies the bases at the catalogued coordinates; it is read without
/// caching so the exons can still be materialized later from the authoritative source.
/// Every search covers the whole target from offset 0. Exons that cannot be found are
/// collected per accession and detached once that accession has been scanned.
pub fn locate_exons<S: SequenceSource + ?Sized>(
    graph: &mut AnnotationGraph,
    chromosome: ChromosomeKey,
    reference: &mut S,
    target: &[u8],
) -> Result<LocateReport, Error> {
    let mut report = LocateReport::default();

    let accessions: Vec<_> = graph
        .genes_of(chromosome)
        .flat_map(|gene| graph.accessions_of(gene))
        .collect();

    for accession in accessions {
        let exons: Vec<ExonKey> = graph
            .coding_sequences_of(accession)
            .filter(|&cds| graph.coding_sequence(cds).is_public())
            .flat_map(|cds| graph.exons_of(cds))
            .collect();

        let mut not_found = Vec::new();
        for key in exons {
            let letters = graph
                .exon(key)
                .read_bases(Strand::Positive, reference)?
                .to_bytes();
            match find_first(target, &letters) {
                Some(from) => {
                    let exon = graph.exon_mut(key);
                    if exon.from() != from {
                        debug!("exon {} moved to {from}", exon.id());
                        report.moved += 1;
                    }
                    exon.relocate(from)?;
                    report.located += 1;
                }
                None => not_found.push(key),
            }
        }

        for &key in &not_found {
            debug!("exon {} not found in target", graph.exon(key).id());
            graph.remove_exon(key);
        }
        report.not_found += not_found.len();
    }

    info!(
        "chromosome {}: {} exons located ({} moved), {} not found",
        graph.chromosome(chromosome).id(),
        report.located,
        report.moved,
        report.not_found
    );
    Ok(report)
}
