//! Removal of exons that repeat a coordinate span within a chromosome.
//!
//! The same coding coordinates legitimately appear under several transcript
//! accessions, so the pass runs across the whole chromosome rather than per owner.

use std::collections::HashSet;

use log::debug;

use crate::annotation::{AnnotationGraph, ChromosomeKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupReport {
    pub removed: usize,
    pub remaining: usize,
}

/// Keep the first exon seen for each span (walking gene → accession → coding
/// sequence in id order) and detach every later exon with the same span.
pub fn deduplicate(graph: &mut AnnotationGraph, chromosome: ChromosomeKey) -> DedupReport {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for key in graph.chromosome_exons(chromosome) {
        if !seen.insert(graph.exon(key).span()) {
            duplicates.push(key);
        }
    }

    for &key in &duplicates {
        graph.remove_exon(key);
    }

    let report = DedupReport {
        removed: duplicates.len(),
        remaining: seen.len(),
    };
    debug!(
        "chromosome {}: removed {} duplicate exons, {} remaining",
        graph.chromosome(chromosome).id(),
        report.removed,
        report.remaining
    );
    report
}
