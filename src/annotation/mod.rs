//! In-memory annotation model built from the CCDS catalog.

pub mod graph;
pub mod model;

pub use graph::AnnotationGraph;
pub use model::{
    Accession, AccessionKey, Chromosome, ChromosomeKey, CodingSequence, CodingSequenceKey, ExonKey,
    Gene, GeneKey, MatchType, Status,
};
