//! exonkit: extract CCDS coding exons from chromosome sequences into a packed
//! bases file and a location index.

pub mod error;

pub mod annotation;
pub mod bases;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod exon;
pub mod export;
pub mod fasta;
pub mod locate;
pub mod perf;
pub mod pipeline;
pub mod source;
pub mod strand;
