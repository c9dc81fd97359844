//! Catalog row layout and the parsed row record.

use crate::annotation::{MatchType, Status};
use crate::exon::ExonSpan;
use crate::strand::Strand;

/// 0-based column positions in the tab-separated catalog.
pub mod columns {
    pub const CHROMOSOME: usize = 0;
    pub const NC_ACCESSION: usize = 1;
    pub const GENE: usize = 2;
    pub const GENE_ID: usize = 3;
    pub const CCDS_ID: usize = 4;
    pub const CCDS_STATUS: usize = 5;
    pub const CDS_STRAND: usize = 6;
    pub const CDS_FROM: usize = 7;
    pub const CDS_TO: usize = 8;
    pub const CDS_LOCATIONS: usize = 9;
    pub const MATCH_TYPE: usize = 10;

    /// Number of columns a row must have.
    pub const COUNT: usize = MATCH_TYPE + 1;
}

/// One coding-sequence row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub chromosome: String,
    pub accession: String,
    pub gene_name: String,
    pub gene_id: String,
    pub ccds_id: String,
    pub status: Status,
    pub strand: Strand,
    /// Overall coding range; `-` in the catalog for entries without coordinates.
    pub cds_from: Option<u64>,
    pub cds_to: Option<u64>,
    /// Exon spans; always empty for partial matches.
    pub locations: Vec<ExonSpan>,
    pub match_type: MatchType,
}
