//! Annotation entities and the keys that address them inside an [`AnnotationGraph`].
//!
//! [`AnnotationGraph`]: super::graph::AnnotationGraph

use std::collections::BTreeMap;
use std::fmt;

use crate::strand::Strand;

macro_rules! entity_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            #[must_use]
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

entity_key!(
    /// Addresses a [`Chromosome`].
    ChromosomeKey
);
entity_key!(
    /// Addresses a [`Gene`].
    GeneKey
);
entity_key!(
    /// Addresses an [`Accession`].
    AccessionKey
);
entity_key!(
    /// Addresses a [`CodingSequence`].
    CodingSequenceKey
);
entity_key!(
    /// Addresses an [`Exon`](crate::exon::Exon).
    ExonKey
);

/// Review status of a coding-sequence entry. Only public entries are exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Public,
    Withdrawn,
    Reviewed,
}

impl Status {
    /// Decode the catalog status column: `public` and `withdrawn` (any case) are
    /// recognized, every other value is a reviewed state.
    #[must_use]
    pub fn from_catalog(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "public" => Self::Public,
            "withdrawn" => Self::Withdrawn,
            _ => Self::Reviewed,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "Public"),
            Self::Withdrawn => write!(f, "Withdrawn"),
            Self::Reviewed => write!(f, "Reviewed"),
        }
    }
}

/// How the coding sequence matches its accession.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchType {
    Identical,
    Partial,
    /// An unrecognized catalog value, kept verbatim for diagnostics.
    Unknown(String),
}

impl MatchType {
    #[must_use]
    pub fn from_catalog(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "identical" => Self::Identical,
            "partial" => Self::Partial,
            _ => Self::Unknown(trimmed.to_string()),
        }
    }

    #[must_use]
    pub fn is_partial(&self) -> bool {
        *self == Self::Partial
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical => write!(f, "Identical"),
            Self::Partial => write!(f, "Partial"),
            Self::Unknown(raw) => write!(f, "Unknown({raw})"),
        }
    }
}

/// One of the reference units (1-22, X, Y).
#[derive(Debug, Clone)]
pub struct Chromosome {
    pub(crate) id: String,
    pub(crate) genes: BTreeMap<String, GeneKey>,
}

impl Chromosome {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }
}

/// A gene locus. Its strand is fixed when the gene is first seen.
#[derive(Debug, Clone)]
pub struct Gene {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) strand: Strand,
    pub(crate) chromosome: ChromosomeKey,
    pub(crate) accessions: BTreeMap<String, AccessionKey>,
}

impl Gene {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn chromosome(&self) -> ChromosomeKey {
        self.chromosome
    }
}

/// A transcript or sequence accession under a gene.
#[derive(Debug, Clone)]
pub struct Accession {
    pub(crate) id: String,
    pub(crate) gene: GeneKey,
    pub(crate) strand: Strand,
    pub(crate) coding_sequences: BTreeMap<String, CodingSequenceKey>,
}

impl Accession {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn gene(&self) -> GeneKey {
        self.gene
    }

    /// Inherited from the gene.
    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }
}

/// One CCDS entry and the exons it still owns.
#[derive(Debug, Clone)]
pub struct CodingSequence {
    pub(crate) id: String,
    pub(crate) status: Status,
    pub(crate) match_type: MatchType,
    pub(crate) accession: AccessionKey,
    pub(crate) strand: Strand,
    pub(crate) exons: BTreeMap<String, ExonKey>,
}

impl CodingSequence {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.status == Status::Public
    }

    #[must_use]
    pub fn match_type(&self) -> &MatchType {
        &self.match_type
    }

    #[must_use]
    pub fn accession(&self) -> AccessionKey {
        self.accession
    }

    /// Inherited from the accession.
    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }

    #[must_use]
    pub fn has_exon(&self, id: &str) -> bool {
        self.exons.contains_key(id)
    }
}
