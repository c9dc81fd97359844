//! Coding exons: coordinate spans with lazily materialized bases.

use std::fmt;

use crate::annotation::model::CodingSequenceKey;
use crate::bases::Bases;
use crate::error::Error;
use crate::source::SequenceSource;
use crate::strand::Strand;

/// An inclusive, 0-based coordinate range on a chromosome.
///
/// Spans order by `from`, then by `to`. Two exons with the same span are the same
/// exon for ordering and deduplication, whichever coding sequence owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExonSpan {
    pub from: u64,
    pub to: u64,
}

impl ExonSpan {
    pub fn new(from: u64, to: u64) -> Result<Self, Error> {
        if from > to {
            return Err(Error::Validation(format!(
                "exon start {from} is after its end {to}"
            )));
        }
        if to == u64::MAX {
            return Err(Error::Validation(format!("exon end {to} is out of range")));
        }
        Ok(Self { from, to })
    }

    /// Number of bases covered; always at least 1.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.to - self.from + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for ExonSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}

/// Materialization state of an exon's bases.
#[derive(Debug, Clone, Default)]
pub enum ExonBases {
    #[default]
    Unloaded,
    /// Bases on the exon's own strand, read from the named source.
    Loaded { source: String, bases: Bases },
}

/// A coding exon owned by exactly one coding sequence.
#[derive(Debug, Clone)]
pub struct Exon {
    id: String,
    span: ExonSpan,
    strand: Strand,
    owner: CodingSequenceKey,
    bases: ExonBases,
}

impl Exon {
    pub(crate) fn new(span: ExonSpan, strand: Strand, owner: CodingSequenceKey) -> Self {
        Self {
            id: Self::id_for(span),
            span,
            strand,
            owner,
            bases: ExonBases::Unloaded,
        }
    }

    /// Exons carry no catalog id; it is synthesized from the catalogued span.
    #[must_use]
    pub fn id_for(span: ExonSpan) -> String {
        span.to_string()
    }

    /// The id assigned at creation. It does not follow relocation.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn span(&self) -> ExonSpan {
        self.span
    }

    #[must_use]
    pub fn from(&self) -> u64 {
        self.span.from
    }

    #[must_use]
    pub fn to(&self) -> u64 {
        self.span.to
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.span.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn strand(&self) -> Strand {
        self.strand
    }

    #[must_use]
    pub fn owner(&self) -> CodingSequenceKey {
        self.owner
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.bases, ExonBases::Loaded { .. })
    }

    /// Read the exon's bases expressed on `strand` without touching the cache.
    ///
    /// Sources are laid out on the positive strand, so a negative-strand request
    /// returns the reverse complement of the raw bytes.
    pub fn read_bases<S: SequenceSource + ?Sized>(
        &self,
        strand: Strand,
        source: &mut S,
    ) -> Result<Bases, Error> {
        let raw = source.read_at(self.span.from, self.span.len() as usize)?;
        let bases = Bases::from_letters(&raw).map_err(|e| match e {
            Error::InvalidBase { letter, position } => Error::InvalidBase {
                letter,
                position: self.span.from as usize + position,
            },
            other => other,
        })?;
        Ok(if strand.is_negative() {
            bases.reverse_complement()
        } else {
            bases
        })
    }

    /// The exon's bases on its own strand, materialized from `source` on first access.
    ///
    /// Once loaded, the bases are tied to the source they came from: asking again with
    /// a different source is rejected rather than silently returning stale data.
    pub fn bases<S: SequenceSource + ?Sized>(&mut self, source: &mut S) -> Result<&Bases, Error> {
        if let ExonBases::Unloaded = self.bases {
            let bases = self.read_bases(self.strand, source)?;
            self.bases = ExonBases::Loaded {
                source: source.name().to_string(),
                bases,
            };
        }

        match &self.bases {
            ExonBases::Loaded {
                source: loaded_from,
                bases,
            } if loaded_from == source.name() => Ok(bases),
            ExonBases::Loaded {
                source: loaded_from,
                ..
            } => Err(Error::Validation(format!(
                "exon {} was materialized from {loaded_from}, cannot rebind to {}",
                self.id,
                source.name()
            ))),
            ExonBases::Unloaded => Err(Error::Validation(format!(
                "exon {} has no materialized bases",
                self.id
            ))),
        }
    }

    /// The cached bases expressed on `strand`: as-is when it matches the exon strand,
    /// otherwise reverse-complemented.
    pub fn bases_on<S: SequenceSource + ?Sized>(
        &mut self,
        strand: Strand,
        source: &mut S,
    ) -> Result<Bases, Error> {
        let own_strand = self.strand;
        let bases = self.bases(source)?;
        Ok(if strand == own_strand {
            bases.clone()
        } else {
            bases.reverse_complement()
        })
    }

    /// Move the exon to start at `from`, keeping its length.
    pub fn relocate(&mut self, from: u64) -> Result<(), Error> {
        if self.is_loaded() {
            return Err(Error::Validation(format!(
                "exon {} cannot be relocated after its bases were materialized",
                self.id
            )));
        }
        let to = from
            .checked_add(self.span.len() - 1)
            .ok_or_else(|| {
                Error::Validation(format!("exon {} cannot be relocated to {from}", self.id))
            })?;
        self.span = ExonSpan::new(from, to)?;
        Ok(())
    }
}
