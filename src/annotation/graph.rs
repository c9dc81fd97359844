//! Arena-backed annotation graph: chromosome → gene → accession → coding sequence → exon.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::exon::{Exon, ExonSpan};
use crate::strand::Strand;

use super::model::{
    Accession, AccessionKey, Chromosome, ChromosomeKey, CodingSequence, CodingSequenceKey, ExonKey,
    Gene, GeneKey, MatchType, Status,
};

/// Owns every annotation entity.
///
/// Entities are created through the `get_or_insert_*` factories: asking for an id that
/// already exists under the same parent returns the existing key and ignores the
/// remaining construction arguments. Children are kept in id order, so every walk
/// over the graph is deterministic.
#[derive(Debug, Default)]
pub struct AnnotationGraph {
    chromosomes: Vec<Chromosome>,
    chromosome_ids: BTreeMap<String, ChromosomeKey>,
    genes: Vec<Gene>,
    accessions: Vec<Accession>,
    coding_sequences: Vec<CodingSequence>,
    exons: Vec<Exon>,
}

impl AnnotationGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_insert_chromosome(&mut self, id: &str) -> ChromosomeKey {
        if let Some(&key) = self.chromosome_ids.get(id) {
            return key;
        }
        let key = ChromosomeKey(self.chromosomes.len());
        self.chromosomes.push(Chromosome {
            id: id.to_string(),
            genes: BTreeMap::new(),
        });
        self.chromosome_ids.insert(id.to_string(), key);
        key
    }

    pub fn get_or_insert_gene(
        &mut self,
        chromosome: ChromosomeKey,
        id: &str,
        name: &str,
        strand: Strand,
    ) -> GeneKey {
        if let Some(&key) = self.chromosomes[chromosome.0].genes.get(id) {
            return key;
        }
        let key = GeneKey(self.genes.len());
        self.genes.push(Gene {
            id: id.to_string(),
            name: name.to_string(),
            strand,
            chromosome,
            accessions: BTreeMap::new(),
        });
        self.chromosomes[chromosome.0]
            .genes
            .insert(id.to_string(), key);
        key
    }

    pub fn get_or_insert_accession(&mut self, gene: GeneKey, id: &str) -> AccessionKey {
        if let Some(&key) = self.genes[gene.0].accessions.get(id) {
            return key;
        }
        let key = AccessionKey(self.accessions.len());
        self.accessions.push(Accession {
            id: id.to_string(),
            gene,
            strand: self.genes[gene.0].strand,
            coding_sequences: BTreeMap::new(),
        });
        self.genes[gene.0].accessions.insert(id.to_string(), key);
        key
    }

    /// Returns the key and whether a new entry was created.
    pub fn get_or_insert_coding_sequence(
        &mut self,
        accession: AccessionKey,
        id: &str,
        status: Status,
        match_type: MatchType,
    ) -> (CodingSequenceKey, bool) {
        if let Some(&key) = self.accessions[accession.0].coding_sequences.get(id) {
            return (key, false);
        }
        let key = CodingSequenceKey(self.coding_sequences.len());
        self.coding_sequences.push(CodingSequence {
            id: id.to_string(),
            status,
            match_type,
            accession,
            strand: self.accessions[accession.0].strand,
            exons: BTreeMap::new(),
        });
        self.accessions[accession.0]
            .coding_sequences
            .insert(id.to_string(), key);
        (key, true)
    }

    /// Attach an exon spanning `from..=to` to `coding_sequence`, or return the one
    /// it already owns for that span.
    pub fn get_or_insert_exon(
        &mut self,
        coding_sequence: CodingSequenceKey,
        from: u64,
        to: u64,
    ) -> Result<ExonKey, Error> {
        let span = ExonSpan::new(from, to)?;
        let id = Exon::id_for(span);
        let owner = &self.coding_sequences[coding_sequence.0];
        if let Some(&key) = owner.exons.get(&id) {
            return Ok(key);
        }
        let key = ExonKey(self.exons.len());
        self.exons.push(Exon::new(span, owner.strand, coding_sequence));
        self.coding_sequences[coding_sequence.0]
            .exons
            .insert(id, key);
        Ok(key)
    }

    #[must_use]
    pub fn find_chromosome(&self, id: &str) -> Option<ChromosomeKey> {
        self.chromosome_ids.get(id).copied()
    }

    #[must_use]
    pub fn chromosome(&self, key: ChromosomeKey) -> &Chromosome {
        &self.chromosomes[key.0]
    }

    #[must_use]
    pub fn gene(&self, key: GeneKey) -> &Gene {
        &self.genes[key.0]
    }

    #[must_use]
    pub fn accession(&self, key: AccessionKey) -> &Accession {
        &self.accessions[key.0]
    }

    #[must_use]
    pub fn coding_sequence(&self, key: CodingSequenceKey) -> &CodingSequence {
        &self.coding_sequences[key.0]
    }

    #[must_use]
    pub fn exon(&self, key: ExonKey) -> &Exon {
        &self.exons[key.0]
    }

    pub fn exon_mut(&mut self, key: ExonKey) -> &mut Exon {
        &mut self.exons[key.0]
    }

    /// All chromosomes in id order.
    pub fn chromosomes(&self) -> impl Iterator<Item = ChromosomeKey> + '_ {
        self.chromosome_ids.values().copied()
    }

    pub fn genes_of(&self, chromosome: ChromosomeKey) -> impl Iterator<Item = GeneKey> + '_ {
        self.chromosomes[chromosome.0].genes.values().copied()
    }

    pub fn accessions_of(&self, gene: GeneKey) -> impl Iterator<Item = AccessionKey> + '_ {
        self.genes[gene.0].accessions.values().copied()
    }

    pub fn coding_sequences_of(
        &self,
        accession: AccessionKey,
    ) -> impl Iterator<Item = CodingSequenceKey> + '_ {
        self.accessions[accession.0]
            .coding_sequences
            .values()
            .copied()
    }

    /// Exons still attached to `coding_sequence`, in id order.
    pub fn exons_of(
        &self,
        coding_sequence: CodingSequenceKey,
    ) -> impl Iterator<Item = ExonKey> + '_ {
        self.coding_sequences[coding_sequence.0]
            .exons
            .values()
            .copied()
    }

    /// Every coding sequence on a chromosome, walking gene → accession → entry.
    #[must_use]
    pub fn chromosome_coding_sequences(&self, chromosome: ChromosomeKey) -> Vec<CodingSequenceKey> {
        self.genes_of(chromosome)
            .flat_map(|gene| self.accessions_of(gene))
            .flat_map(|accession| self.coding_sequences_of(accession))
            .collect()
    }

    /// Every attached exon on a chromosome, in walk order.
    #[must_use]
    pub fn chromosome_exons(&self, chromosome: ChromosomeKey) -> Vec<ExonKey> {
        self.chromosome_coding_sequences(chromosome)
            .into_iter()
            .flat_map(|cds| self.exons_of(cds))
            .collect()
    }

    /// Whether the exon is still listed by its owner.
    #[must_use]
    pub fn is_attached(&self, key: ExonKey) -> bool {
        let exon = &self.exons[key.0];
        self.coding_sequences[exon.owner().0]
            .exons
            .values()
            .any(|&k| k == key)
    }

    /// Detach an exon from its owning coding sequence. The exon stays in the arena but
    /// is no longer reachable through the graph. Returns false if it was already
    /// detached.
    pub fn remove_exon(&mut self, key: ExonKey) -> bool {
        let owner = self.exons[key.0].owner();
        let exons = &mut self.coding_sequences[owner.0].exons;
        let before = exons.len();
        exons.retain(|_, &mut k| k != key);
        exons.len() != before
    }

    #[must_use]
    pub fn chromosome_count(&self) -> usize {
        self.chromosomes.len()
    }

    #[must_use]
    pub fn coding_sequence_count(&self) -> usize {
        self.coding_sequences.len()
    }

    /// Number of exons ever created, attached or not.
    #[must_use]
    pub fn exon_count(&self) -> usize {
        self.exons.len()
    }
}
