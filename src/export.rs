//! Packed exon export: a bases file of concatenated exon letters plus a location index.
//!
//! Each index line describes one exon as `offset,length`, optionally followed by a
//! third field depending on the [`ExportMode`]. `offset` counts bases already
//! written, so the records tile the bases file without gaps.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use log::info;

use crate::annotation::{AnnotationGraph, ChromosomeKey, ExonKey};
use crate::error::Error;
use crate::exon::ExonSpan;
use crate::source::SequenceSource;
use crate::strand::Strand;

/// What the bases file holds and what the index carries besides offset and length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportMode {
    /// Bases on the exon's own strand; `offset,length`.
    #[default]
    Plain,
    /// Bases on the exon's own strand; `offset,length,strand`.
    Reference,
    /// Positive-strand bases; `offset,length,sourcePosition`.
    Resolved,
}

impl FromStr for ExportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "reference" => Ok(Self::Reference),
            "resolved" => Ok(Self::Resolved),
            _ => Err(Error::Parse(format!("unknown export mode: '{s}'"))),
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Plain => "plain",
            Self::Reference => "reference",
            Self::Resolved => "resolved",
        };
        f.write_str(s)
    }
}

/// Optional third field of an index line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexDetail {
    None,
    Strand(Strand),
    SourcePosition(u64),
}

/// One line of the location index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    pub offset: u64,
    pub length: u64,
    pub detail: IndexDetail,
}

impl fmt::Display for IndexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.offset, self.length)?;
        match self.detail {
            IndexDetail::None => Ok(()),
            IndexDetail::Strand(strand) => write!(f, ",{strand}"),
            IndexDetail::SourcePosition(position) => write!(f, ",{position}"),
        }
    }
}

impl FromStr for IndexRecord {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim().split(',').collect();
        if !(2..=3).contains(&fields.len()) {
            return Err(Error::Parse(format!(
                "index line has {} fields, expected 2 or 3: '{line}'",
                fields.len()
            )));
        }

        let number = |value: &str| -> Result<u64, Error> {
            value
                .parse()
                .map_err(|e| Error::Parse(format!("invalid index field '{value}': {e}")))
        };

        let detail = match fields.get(2) {
            None => IndexDetail::None,
            Some(&"+") | Some(&"-") => IndexDetail::Strand(fields[2].parse()?),
            Some(value) => IndexDetail::SourcePosition(number(*value)?),
        };

        Ok(Self {
            offset: number(fields[0])?,
            length: number(fields[1])?,
            detail,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    /// Index records written.
    pub exons: usize,
    /// Bases written.
    pub bases: u64,
}

/// Writes the exons of one chromosome.
pub struct ExonExporter;

impl ExonExporter {
    /// Export the attached exons of every public coding sequence on `chromosome`.
    ///
    /// Exons are written in ascending span order; when two exons share a span the
    /// first one encountered in walk order is written. Bases are materialized from
    /// `source`, which must be the file the exon coordinates refer to.
    pub fn write<S, B, I>(
        graph: &mut AnnotationGraph,
        chromosome: ChromosomeKey,
        source: &mut S,
        bases_out: &mut B,
        index_out: &mut I,
        mode: ExportMode,
    ) -> Result<ExportReport, Error>
    where
        S: SequenceSource + ?Sized,
        B: Write + ?Sized,
        I: Write + ?Sized,
    {
        let ordered = Self::collect_exons(graph, chromosome);
        let mut report = ExportReport::default();

        for key in ordered.into_values() {
            let exon = graph.exon_mut(key);
            let (strand, from) = (exon.strand(), exon.from());
            let letters = match mode {
                ExportMode::Plain | ExportMode::Reference => exon.bases(source)?.to_bytes(),
                ExportMode::Resolved => exon.bases_on(Strand::Positive, source)?.to_bytes(),
            };

            let record = IndexRecord {
                offset: report.bases,
                length: letters.len() as u64,
                detail: match mode {
                    ExportMode::Plain => IndexDetail::None,
                    ExportMode::Reference => IndexDetail::Strand(strand),
                    ExportMode::Resolved => IndexDetail::SourcePosition(from),
                },
            };
            bases_out.write_all(&letters)?;
            writeln!(index_out, "{record}")?;

            report.bases += record.length;
            report.exons += 1;
        }

        bases_out.flush()?;
        index_out.flush()?;

        info!(
            "chromosome {}: exported {} exons ({} bases, {mode} mode)",
            graph.chromosome(chromosome).id(),
            report.exons,
            report.bases
        );
        Ok(report)
    }

    fn collect_exons(graph: &AnnotationGraph, chromosome: ChromosomeKey) -> BTreeMap<ExonSpan, ExonKey> {
        let mut ordered = BTreeMap::new();
        for cds in graph.chromosome_coding_sequences(chromosome) {
            if !graph.coding_sequence(cds).is_public() {
                continue;
            }
            for key in graph.exons_of(cds) {
                ordered.entry(graph.exon(key).span()).or_insert(key);
            }
        }
        ordered
    }
}

/// Parse a location index back into records. Blank lines are ignored.
pub fn read_index<R: BufRead>(reader: R) -> Result<Vec<IndexRecord>, Error> {
    let mut records = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = line
            .parse::<IndexRecord>()
            .map_err(|e| Error::Parse(format!("index line {}: {e}", line_num + 1)))?;
        records.push(record);
    }
    Ok(records)
}

/// Check that the records tile a bases file of `bases_len` bytes exactly.
pub fn verify_alignment(records: &[IndexRecord], bases_len: u64) -> Result<(), Error> {
    let mut expected = 0u64;
    for (i, record) in records.iter().enumerate() {
        if record.offset != expected {
            return Err(Error::Validation(format!(
                "index record {i} starts at {}, expected {expected}",
                record.offset
            )));
        }
        expected += record.length;
    }
    if expected != bases_len {
        return Err(Error::Validation(format!(
            "index covers {expected} bases but the bases file holds {bases_len}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{CodingSequenceKey, MatchType, Status};
    use crate::source::MemorySequence;
    use std::io::Cursor;

    struct Fixture {
        graph: AnnotationGraph,
        chr: ChromosomeKey,
    }

    impl Fixture {
        fn new() -> Self {
            let mut graph = AnnotationGraph::new();
            let chr = graph.get_or_insert_chromosome("1");
            Self { graph, chr }
        }

        fn cds(&mut self, id: &str, status: Status, strand: Strand) -> CodingSequenceKey {
            let gene = self.graph.get_or_insert_gene(self.chr, id, id, strand);
            let acc = self.graph.get_or_insert_accession(gene, "NC_1");
            self.graph
                .get_or_insert_coding_sequence(acc, id, status, MatchType::Identical)
                .0
        }

        fn export(&mut self, reference: &[u8], mode: ExportMode) -> (String, String, ExportReport) {
            let mut source = MemorySequence::new("ref", reference.to_vec());
            let mut bases = Vec::new();
            let mut index = Vec::new();
            let report = ExonExporter::write(
                &mut self.graph,
                self.chr,
                &mut source,
                &mut bases,
                &mut index,
                mode,
            )
            .unwrap();
            (
                String::from_utf8(bases).unwrap(),
                String::from_utf8(index).unwrap(),
                report,
            )
        }
    }

    #[test]
    fn single_entry_plain() {
        let mut fx = Fixture::new();
        let cds = fx.cds("CCDS1.1", Status::Public, Strand::Positive);
        fx.graph.get_or_insert_exon(cds, 0, 2).unwrap();
        fx.graph.get_or_insert_exon(cds, 5, 7).unwrap();

        let (bases, index, report) = fx.export(b"AAACCGGGT", ExportMode::Plain);
        assert_eq!(bases, "AAAGGG");
        assert_eq!(index, "0,3\n3,3\n");
        assert_eq!(report, ExportReport { exons: 2, bases: 6 });
    }

    #[test]
    fn offsets_accumulate() {
        let mut fx = Fixture::new();
        let cds = fx.cds("CCDS1.1", Status::Public, Strand::Positive);
        fx.graph.get_or_insert_exon(cds, 40, 69).unwrap();
        fx.graph.get_or_insert_exon(cds, 0, 11).unwrap();
        fx.graph.get_or_insert_exon(cds, 20, 24).unwrap();

        let (bases, index, report) = fx.export(&[b'A'; 80], ExportMode::Plain);
        assert_eq!(index, "0,12\n12,5\n17,30\n");
        assert_eq!(bases.len(), 47);
        assert_eq!(report.bases, 47);
    }

    #[test]
    fn ascending_order_across_coding_sequences() {
        let mut fx = Fixture::new();
        let late = fx.cds("CCDS1.1", Status::Public, Strand::Positive);
        let early = fx.cds("CCDS2.1", Status::Public, Strand::Positive);
        fx.graph.get_or_insert_exon(late, 6, 7).unwrap();
        fx.graph.get_or_insert_exon(early, 0, 1).unwrap();

        let (bases, _, _) = fx.export(b"ACGTTTGG", ExportMode::Plain);
        assert_eq!(bases, "ACGG");
    }

    #[test]
    fn shared_span_written_once() {
        let mut fx = Fixture::new();
        let a = fx.cds("CCDS1.1", Status::Public, Strand::Positive);
        let b = fx.cds("CCDS2.1", Status::Public, Strand::Positive);
        fx.graph.get_or_insert_exon(a, 0, 3).unwrap();
        fx.graph.get_or_insert_exon(b, 0, 3).unwrap();

        let (bases, index, report) = fx.export(b"ACGT", ExportMode::Plain);
        assert_eq!(bases, "ACGT");
        assert_eq!(index, "0,4\n");
        assert_eq!(report.exons, 1);
    }

    #[test]
    fn non_public_entries_excluded() {
        let mut fx = Fixture::new();
        let withdrawn = fx.cds("CCDS1.1", Status::Withdrawn, Strand::Positive);
        let reviewed = fx.cds("CCDS2.1", Status::Reviewed, Strand::Positive);
        let public = fx.cds("CCDS3.1", Status::Public, Strand::Positive);
        fx.graph.get_or_insert_exon(withdrawn, 0, 1).unwrap();
        fx.graph.get_or_insert_exon(reviewed, 2, 3).unwrap();
        fx.graph.get_or_insert_exon(public, 4, 5).unwrap();

        let (bases, index, _) = fx.export(b"AACCGG", ExportMode::Plain);
        assert_eq!(bases, "GG");
        assert_eq!(index, "0,2\n");
    }

    #[test]
    fn detached_exons_excluded() {
        let mut fx = Fixture::new();
        let cds = fx.cds("CCDS1.1", Status::Public, Strand::Positive);
        let gone = fx.graph.get_or_insert_exon(cds, 0, 1).unwrap();
        fx.graph.get_or_insert_exon(cds, 2, 3).unwrap();
        fx.graph.remove_exon(gone);

        let (bases, _, _) = fx.export(b"AACC", ExportMode::Plain);
        assert_eq!(bases, "CC");
    }

    #[test]
    fn reference_mode_writes_strand() {
        let mut fx = Fixture::new();
        let neg = fx.cds("CCDS1.1", Status::Public, Strand::Negative);
        let pos = fx.cds("CCDS2.1", Status::Public, Strand::Positive);
        fx.graph.get_or_insert_exon(neg, 0, 2).unwrap();
        fx.graph.get_or_insert_exon(pos, 3, 4).unwrap();

        let (bases, index, _) = fx.export(b"AACGT", ExportMode::Reference);
        assert_eq!(bases, "GTTGT");
        assert_eq!(index, "0,3,-\n3,2,+\n");
    }

    #[test]
    fn resolved_mode_writes_positive_strand_and_position() {
        let mut fx = Fixture::new();
        let neg = fx.cds("CCDS1.1", Status::Public, Strand::Negative);
        let exon = fx.graph.get_or_insert_exon(neg, 1, 3).unwrap();
        fx.graph.exon_mut(exon).relocate(2).unwrap();

        let (bases, index, _) = fx.export(b"TTAACG", ExportMode::Resolved);
        assert_eq!(bases, "AAC");
        assert_eq!(index, "0,3,2\n");
    }

    #[test]
    fn exon_past_source_end_fails() {
        let mut fx = Fixture::new();
        let cds = fx.cds("CCDS1.1", Status::Public, Strand::Positive);
        fx.graph.get_or_insert_exon(cds, 2, 9).unwrap();

        let mut source = MemorySequence::new("ref", b"ACGT".to_vec());
        let result = ExonExporter::write(
            &mut fx.graph,
            fx.chr,
            &mut source,
            &mut Vec::<u8>::new(),
            &mut Vec::<u8>::new(),
            ExportMode::Plain,
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("plain".parse::<ExportMode>().unwrap(), ExportMode::Plain);
        assert_eq!("Reference".parse::<ExportMode>().unwrap(), ExportMode::Reference);
        assert_eq!(" resolved ".parse::<ExportMode>().unwrap(), ExportMode::Resolved);
        assert!("packed".parse::<ExportMode>().is_err());
        assert_eq!(ExportMode::Resolved.to_string(), "resolved");
    }

    #[test]
    fn read_index_all_forms() {
        let records = read_index(Cursor::new("0,3\n3,2,-\n5,4,1200\n\n")).unwrap();
        assert_eq!(
            records,
            vec![
                IndexRecord {
                    offset: 0,
                    length: 3,
                    detail: IndexDetail::None
                },
                IndexRecord {
                    offset: 3,
                    length: 2,
                    detail: IndexDetail::Strand(Strand::Negative)
                },
                IndexRecord {
                    offset: 5,
                    length: 4,
                    detail: IndexDetail::SourcePosition(1200)
                },
            ]
        );
        assert!(verify_alignment(&records, 9).is_ok());
    }

    #[test]
    fn read_index_rejects_bad_lines() {
        let err = read_index(Cursor::new("0,3\n3\n")).unwrap_err();
        assert!(err.to_string().contains("index line 2"));
        assert!(read_index(Cursor::new("0,x\n")).is_err());
    }

    #[test]
    fn misaligned_index_rejected() {
        let records = read_index(Cursor::new("0,3\n4,2\n")).unwrap();
        assert!(matches!(
            verify_alignment(&records, 6),
            Err(Error::Validation(_))
        ));

        let records = read_index(Cursor::new("0,3\n3,2\n")).unwrap();
        assert!(verify_alignment(&records, 6).is_err());
        assert!(verify_alignment(&records, 5).is_ok());
    }
}
