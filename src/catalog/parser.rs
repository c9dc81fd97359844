//! Catalog line and location-list parser.

use crate::annotation::{MatchType, Status};
use crate::error::Error;
use crate::exon::ExonSpan;
use crate::strand::Strand;

use super::entry::{CatalogRow, columns};

/// Result of parsing a single catalog line.
#[derive(Debug)]
pub enum ParsedLine {
    Row(Box<CatalogRow>),
    /// A row belonging to a chromosome other than the one being compiled.
    OtherChromosome,
    Comment,
}

/// Parse one catalog line, keeping only rows on `chromosome_id`.
pub fn parse_line(line: &str, chromosome_id: &str) -> Result<ParsedLine, Error> {
    if line.starts_with('#') || line.trim().is_empty() {
        return Ok(ParsedLine::Comment);
    }

    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if fields.len() < columns::COUNT {
        return Err(Error::Parse(format!(
            "catalog row has {} columns, expected {}",
            fields.len(),
            columns::COUNT
        )));
    }

    let chromosome = fields[columns::CHROMOSOME].trim();
    if chromosome != chromosome_id {
        return Ok(ParsedLine::OtherChromosome);
    }

    let ccds_id = fields[columns::CCDS_ID].trim();
    let strand: Strand = fields[columns::CDS_STRAND]
        .parse()
        .map_err(|e| Error::Parse(format!("{ccds_id}: {e}")))?;
    let status = Status::from_catalog(fields[columns::CCDS_STATUS]);
    let match_type = MatchType::from_catalog(fields[columns::MATCH_TYPE]);

    let cds_from = parse_optional_position(ccds_id, fields[columns::CDS_FROM])?;
    let cds_to = parse_optional_position(ccds_id, fields[columns::CDS_TO])?;

    let locations = if match_type.is_partial() {
        Vec::new()
    } else {
        parse_locations(ccds_id, fields[columns::CDS_LOCATIONS])?
    };

    Ok(ParsedLine::Row(Box::new(CatalogRow {
        chromosome: chromosome.to_string(),
        accession: fields[columns::NC_ACCESSION].trim().to_string(),
        gene_name: fields[columns::GENE].trim().to_string(),
        gene_id: fields[columns::GENE_ID].trim().to_string(),
        ccds_id: ccds_id.to_string(),
        status,
        strand,
        cds_from,
        cds_to,
        locations,
        match_type,
    })))
}

fn parse_optional_position(ccds_id: &str, value: &str) -> Result<Option<u64>, Error> {
    let value = value.trim();
    if value.is_empty() || value == "-" {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e| Error::Parse(format!("{ccds_id}: invalid position '{value}': {e}")))
}

/// Parse a location list such as `[34-56, 102-210]` into exon spans.
///
/// `[]` and `-` denote an entry without locations.
pub fn parse_locations(ccds_id: &str, value: &str) -> Result<Vec<ExonSpan>, Error> {
    let value = value.trim();
    if value == "-" {
        return Ok(Vec::new());
    }

    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or_else(|| {
            Error::Parse(format!(
                "{ccds_id}: location list is not bracketed: '{value}'"
            ))
        })?;
    let inner: String = inner.chars().filter(|c| !c.is_whitespace()).collect();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|pair| parse_location(ccds_id, pair))
        .collect()
}

fn parse_location(ccds_id: &str, pair: &str) -> Result<ExonSpan, Error> {
    let (start, stop) = pair
        .split_once('-')
        .ok_or_else(|| Error::Parse(format!("{ccds_id}: location missing '-': '{pair}'")))?;
    let from: u64 = start
        .parse()
        .map_err(|e| Error::Parse(format!("{ccds_id}: invalid location start '{start}': {e}")))?;
    let to: u64 = stop
        .parse()
        .map_err(|e| Error::Parse(format!("{ccds_id}: invalid location end '{stop}': {e}")))?;
    ExonSpan::new(from, to).map_err(|e| Error::Parse(format!("{ccds_id}: {e}")))
}
