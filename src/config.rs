use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Placeholder replaced by the chromosome id in every per-chromosome file name.
pub const CHROMOSOME_PLACEHOLDER: char = '?';

/// Where the export finds its inputs and writes its outputs.
///
/// Every field is optional in the JSON file; missing ones take the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    pub directory: PathBuf,
    pub catalog_file_name: String,
    pub reference_fasta_file_name: String,
    pub reference_bases_file_name: String,
    /// Exon outputs when coordinates stay on the reference assembly.
    pub reference_exon_bases_file_name: String,
    pub reference_exon_locations_file_name: String,
    pub input_fasta_file_name: String,
    pub input_bases_file_name: String,
    /// Exon outputs when coordinates were located on the input sequence.
    pub exon_bases_file_name: String,
    pub exon_locations_file_name: String,
    pub chromosomes: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let mut chromosomes: Vec<String> = (1..=22).map(|i| i.to_string()).collect();
        chromosomes.push("X".to_string());
        chromosomes.push("Y".to_string());

        Self {
            directory: PathBuf::from("./"),
            catalog_file_name: "CCDS.current.txt".to_string(),
            reference_fasta_file_name: "hs_ref_GRCh37.p13_chr?.fa".to_string(),
            reference_bases_file_name: "hs_ref_GRCh37.p13_chr?.bases".to_string(),
            reference_exon_bases_file_name: "hs_ref_GRCh37.p13_chr?.exons.bases".to_string(),
            reference_exon_locations_file_name: "hs_ref_GRCh37.p13_chr?.exons.locations"
                .to_string(),
            input_fasta_file_name: "chromosome?.fa".to_string(),
            input_bases_file_name: "chromosome?.bases".to_string(),
            exon_bases_file_name: "chromosome?.exons.bases".to_string(),
            exon_locations_file_name: "chromosome?.exons.locations".to_string(),
            chromosomes,
        }
    }
}

impl ExportConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise start from the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Replace the directory and chromosome list with command-line values, then
    /// re-validate.
    pub fn apply_overrides(
        &mut self,
        directory: Option<PathBuf>,
        chromosomes: Vec<String>,
    ) -> Result<()> {
        if let Some(directory) = directory {
            self.directory = directory;
        }
        if !chromosomes.is_empty() {
            self.chromosomes = chromosomes;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        for (name, template) in self.templates() {
            if !template.contains(CHROMOSOME_PLACEHOLDER) {
                bail!("'{name}' must contain '{CHROMOSOME_PLACEHOLDER}': '{template}'");
            }
        }

        if self.chromosomes.is_empty() {
            bail!("no chromosomes configured");
        }
        let mut seen = HashSet::new();
        for id in &self.chromosomes {
            if id.trim().is_empty() {
                bail!("empty chromosome id");
            }
            if !seen.insert(id.as_str()) {
                bail!("chromosome '{id}' listed twice");
            }
        }

        Ok(())
    }

    /// The per-chromosome file name templates as (JSON key, template) pairs.
    pub fn templates(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            ("referenceFastaFileName", self.reference_fasta_file_name.as_str()),
            ("referenceBasesFileName", self.reference_bases_file_name.as_str()),
            (
                "referenceExonBasesFileName",
                self.reference_exon_bases_file_name.as_str(),
            ),
            (
                "referenceExonLocationsFileName",
                self.reference_exon_locations_file_name.as_str(),
            ),
            ("inputFastaFileName", self.input_fasta_file_name.as_str()),
            ("inputBasesFileName", self.input_bases_file_name.as_str()),
            ("exonBasesFileName", self.exon_bases_file_name.as_str()),
            ("exonLocationsFileName", self.exon_locations_file_name.as_str()),
        ]
        .into_iter()
    }

    fn resolve(&self, template: &str, chromosome: &str) -> PathBuf {
        self.directory
            .join(template.replace(CHROMOSOME_PLACEHOLDER, chromosome))
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.directory.join(&self.catalog_file_name)
    }

    #[must_use]
    pub fn reference_fasta_path(&self, chromosome: &str) -> PathBuf {
        self.resolve(&self.reference_fasta_file_name, chromosome)
    }

    #[must_use]
    pub fn reference_bases_path(&self, chromosome: &str) -> PathBuf {
        self.resolve(&self.reference_bases_file_name, chromosome)
    }

    #[must_use]
    pub fn reference_exon_bases_path(&self, chromosome: &str) -> PathBuf {
        self.resolve(&self.reference_exon_bases_file_name, chromosome)
    }

    #[must_use]
    pub fn reference_exon_locations_path(&self, chromosome: &str) -> PathBuf {
        self.resolve(&self.reference_exon_locations_file_name, chromosome)
    }

    #[must_use]
    pub fn input_fasta_path(&self, chromosome: &str) -> PathBuf {
        self.resolve(&self.input_fasta_file_name, chromosome)
    }

    #[must_use]
    pub fn input_bases_path(&self, chromosome: &str) -> PathBuf {
        self.resolve(&self.input_bases_file_name, chromosome)
    }

    #[must_use]
    pub fn exon_bases_path(&self, chromosome: &str) -> PathBuf {
        self.resolve(&self.exon_bases_file_name, chromosome)
    }

    #[must_use]
    pub fn exon_locations_path(&self, chromosome: &str) -> PathBuf {
        self.resolve(&self.exon_locations_file_name, chromosome)
    }

    /// The (bases, locations) pair an export writes: the reference-side files when
    /// coordinates are the catalog's own, the input-side files after locating.
    #[must_use]
    pub fn export_paths(&self, chromosome: &str, located: bool) -> (PathBuf, PathBuf) {
        if located {
            (
                self.exon_bases_path(chromosome),
                self.exon_locations_path(chromosome),
            )
        } else {
            (
                self.reference_exon_bases_path(chromosome),
                self.reference_exon_locations_path(chromosome),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(json.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.chromosomes.len(), 24);
        assert_eq!(config.chromosomes[0], "1");
        assert_eq!(config.chromosomes[23], "Y");
        assert!(config.validate().is_ok());
        assert_eq!(
            config.reference_bases_path("X"),
            Path::new("./").join("hs_ref_GRCh37.p13_chrX.bases")
        );
        assert_eq!(config.catalog_path(), Path::new("./").join("CCDS.current.txt"));
    }

    #[test]
    fn empty_object_uses_defaults() {
        let f = write_config("{}");
        let config = ExportConfig::from_file(f.path()).unwrap();
        assert_eq!(config.catalog_file_name, "CCDS.current.txt");
        assert_eq!(config.chromosomes.len(), 24);
    }

    #[test]
    fn partial_override() {
        let json = r#"{
            "directory": "/data/ccds",
            "exonBasesFileName": "exons.?.bases",
            "chromosomes": ["21", "22"]
        }"#;
        let f = write_config(json);
        let config = ExportConfig::from_file(f.path()).unwrap();
        assert_eq!(config.chromosomes, vec!["21", "22"]);
        assert_eq!(
            config.exon_bases_path("21"),
            PathBuf::from("/data/ccds/exons.21.bases")
        );
        assert_eq!(
            config.exon_locations_path("22"),
            PathBuf::from("/data/ccds/chromosome22.exons.locations")
        );
        assert_eq!(
            config.input_fasta_path("21"),
            PathBuf::from("/data/ccds/chromosome21.fa")
        );
    }

    #[test]
    fn reference_and_located_outputs_are_distinct() {
        let config = ExportConfig::default();
        let (ref_bases, ref_locations) = config.export_paths("7", false);
        let (bases, locations) = config.export_paths("7", true);
        assert_eq!(
            ref_bases,
            Path::new("./").join("hs_ref_GRCh37.p13_chr7.exons.bases")
        );
        assert_eq!(
            ref_locations,
            Path::new("./").join("hs_ref_GRCh37.p13_chr7.exons.locations")
        );
        assert_eq!(bases, Path::new("./").join("chromosome7.exons.bases"));
        assert_eq!(locations, Path::new("./").join("chromosome7.exons.locations"));
    }

    #[test]
    fn template_without_placeholder() {
        let f = write_config(r#"{ "inputBasesFileName": "chromosome.bases" }"#);
        let err = ExportConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("inputBasesFileName"));
    }

    #[test]
    fn chromosome_list_checks() {
        let f = write_config(r#"{ "chromosomes": [] }"#);
        let err = ExportConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("no chromosomes"));

        let f = write_config(r#"{ "chromosomes": ["1", "2", "1"] }"#);
        let err = ExportConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn command_line_overrides() {
        let mut config = ExportConfig::load(None).unwrap();
        config
            .apply_overrides(Some(PathBuf::from("/tmp/x")), vec!["X".to_string()])
            .unwrap();
        assert_eq!(config.chromosomes, vec!["X"]);
        assert_eq!(
            config.input_bases_path("X"),
            PathBuf::from("/tmp/x/chromosomeX.bases")
        );

        let err = config
            .apply_overrides(None, vec!["1".to_string(), "1".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn malformed_json() {
        let f = write_config("{ directory: ");
        let err = ExportConfig::from_file(f.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
