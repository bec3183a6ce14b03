//! Project state model.
//!
//! A [`ProjectState`] is an immutable snapshot of a source tree: ordered
//! primary sources, ordered additional text files, ordered analyzer-config
//! files, and a set of cross-project references. Files are replaced, never
//! mutated, on each transformation, so concurrent read access during a single
//! engine step is safe by construction.
//!
//! Insertion order is significant: it defines the default comparison order
//! for both diagnostics and documents. Paths are unique across the whole
//! state; a duplicate insertion is rejected with
//! [`crate::error::FailureKind::DuplicatePath`].

use std::collections::BTreeSet;

use crate::error::{FailureKind, VerifyError};

/// Text encoding attribute of a source file, compared by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 without byte order mark.
    Utf8,
    /// UTF-8 with byte order mark.
    Utf8Bom,
    /// UTF-16 little-endian.
    Utf16Le,
    /// UTF-16 big-endian.
    Utf16Be,
}

impl TextEncoding {
    /// The encoding's name, used for comparison and reporting.
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8 BOM",
            Self::Utf16Le => "utf-16LE",
            Self::Utf16Be => "utf-16BE",
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Checksum algorithm attribute of a source file, compared by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumAlgorithm {
    /// SHA-256.
    Sha256,
    /// BLAKE3.
    Blake3,
}

impl ChecksumAlgorithm {
    /// Compute the hex digest of the given text under this algorithm.
    ///
    /// Used for diff-failure reporting, not for content comparison (content
    /// is compared byte-for-byte).
    pub fn digest(self, text: &str) -> String {
        match self {
            Self::Sha256 => {
                use sha2::{Digest, Sha256};
                let mut hasher = Sha256::new();
                hasher.update(text.as_bytes());
                hasher
                    .finalize()
                    .iter()
                    .map(|byte| format!("{:02x}", byte))
                    .collect()
            }
            Self::Blake3 => blake3::hash(text.as_bytes()).to_hex().to_string(),
        }
    }
}

impl std::fmt::Display for ChecksumAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sha256 => f.write_str("sha-256"),
            Self::Blake3 => f.write_str("blake3"),
        }
    }
}

/// An immutable source file in a project state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File path with folder segments, `/`-separated.
    pub path: String,
    /// Full text content.
    pub content: String,
    /// Encoding attribute.
    pub encoding: TextEncoding,
    /// Checksum algorithm attribute.
    pub checksum_algorithm: ChecksumAlgorithm,
}

impl SourceFile {
    /// Create a UTF-8/SHA-256 source file, the default attributes.
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            encoding: TextEncoding::Utf8,
            checksum_algorithm: ChecksumAlgorithm::Sha256,
        }
    }

    /// Override the encoding attribute.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Override the checksum algorithm attribute.
    pub fn with_checksum_algorithm(mut self, algorithm: ChecksumAlgorithm) -> Self {
        self.checksum_algorithm = algorithm;
        self
    }

    /// The logical file name (final path segment).
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// The folder segments (all but the final path segment), in order.
    pub fn folders(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.path.split('/').collect();
        segments.pop();
        segments
    }

    /// Return a copy of this file with replaced content.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            content: content.into(),
            encoding: self.encoding,
            checksum_algorithm: self.checksum_algorithm,
        }
    }
}

/// An immutable project snapshot: sources, additional files, config files,
/// and cross-project references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectState {
    /// Primary source documents, in insertion order.
    pub sources: Vec<SourceFile>,
    /// Additional (non-source) text documents, in insertion order.
    pub additional_files: Vec<SourceFile>,
    /// Analyzer-config documents, in insertion order.
    pub config_files: Vec<SourceFile>,
    /// Names of referenced projects.
    pub references: BTreeSet<String>,
}

impl ProjectState {
    /// Create an empty project state.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(&self, path: &str) -> Result<(), VerifyError> {
        let taken = self
            .sources
            .iter()
            .chain(&self.additional_files)
            .chain(&self.config_files)
            .any(|file| file.path == path);
        if taken {
            Err(VerifyError::new(FailureKind::DuplicatePath(
                path.to_string(),
            )))
        } else {
            Ok(())
        }
    }

    /// Append a primary source document.
    pub fn add_source(mut self, file: SourceFile) -> Result<Self, VerifyError> {
        self.check_unique(&file.path)?;
        self.sources.push(file);
        Ok(self)
    }

    /// Append an additional text document.
    pub fn add_additional_file(mut self, file: SourceFile) -> Result<Self, VerifyError> {
        self.check_unique(&file.path)?;
        self.additional_files.push(file);
        Ok(self)
    }

    /// Append an analyzer-config document.
    pub fn add_config_file(mut self, file: SourceFile) -> Result<Self, VerifyError> {
        self.check_unique(&file.path)?;
        self.config_files.push(file);
        Ok(self)
    }

    /// Record a cross-project reference.
    pub fn add_reference(mut self, name: impl Into<String>) -> Self {
        self.references.insert(name.into());
        self
    }

    /// Look up a primary source by path.
    pub fn source(&self, path: &str) -> Option<&SourceFile> {
        self.sources.iter().find(|file| file.path == path)
    }

    /// Return a new state with one source's content replaced.
    ///
    /// This is the building block test transformers use to apply edits;
    /// the receiver is untouched.
    pub fn replace_source(&self, path: &str, content: impl Into<String>) -> Option<Self> {
        let index = self.sources.iter().position(|file| file.path == path)?;
        let mut next = self.clone();
        next.sources[index] = next.sources[index].with_content(content);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_and_folders() {
        let file = SourceFile::new("src/nested/mod.rs", "");
        assert_eq!(file.name(), "mod.rs");
        assert_eq!(file.folders(), ["src", "nested"]);

        let flat = SourceFile::new("main.rs", "");
        assert_eq!(flat.name(), "main.rs");
        assert!(flat.folders().is_empty());
    }

    #[test]
    fn test_duplicate_path_rejected_across_collections() {
        let project = ProjectState::new()
            .add_source(SourceFile::new("a.rs", ""))
            .unwrap();
        let err = project
            .clone()
            .add_additional_file(SourceFile::new("a.rs", ""))
            .unwrap_err();
        assert!(matches!(err.kind, FailureKind::DuplicatePath(path) if path == "a.rs"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let project = ProjectState::new()
            .add_source(SourceFile::new("b.rs", ""))
            .unwrap()
            .add_source(SourceFile::new("a.rs", ""))
            .unwrap();
        let paths: Vec<&str> = project.sources.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["b.rs", "a.rs"]);
    }

    #[test]
    fn test_replace_source_leaves_receiver_untouched() {
        let project = ProjectState::new()
            .add_source(SourceFile::new("a.rs", "before"))
            .unwrap();
        let next = project.replace_source("a.rs", "after").unwrap();
        assert_eq!(project.source("a.rs").unwrap().content, "before");
        assert_eq!(next.source("a.rs").unwrap().content, "after");
        assert!(project.replace_source("missing.rs", "x").is_none());
    }

    #[test]
    fn test_replace_source_keeps_attributes() {
        let project = ProjectState::new()
            .add_source(
                SourceFile::new("a.rs", "x")
                    .with_encoding(TextEncoding::Utf16Le)
                    .with_checksum_algorithm(ChecksumAlgorithm::Blake3),
            )
            .unwrap();
        let next = project.replace_source("a.rs", "y").unwrap();
        let file = next.source("a.rs").unwrap();
        assert_eq!(file.encoding, TextEncoding::Utf16Le);
        assert_eq!(file.checksum_algorithm, ChecksumAlgorithm::Blake3);
    }

    #[test]
    fn test_digest_is_stable_and_algorithm_specific() {
        let sha = ChecksumAlgorithm::Sha256.digest("abc");
        assert_eq!(
            sha,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let blake = ChecksumAlgorithm::Blake3.digest("abc");
        assert_eq!(blake.len(), 64);
        assert_ne!(sha, blake);
    }
}
