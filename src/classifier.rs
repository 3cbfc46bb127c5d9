//! File classification against a rule catalog.
//!
//! The decision procedure for a single file walks the catalog in priority
//! order, checking each category's extensions before its patterns, then
//! falls back to MIME inference keyed on the file name alone (no content is
//! read), and finally to the catch-all. Folder classification applies this
//! to every direct child that is a regular file and groups the results into
//! a [`Classification`].

use crate::rules::{CATCH_ALL, MimeRole, RuleCatalog};
use std::fs;
use std::path::{Path, PathBuf};

/// How far the fallback chain runs for a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifyMode {
    /// Extension match, then per-category patterns, then MIME inference.
    #[default]
    Full,
    /// Extension match or the catch-all; no patterns, no MIME inference.
    ExtensionOnly,
}

/// Error raised when the target folder cannot be listed.
///
/// Per-file stat failures during enumeration are skipped, never propagated.
#[derive(Debug)]
pub struct ClassifyError {
    pub path: PathBuf,
    pub source: std::io::Error,
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Failed to read directory {}: {}",
            self.path.display(),
            self.source
        )
    }
}

impl std::error::Error for ClassifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// A partition of a file set into categories.
///
/// Groups appear in order of first encounter; files within a group keep
/// their classification order. Every classified file lands in exactly one
/// group.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    groups: Vec<(String, Vec<PathBuf>)>,
}

impl Classification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a file to its category's group, creating the group on first
    /// encounter.
    pub fn insert(&mut self, category: &str, file: PathBuf) {
        match self.groups.iter_mut().find(|(name, _)| name == category) {
            Some((_, files)) => files.push(file),
            None => self.groups.push((category.to_string(), vec![file])),
        }
    }

    /// Iterates groups in first-encounter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> {
        self.groups
            .iter()
            .map(|(name, files)| (name.as_str(), files.as_slice()))
    }

    /// Files assigned to a category, if any were.
    pub fn get(&self, category: &str) -> Option<&[PathBuf]> {
        self.groups
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, files)| files.as_slice())
    }

    /// Total number of classified files.
    pub fn total_files(&self) -> usize {
        self.groups.iter().map(|(_, files)| files.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Classifies files against a [`RuleCatalog`].
#[derive(Debug, Clone)]
pub struct Classifier {
    catalog: RuleCatalog,
    mode: ClassifyMode,
}

impl Classifier {
    pub fn new(catalog: RuleCatalog) -> Self {
        Self {
            catalog,
            mode: ClassifyMode::default(),
        }
    }

    pub fn with_mode(catalog: RuleCatalog, mode: ClassifyMode) -> Self {
        Self { catalog, mode }
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Returns the category name for a single file path.
    ///
    /// Only the file name is consulted; the file need not exist. Rule
    /// evaluation order: for each category in catalog order, extensions
    /// first, then that category's patterns, returning on the first hit at
    /// any category. An extension match at an earlier category therefore
    /// always beats a pattern match at a later one.
    pub fn classify_one(&self, file: &Path) -> &str {
        let extension = file
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let file_name = file
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        for category in self.catalog.categories() {
            if category.matches_extension(&extension) {
                return &category.name;
            }
            if self.mode == ClassifyMode::Full && category.matches_pattern(&file_name) {
                return &category.name;
            }
        }

        if self.mode == ClassifyMode::Full
            && let Some(category) = self.mime_fallback(file)
        {
            return category;
        }

        CATCH_ALL
    }

    /// MIME inference keyed on the file name, mapped through the catalog's
    /// role markers.
    fn mime_fallback(&self, file: &Path) -> Option<&str> {
        use mime_guess::mime;

        let guessed = mime_guess::from_path(file).first()?;
        let top = guessed.type_();
        let role = if top == mime::IMAGE {
            MimeRole::Image
        } else if top == mime::VIDEO {
            MimeRole::Video
        } else if top == mime::AUDIO {
            MimeRole::Audio
        } else if top == mime::TEXT {
            MimeRole::Document
        } else if top == mime::APPLICATION {
            let subtype = guessed.subtype().as_str();
            if subtype.contains("zip") || subtype.contains("compressed") {
                MimeRole::Archive
            } else {
                MimeRole::Document
            }
        } else {
            return None;
        };
        self.catalog.mime_target(role)
    }

    /// Classifies every regular file directly under `folder`.
    ///
    /// Symbolic links to files are followed. Directories, and entries that
    /// vanish or fail to stat between listing and inspection, are skipped
    /// silently. Group order follows the enumeration order of the
    /// filesystem, which is unspecified; correctness does not depend on it.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] only when the top-level listing fails.
    pub fn classify_folder(&self, folder: &Path) -> Result<Classification, ClassifyError> {
        let entries = fs::read_dir(folder).map_err(|e| ClassifyError {
            path: folder.to_path_buf(),
            source: e,
        })?;

        let mut classification = Classification::new();
        for entry in entries.flatten() {
            let path = entry.path();
            // fs::metadata follows symlinks; a failed stat means the entry
            // vanished or is unreadable, and is skipped.
            let Ok(metadata) = fs::metadata(&path) else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let category = self.classify_one(&path).to_string();
            classification.insert(&category, path);
        }

        Ok(classification)
    }
}
