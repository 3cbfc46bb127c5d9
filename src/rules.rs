//! Category rule store.
//!
//! A [`RuleCatalog`] holds named categories in priority order: each category
//! carries a set of dot-prefixed extensions, optional filename regex
//! patterns, and an optional MIME role marking it as the landing spot for a
//! class of MIME-inferred files. The catch-all category ("Others") always
//! exists, even when nothing in the catalog defines it.

use regex::Regex;
use std::collections::HashSet;

/// Name of the synthetic catch-all category.
pub const CATCH_ALL: &str = "Others";

/// Built-in rule profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// The standard category set.
    #[default]
    Standard,
    /// The standard set plus a "Downloads" category that claims partial
    /// downloads by extension and `download_<n>` names by pattern.
    Downloads,
}

/// Broad MIME classes used by the classifier's fallback step.
///
/// A category tagged with a role receives files whose guessed MIME type
/// falls into that class and which no extension or pattern rule claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeRole {
    Image,
    Video,
    Audio,
    Document,
    Archive,
}

/// A named bucket of matching rules.
#[derive(Debug, Clone)]
pub struct Category {
    /// Unique name, doubling as the destination directory name.
    pub name: String,
    /// Dot-prefixed, lower-cased extensions (e.g. ".jpg").
    pub extensions: HashSet<String>,
    /// Patterns matched against the lower-cased file name, in order.
    pub patterns: Vec<Regex>,
    /// MIME class routed to this category by the fallback step.
    pub mime_role: Option<MimeRole>,
}

impl Category {
    /// Creates a category with the given extensions and no patterns.
    ///
    /// Extensions are normalized to be dot-prefixed and lower-cased.
    ///
    /// # Arguments
    ///
    /// * `name` - Category name, also used as the destination directory name
    /// * `extensions` - Extensions to claim, with or without a leading dot
    ///
    /// # Example
    ///
    /// ```
    /// use sortdir::rules::Category;
    /// let ebooks = Category::new("Ebooks", &["epub", ".MOBI"]);
    /// assert!(ebooks.matches_extension(".epub"));
    /// assert!(ebooks.matches_extension(".mobi"));
    /// ```
    pub fn new<S: AsRef<str>>(name: &str, extensions: &[S]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions
                .iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
            patterns: Vec::new(),
            mime_role: None,
        }
    }

    fn with_role(mut self, role: MimeRole) -> Self {
        self.mime_role = Some(role);
        self
    }

    /// Returns true if the extension (dot-prefixed, lower-cased) belongs to
    /// this category.
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    /// Returns true if any pattern matches the lower-cased file name.
    pub fn matches_pattern(&self, file_name: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(file_name))
    }
}

/// Normalizes an extension to the stored form: dot-prefixed, lower-cased.
fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// Errors raised when a category definition is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// The category name is empty.
    EmptyCategoryName,
    /// The category supplies no extensions.
    EmptyExtensionList { name: String },
}

impl std::fmt::Display for RuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCategoryName => {
                write!(f, "category name must not be empty")
            }
            Self::EmptyExtensionList { name } => {
                write!(f, "category '{}' must define at least one extension", name)
            }
        }
    }
}

impl std::error::Error for RuleError {}

/// An ordered collection of categories; insertion order is match priority.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    categories: Vec<Category>,
}

impl RuleCatalog {
    /// Creates an empty catalog. Only the catch-all exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog pre-populated with a built-in profile.
    ///
    /// # Arguments
    ///
    /// * `profile` - Which built-in category set to start from
    ///
    /// # Example
    ///
    /// ```
    /// use sortdir::rules::{Profile, RuleCatalog};
    /// let catalog = RuleCatalog::builtin(Profile::Standard);
    /// assert!(catalog.get("Images").is_some());
    /// ```
    pub fn builtin(profile: Profile) -> Self {
        let mut catalog = Self::new();

        catalog.insert(
            Category::new(
                "Images",
                &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".tiff"],
            )
            .with_role(MimeRole::Image),
        );
        catalog.insert(
            Category::new("Documents", &[".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt"])
                .with_role(MimeRole::Document),
        );
        catalog.insert(Category::new(
            "Spreadsheets",
            &[".xls", ".xlsx", ".csv", ".ods"],
        ));
        catalog.insert(Category::new("Presentations", &[".ppt", ".pptx", ".odp"]));
        catalog.insert(
            Category::new("Videos", &[".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm"])
                .with_role(MimeRole::Video),
        );
        catalog.insert(
            Category::new("Audio", &[".mp3", ".wav", ".ogg", ".m4a", ".wma", ".flac", ".aac"])
                .with_role(MimeRole::Audio),
        );
        catalog.insert(
            Category::new("Archives", &[".zip", ".rar", ".7z", ".tar", ".gz"])
                .with_role(MimeRole::Archive),
        );
        catalog.insert(Category::new(
            "Code",
            &[".py", ".js", ".html", ".css", ".php", ".java", ".cpp", ".sql"],
        ));
        catalog.insert(Category::new("Executables", &[".exe", ".msi", ".bat", ".sh"]));

        if profile == Profile::Downloads {
            let mut downloads =
                Category::new("Downloads", &[".crdownload", ".part", ".download"]);
            downloads
                .patterns
                .push(Regex::new(r"^download_\d+").expect("Invalid builtin pattern"));
            catalog.insert(downloads);
        }

        catalog
    }

    /// Adds or overwrites a category with the given extensions.
    ///
    /// Extensions are normalized (dot-prefixed, lower-cased). An existing
    /// category of the same name is replaced entirely, keeping its priority
    /// position; a new category is appended at lowest priority.
    ///
    /// # Arguments
    ///
    /// * `name` - Category name
    /// * `extensions` - Extensions to claim, with or without a leading dot
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] if `name` is empty or `extensions` is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use sortdir::rules::RuleCatalog;
    /// let mut catalog = RuleCatalog::new();
    /// catalog.add_category("Ebooks", &["epub", "mobi"]).unwrap();
    /// assert!(catalog.get("Ebooks").is_some());
    /// ```
    pub fn add_category<S: AsRef<str>>(
        &mut self,
        name: &str,
        extensions: &[S],
    ) -> Result<(), RuleError> {
        if name.trim().is_empty() {
            return Err(RuleError::EmptyCategoryName);
        }
        if extensions.is_empty() {
            return Err(RuleError::EmptyExtensionList {
                name: name.to_string(),
            });
        }
        self.insert(Category::new(name, extensions));
        Ok(())
    }

    /// Inserts a category, replacing any existing one with the same name in
    /// place. Used by the config layer for categories that carry patterns.
    pub fn insert(&mut self, category: Category) {
        match self.categories.iter_mut().find(|c| c.name == category.name) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
    }

    /// Categories in priority order. Does not include the catch-all unless a
    /// stored category happens to use its name.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Looks up a category by name.
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// All category names in priority order, catch-all included.
    pub fn category_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.categories.iter().map(|c| c.name.clone()).collect();
        if !names.iter().any(|n| n == CATCH_ALL) {
            names.push(CATCH_ALL.to_string());
        }
        names
    }

    /// Name of the first category tagged with the given MIME role, if any.
    ///
    /// # Arguments
    ///
    /// * `role` - The broad MIME class to look up
    ///
    /// # Example
    ///
    /// ```
    /// use sortdir::rules::{MimeRole, Profile, RuleCatalog};
    /// let catalog = RuleCatalog::builtin(Profile::Standard);
    /// assert_eq!(catalog.mime_target(MimeRole::Image), Some("Images"));
    /// ```
    pub fn mime_target(&self, role: MimeRole) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.mime_role == Some(role))
            .map(|c| c.name.as_str())
    }
}
