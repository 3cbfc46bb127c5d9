//! sortdir - classify a directory's files into named categories and move
//! them into per-category subdirectories.
//!
//! The engine has three parts: a rule store of named categories with
//! extension sets and optional filename patterns, a classifier that resolves
//! each file through extension → pattern → MIME-by-name fallback, and an
//! organizer that relocates classified files without ever overwriting an
//! existing destination.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;
pub mod rules;

pub use classifier::{Classification, Classifier, ClassifyError, ClassifyMode};
pub use config::{ConfigError, RulesConfig};
pub use organizer::{FileMover, OrganizeError, Organizer, OsFileMover, ProgressEvent};
pub use rules::{CATCH_ALL, Category, Profile, RuleCatalog, RuleError};
