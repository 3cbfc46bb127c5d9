//! Command-line interface module.
//!
//! Wires the classification engine to the terminal: command parsing,
//! rule-catalog assembly from config and flags, dry-run previews, and the
//! organize run with its progress bar. All real logic lives in the engine
//! modules; this layer only supplies a folder and rules and consumes the
//! classification result and progress events.

use crate::classifier::{Classification, Classifier, ClassifyMode};
use crate::config::{ConfigProfile, RulesConfig};
use crate::organizer::Organizer;
use crate::output::OutputFormatter;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "sortdir", version, about = "Organize a directory's files into category subdirectories")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify the files in a directory and move them into per-category
    /// subdirectories.
    Organize {
        /// Directory whose direct children will be organized.
        path: PathBuf,

        /// Show the classification without moving anything.
        #[arg(long)]
        dry_run: bool,

        /// Match by extension only; skip pattern and MIME fallback.
        #[arg(long)]
        extension_only: bool,

        /// Built-in rule profile to use.
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,

        /// Path to a rule configuration file.
        #[arg(long)]
        rules: Option<PathBuf>,
    },
    /// List the category names the current rules define.
    Categories {
        /// Built-in rule profile to use.
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,

        /// Path to a rule configuration file.
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Standard,
    Downloads,
}

impl From<ProfileArg> for ConfigProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Standard => ConfigProfile::Standard,
            ProfileArg::Downloads => ConfigProfile::Downloads,
        }
    }
}

/// Executes a parsed command. Errors are already formatted for display.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Organize {
            path,
            dry_run,
            extension_only,
            profile,
            rules,
        } => {
            let classifier = build_classifier(profile, extension_only, rules.as_deref())?;
            organize_directory(&classifier, &path, dry_run)
        }
        Command::Categories { profile, rules } => {
            let classifier = build_classifier(profile, false, rules.as_deref())?;
            for name in classifier.catalog().category_names() {
                OutputFormatter::plain(&name);
            }
            Ok(())
        }
    }
}

/// Assembles the classifier from the config file and command-line overrides.
fn build_classifier(
    profile: Option<ProfileArg>,
    extension_only: bool,
    rules: Option<&Path>,
) -> Result<Classifier, String> {
    let mut config =
        RulesConfig::load(rules).map_err(|e| format!("Error loading configuration: {}", e))?;
    if let Some(profile) = profile {
        config.profile = profile.into();
    }

    let catalog = config
        .build_catalog()
        .map_err(|e| format!("Error building rule catalog: {}", e))?;
    let mode = if extension_only {
        ClassifyMode::ExtensionOnly
    } else {
        config.classify_mode()
    };

    Ok(Classifier::with_mode(catalog, mode))
}

/// Classifies the folder, then either previews or executes the moves.
fn organize_directory(
    classifier: &Classifier,
    path: &Path,
    dry_run: bool,
) -> Result<(), String> {
    OutputFormatter::info(&format!("Organizing contents of: {}", path.display()));

    let classification = classifier
        .classify_folder(path)
        .map_err(|e| e.to_string())?;

    if classification.is_empty() {
        OutputFormatter::plain("No files found to organize.");
        return Ok(());
    }

    if dry_run {
        preview(&classification);
        return Ok(());
    }

    let total = classification.total_files();
    let pb = OutputFormatter::create_progress_bar(total as u64);
    let result = Organizer::new().organize(&classification, path, |event| {
        pb.println(format!(
            " - {} → {}/{}",
            event.file_name,
            event.category,
            event
                .destination
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default()
        ));
        pb.inc(1);
    });

    match result {
        Ok(moved) => {
            pb.finish_and_clear();
            OutputFormatter::success(&format!("Organization complete! Moved {} files.", moved));
            OutputFormatter::summary_table(&category_counts(&classification), total);
            Ok(())
        }
        Err(e) => {
            pb.abandon();
            Err(format!(
                "{}\nFiles moved before the failure stay in place.",
                e
            ))
        }
    }
}

/// Prints the would-be mapping without touching the filesystem.
fn preview(classification: &Classification) {
    OutputFormatter::header("Files would be organized as follows:");
    for (category, files) in classification.iter() {
        for file in files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            OutputFormatter::plain(&format!(" - {} → {}/", name, category));
        }
    }

    OutputFormatter::summary_table(
        &category_counts(classification),
        classification.total_files(),
    );
    OutputFormatter::dry_run_notice("No files were modified.");
}

/// Per-category file counts, in classification order.
fn category_counts(classification: &Classification) -> Vec<(String, usize)> {
    classification
        .iter()
        .map(|(name, files)| (name.to_string(), files.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_organize_flags() {
        let cli = Cli::try_parse_from([
            "sortdir",
            "organize",
            "/tmp/downloads",
            "--dry-run",
            "--profile",
            "downloads",
        ])
        .expect("args should parse");

        match cli.command {
            Command::Organize {
                path,
                dry_run,
                extension_only,
                profile,
                ..
            } => {
                assert_eq!(path, PathBuf::from("/tmp/downloads"));
                assert!(dry_run);
                assert!(!extension_only);
                assert!(matches!(profile, Some(ProfileArg::Downloads)));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["sortdir"]).is_err());
    }

    #[test]
    fn test_build_classifier_default() {
        let classifier =
            build_classifier(None, false, None).expect("default classifier should build");
        assert!(classifier.catalog().get("Images").is_some());
    }

    #[test]
    fn test_build_classifier_profile_override() {
        let classifier = build_classifier(Some(ProfileArg::Downloads), false, None)
            .expect("classifier should build");
        assert!(classifier.catalog().get("Downloads").is_some());
    }

    #[test]
    fn test_category_counts_follow_classification_order() {
        let mut classification = Classification::new();
        classification.insert("Images", PathBuf::from("a.jpg"));
        classification.insert("Documents", PathBuf::from("b.pdf"));
        classification.insert("Images", PathBuf::from("c.jpg"));

        assert_eq!(
            category_counts(&classification),
            vec![("Images".to_string(), 2), ("Documents".to_string(), 1)]
        );
    }
}
