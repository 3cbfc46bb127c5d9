//! Conflict-safe relocation of classified files.
//!
//! The organizer consumes a [`Classification`] and a destination root,
//! creates one subdirectory per non-empty category, and moves each file into
//! it. Destination name collisions are resolved by appending `_1`, `_2`, ...
//! to the file stem, so nothing is ever overwritten. One [`ProgressEvent`]
//! is emitted per completed move, in move order; the first failure aborts
//! the run, leaving completed moves in place.

use crate::classifier::Classification;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem operations the organizer needs, abstracted for testing.
pub trait FileMover {
    /// Ensures `path` exists as a directory.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Returns true if anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Moves `from` to `to`; afterwards the file is at `to` and `from` is
    /// gone.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// [`FileMover`] backed by `std::fs`.
///
/// `rename` falls back to copy-then-remove when the destination lies on a
/// different filesystem. That branch only triggers when source and
/// destination sit on separate mounts, which the single-tempdir test suite
/// never produces, so it is exercised manually rather than by tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileMover;

impl FileMover for OsFileMover {
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            other => other,
        }
    }
}

/// Emitted once per successfully relocated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Original file name.
    pub file_name: String,
    /// Category the file was moved into.
    pub category: String,
    /// Resolved destination path, collision suffix included.
    pub destination: PathBuf,
    /// 1-based position of this move within the run.
    pub index: usize,
    /// Total number of files in the run.
    pub total: usize,
}

/// Errors that can occur during an organize run.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to move a file into its category directory. Fatal to the run;
    /// moves already completed stay in place.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for organize operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves classified files into per-category subdirectories.
pub struct Organizer<M: FileMover = OsFileMover> {
    mover: M,
}

impl Organizer<OsFileMover> {
    pub fn new() -> Self {
        Self { mover: OsFileMover }
    }
}

impl Default for Organizer<OsFileMover> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: FileMover> Organizer<M> {
    pub fn with_mover(mover: M) -> Self {
        Self { mover }
    }

    /// Relocates every classified file into `destination_root/<category>/`.
    ///
    /// Categories are processed in the classification's group order, files
    /// in list order. `on_progress` is called synchronously after each
    /// completed move, in exactly that order. On the first failure the
    /// remaining moves are abandoned; there is no rollback, so a partial
    /// organization is a valid terminal state.
    ///
    /// Returns the number of files moved.
    pub fn organize<F>(
        &self,
        classification: &Classification,
        destination_root: &Path,
        mut on_progress: F,
    ) -> OrganizeResult<usize>
    where
        F: FnMut(&ProgressEvent),
    {
        let total = classification.total_files();
        let mut index = 0;

        for (category, files) in classification.iter() {
            if files.is_empty() {
                continue;
            }

            let category_dir = destination_root.join(category);
            self.mover.create_dir(&category_dir).map_err(|e| {
                OrganizeError::DirectoryCreationFailed {
                    path: category_dir.clone(),
                    source: e,
                }
            })?;

            for file in files {
                let file_name = file.file_name().ok_or_else(|| {
                    OrganizeError::FileMoveFailure {
                        source: file.clone(),
                        destination: category_dir.clone(),
                        source_error: io::Error::new(
                            io::ErrorKind::InvalidInput,
                            "file has no name component",
                        ),
                    }
                })?;

                let destination = self.resolve_collision(&category_dir.join(file_name));
                self.mover.rename(file, &destination).map_err(|e| {
                    OrganizeError::FileMoveFailure {
                        source: file.clone(),
                        destination: destination.clone(),
                        source_error: e,
                    }
                })?;

                index += 1;
                on_progress(&ProgressEvent {
                    file_name: file_name.to_string_lossy().to_string(),
                    category: category.to_string(),
                    destination,
                    index,
                    total,
                });
            }
        }

        Ok(index)
    }

    /// Returns a destination path that nothing occupies, probing
    /// `stem_1.ext`, `stem_2.ext`, ... when the candidate is taken.
    ///
    /// The probe is linear; with thousands of same-named collisions it
    /// degrades accordingly, which is acceptable for the file counts this
    /// tool targets.
    fn resolve_collision(&self, candidate: &Path) -> PathBuf {
        if !self.mover.exists(candidate) {
            return candidate.to_path_buf();
        }

        let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
        let stem = candidate
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let suffix = candidate
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut n = 1usize;
        loop {
            let numbered = parent.join(format!("{stem}_{n}{suffix}"));
            if !self.mover.exists(&numbered) {
                return numbered;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn classification_of(files: &[(&str, &Path)]) -> Classification {
        let mut classification = Classification::new();
        for (category, path) in files {
            classification.insert(category, path.to_path_buf());
        }
        classification
    }

    #[test]
    fn test_organize_creates_directory_and_moves() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        let file = base.join("test.txt");
        fs::write(&file, "test content").expect("Failed to write test file");

        let classification = classification_of(&[("Documents", &file)]);
        let moved = Organizer::new()
            .organize(&classification, base, |_| {})
            .expect("organize should succeed");

        assert_eq!(moved, 1);
        assert!(base.join("Documents").is_dir());
        assert!(base.join("Documents/test.txt").exists());
        assert!(!file.exists());
    }

    #[test]
    fn test_organize_uses_existing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("Images")).expect("Failed to create category directory");
        let file = base.join("test.png");
        fs::write(&file, "test content").expect("Failed to write test file");

        let classification = classification_of(&[("Images", &file)]);
        Organizer::new()
            .organize(&classification, base, |_| {})
            .expect("organize should succeed");

        assert!(base.join("Images/test.png").exists());
    }

    #[test]
    fn test_collision_resolved_with_numeric_suffix() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("Images")).expect("Failed to create category directory");
        fs::write(base.join("Images/cat.png"), "occupant").expect("Failed to write occupant");
        let file = base.join("cat.png");
        fs::write(&file, "incoming").expect("Failed to write test file");

        let classification = classification_of(&[("Images", &file)]);
        let mut events = Vec::new();
        Organizer::new()
            .organize(&classification, base, |e| events.push(e.clone()))
            .expect("organize should succeed");

        // The occupant is untouched, the incoming file got a suffix.
        let occupant = fs::read_to_string(base.join("Images/cat.png")).expect("read occupant");
        assert_eq!(occupant, "occupant");
        let incoming = fs::read_to_string(base.join("Images/cat_1.png")).expect("read incoming");
        assert_eq!(incoming, "incoming");
        assert_eq!(events[0].destination, base.join("Images/cat_1.png"));
    }

    #[test]
    fn test_collision_probe_increments() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("Images")).expect("Failed to create category directory");
        fs::write(base.join("Images/cat.png"), "a").expect("write");
        fs::write(base.join("Images/cat_1.png"), "b").expect("write");
        let file = base.join("cat.png");
        fs::write(&file, "c").expect("write");

        let classification = classification_of(&[("Images", &file)]);
        Organizer::new()
            .organize(&classification, base, |_| {})
            .expect("organize should succeed");

        assert!(base.join("Images/cat_2.png").exists());
    }

    #[test]
    fn test_progress_events_in_move_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        for name in ["a.jpg", "b.jpg", "c.pdf"] {
            fs::write(base.join(name), "x").expect("Failed to write test file");
        }

        let mut classification = Classification::new();
        classification.insert("Images", base.join("a.jpg"));
        classification.insert("Images", base.join("b.jpg"));
        classification.insert("Documents", base.join("c.pdf"));

        let mut events = Vec::new();
        Organizer::new()
            .organize(&classification, base, |e| {
                events.push((e.file_name.clone(), e.index, e.total))
            })
            .expect("organize should succeed");

        assert_eq!(
            events,
            vec![
                ("a.jpg".to_string(), 1, 3),
                ("b.jpg".to_string(), 2, 3),
                ("c.pdf".to_string(), 3, 3),
            ]
        );
    }

    /// Mover that fails renames of one specific file name.
    struct FailingMover {
        fail_on: String,
        inner: OsFileMover,
    }

    impl FileMover for FailingMover {
        fn create_dir(&self, path: &Path) -> io::Result<()> {
            self.inner.create_dir(path)
        }

        fn exists(&self, path: &Path) -> bool {
            self.inner.exists(path)
        }

        fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
            if from.file_name().is_some_and(|n| n == self.fail_on.as_str()) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "simulated permission error",
                ));
            }
            self.inner.rename(from, to)
        }
    }

    #[test]
    fn test_move_failure_aborts_remaining_moves() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        for name in ["first.pdf", "second.pdf", "third.pdf"] {
            fs::write(base.join(name), "x").expect("Failed to write test file");
        }

        let mut classification = Classification::new();
        for name in ["first.pdf", "second.pdf", "third.pdf"] {
            classification.insert("Documents", base.join(name));
        }

        let organizer = Organizer::with_mover(FailingMover {
            fail_on: "second.pdf".to_string(),
            inner: OsFileMover,
        });
        let result = organizer.organize(&classification, base, |_| {});

        let err = result.expect_err("organize should fail");
        match err {
            OrganizeError::FileMoveFailure { source, .. } => {
                assert_eq!(source, base.join("second.pdf"));
            }
            other => panic!("unexpected error: {other}"),
        }

        // First moved, second and third stayed put.
        assert!(base.join("Documents/first.pdf").exists());
        assert!(base.join("second.pdf").exists());
        assert!(base.join("third.pdf").exists());
        assert!(!base.join("Documents/third.pdf").exists());
    }

    #[test]
    fn test_directory_creation_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        // Occupy the category name with a regular file.
        fs::write(base.join("Documents"), "not a directory").expect("Failed to write blocker");
        let file = base.join("test.pdf");
        fs::write(&file, "x").expect("Failed to write test file");

        let classification = classification_of(&[("Documents", &file)]);
        let result = Organizer::new().organize(&classification, base, |_| {});

        assert!(matches!(
            result,
            Err(OrganizeError::DirectoryCreationFailed { .. })
        ));
        assert!(file.exists());
    }
}
