//! Moving files into category folders.
//!
//! This module owns every filesystem mutation of a run: preparing the
//! destination, snapshotting the source listing, and relocating each entry
//! into `<destination>/<folder>/<name>`.

use crate::config::{CompiledFilters, ConfigError, FolderConfig, validate_folder_name};
use crate::file_category::{Classification, classify};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while organizing a directory.
///
/// Everything except [`OrganizeError::FileMoveFailure`] aborts the run before
/// any file is moved.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source path does not exist.
    SourceNotFound { path: PathBuf },
    /// The destination directory could not be created.
    DestinationCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The destination exists but cannot be resolved as a directory.
    DestinationUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The source directory could not be listed.
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category folder.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The catch-all name or the filter file is invalid.
    InvalidConfig(ConfigError),
    /// Failed to move a file to its category folder.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceNotFound { path } => {
                write!(f, "Source path does not exist: {}", path.display())
            }
            Self::DestinationCreationFailed { path, source } => {
                write!(
                    f,
                    "Could not create the destination directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DestinationUnavailable { path, source } => {
                write!(
                    f,
                    "Could not use destination {}: {}",
                    path.display(),
                    source
                )
            }
            Self::SourceUnreadable { path, source } => {
                write!(
                    f,
                    "Could not read files at source {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::InvalidConfig(e) => write!(f, "{}", e),
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

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SourceNotFound { .. } => None,
            Self::DestinationCreationFailed { source, .. }
            | Self::DestinationUnavailable { source, .. }
            | Self::SourceUnreadable { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => Some(source),
            Self::InvalidConfig(e) => Some(e),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
        }
    }
}

impl From<ConfigError> for OrganizeError {
    fn from(e: ConfigError) -> Self {
        Self::InvalidConfig(e)
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// One entry of the source listing.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    /// The entry's file name.
    pub name: OsString,
    /// Full path inside the source directory.
    pub path: PathBuf,
    /// Directories are never moved.
    pub is_dir: bool,
}

impl SourceEntry {
    /// The file name as text, with invalid UTF-8 replaced.
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

/// What happened to a single source entry.
#[derive(Debug)]
pub enum MoveOutcome {
    /// The file now lives at `destination`.
    Moved {
        folder: String,
        destination: PathBuf,
    },
    /// Dry run: the file would have been moved to `destination`.
    WouldMove {
        folder: String,
        destination: PathBuf,
    },
    /// The file was left in place: no folder matched, or a filter excluded it.
    Skipped,
    /// The move was attempted and failed.
    Failed(OrganizeError),
}

/// Totals for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Files moved (or, in a dry run, files that would be moved).
    pub moved: usize,
    /// Files whose move failed.
    pub failed: usize,
    /// Files left in place on purpose.
    pub skipped: usize,
    /// Moved files per destination folder.
    pub per_folder: BTreeMap<String, usize>,
}

impl MoveReport {
    /// Folds one outcome into the totals.
    pub fn record(&mut self, outcome: &MoveOutcome) {
        match outcome {
            MoveOutcome::Moved { folder, .. } | MoveOutcome::WouldMove { folder, .. } => {
                self.moved += 1;
                *self.per_folder.entry(folder.clone()).or_insert(0) += 1;
            }
            MoveOutcome::Skipped => self.skipped += 1,
            MoveOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Validates the source and makes sure the destination directory exists.
///
/// Returns the destination path, which is `source` when no destination was
/// given. Nothing is created when the source is missing. In a dry run the
/// destination is never created: it only has to be missing or a directory.
pub fn resolve_paths(
    source: &Path,
    destination: Option<&Path>,
    dry_run: bool,
) -> OrganizeResult<PathBuf> {
    if !source.exists() {
        return Err(OrganizeError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    let destination = destination.unwrap_or(source).to_path_buf();

    if dry_run {
        if destination.exists() && !destination.is_dir() {
            return Err(OrganizeError::DestinationUnavailable {
                path: destination,
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        return Ok(destination);
    }

    fs::create_dir_all(&destination).map_err(|e| OrganizeError::DestinationCreationFailed {
        path: destination.clone(),
        source: e,
    })?;

    let metadata =
        fs::metadata(&destination).map_err(|e| OrganizeError::DestinationUnavailable {
            path: destination.clone(),
            source: e,
        })?;
    if !metadata.is_dir() {
        return Err(OrganizeError::DestinationUnavailable {
            path: destination,
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    Ok(destination)
}

/// Takes a snapshot of the immediate entries of `source`.
///
/// The snapshot is taken before any category folder is created, so folders
/// created inside the source never show up in it. Entries come back in the
/// order the operating system yields them.
pub fn list_source(source: &Path) -> OrganizeResult<Vec<SourceEntry>> {
    let unreadable = |e: std::io::Error| OrganizeError::SourceUnreadable {
        path: source.to_path_buf(),
        source: e,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(source).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        // file_type() does not follow symlinks; a link to a directory counts
        // as a directory here.
        let is_dir = match entry.file_type() {
            Ok(file_type) if file_type.is_symlink() => entry.path().is_dir(),
            Ok(file_type) => file_type.is_dir(),
            Err(e) => {
                log::warn!("Cannot stat {}: {}", entry.path().display(), e);
                false
            }
        };
        entries.push(SourceEntry {
            name: entry.file_name(),
            path: entry.path(),
            is_dir,
        });
    }

    log::debug!("Listed {} entries in {}", entries.len(), source.display());
    Ok(entries)
}

/// Result of [`FileOrganizer::prepare_destination`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedFolders {
    /// Folders that exist and can receive files.
    pub ready: Vec<PathBuf>,
    /// Folder paths taken by something that is not a folder.
    pub blocked: Vec<PathBuf>,
}

/// Moves the files of one directory listing into category folders.
pub struct FileOrganizer {
    destination: PathBuf,
    config: FolderConfig,
    filters: Option<CompiledFilters>,
    dry_run: bool,
}

impl FileOrganizer {
    /// Creates an organizer that moves files into folders under `destination`.
    pub fn new(destination: PathBuf, config: FolderConfig) -> Self {
        Self {
            destination,
            config,
            filters: None,
            dry_run: false,
        }
    }

    /// Leaves files rejected by `filters` in place.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Reports what would happen without touching the filesystem.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The folders this configuration uses, in creation order.
    ///
    /// A catch-all named like a predefined folder is listed once.
    pub fn folder_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .config
            .enabled_categories()
            .map(|category| category.dir_name())
            .collect();
        if let Some(catch_all) = self.config.catch_all()
            && !names.contains(&catch_all)
        {
            names.push(catch_all);
        }
        names
    }

    /// Creates one folder per enabled category plus the catch-all folder.
    ///
    /// Folders that already exist are fine. A non-folder already sitting at a
    /// folder's path is not fatal: the folder is reported as blocked and the
    /// moves into it fail one by one. Any other failure is returned and
    /// should abort the run. Does nothing in a dry run.
    pub fn prepare_destination(&self) -> OrganizeResult<PreparedFolders> {
        if let Some(catch_all) = self.config.catch_all() {
            validate_folder_name(catch_all)?;
        }

        let mut prepared = PreparedFolders::default();
        if self.dry_run {
            return Ok(prepared);
        }

        for name in self.folder_names() {
            let path = self.destination.join(name);
            match fs::create_dir_all(&path) {
                Ok(()) => {
                    log::debug!("Prepared folder {}", path.display());
                    prepared.ready.push(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    log::debug!("{} exists and is not a folder", path.display());
                    prepared.blocked.push(path);
                }
                Err(e) => {
                    return Err(OrganizeError::DirectoryCreationFailed { path, source: e });
                }
            }
        }
        Ok(prepared)
    }

    /// Classifies and moves a single entry.
    ///
    /// Directories are the caller's business; passing one here is treated as
    /// a skip.
    pub fn move_entry(&self, entry: &SourceEntry) -> MoveOutcome {
        if entry.is_dir {
            return MoveOutcome::Skipped;
        }

        let name = entry.display_name();
        if let Some(filters) = &self.filters
            && !filters.should_include(&name)
        {
            log::debug!("{} excluded by filter rules", name);
            return MoveOutcome::Skipped;
        }

        let classification = classify(&name, &self.config);
        let Some(folder) = classification.folder_name() else {
            log::trace!("{} matches no active folder", name);
            return MoveOutcome::Skipped;
        };
        if let Classification::Category(category) = &classification {
            log::trace!("{} classified as {}", name, category.description());
        }

        let destination = self.destination.join(folder).join(&entry.name);
        if self.dry_run {
            return MoveOutcome::WouldMove {
                folder: folder.to_string(),
                destination,
            };
        }

        match Self::move_file(&entry.path, &destination) {
            Ok(()) => MoveOutcome::Moved {
                folder: folder.to_string(),
                destination,
            },
            Err(e) => MoveOutcome::Failed(e),
        }
    }

    /// Moves every non-directory entry in listing order.
    ///
    /// `on_outcome` sees each file's outcome as soon as it is known. A failed
    /// move never stops the loop.
    pub fn organize<F>(&self, entries: &[SourceEntry], mut on_outcome: F) -> MoveReport
    where
        F: FnMut(&SourceEntry, &MoveOutcome),
    {
        let mut report = MoveReport::default();
        for entry in entries.iter().filter(|entry| !entry.is_dir) {
            let outcome = self.move_entry(entry);
            on_outcome(entry, &outcome);
            report.record(&outcome);
        }
        report
    }

    /// Renames `source` to `destination`, replacing any file already there.
    pub fn move_file(source: &Path, destination: &Path) -> OrganizeResult<()> {
        fs::rename(source, destination).map_err(|e| OrganizeError::FileMoveFailure {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_error: e,
        })
    }
}
