//! Command-line orchestration for folderize.
//!
//! Turns an [`OrganizeRequest`] into a full run: validate paths, snapshot the
//! source, prepare folders, move files and report.

use crate::config::{FilterConfig, FolderConfig, validate_folder_name};
use crate::file_organizer::{
    FileOrganizer, MoveOutcome, MoveReport, OrganizeResult, SourceEntry, list_source,
    resolve_paths,
};
use crate::output::{OutputFormatter, plural};
use std::path::PathBuf;

/// Everything one run needs, already parsed.
#[derive(Debug, Clone)]
pub struct OrganizeRequest {
    /// Directory to scan.
    pub source: PathBuf,
    /// Directory that receives the category folders. Defaults to `source`.
    pub destination: Option<PathBuf>,
    /// Active configuration from [`crate::config::resolve_config`].
    pub config: FolderConfig,
    /// Report without touching the filesystem.
    pub dry_run: bool,
    /// Optional TOML filter file.
    pub filter_path: Option<PathBuf>,
    /// Hide per-file lines.
    pub quiet: bool,
}

impl OrganizeRequest {
    /// A request that organizes `source` in place with `config`.
    pub fn new(source: impl Into<PathBuf>, config: FolderConfig) -> Self {
        Self {
            source: source.into(),
            destination: None,
            config,
            dry_run: false,
            filter_path: None,
            quiet: false,
        }
    }
}

/// Runs one organization pass.
///
/// Fatal problems (invalid catch-all name, broken filter file, missing
/// source, unusable destination, unreadable source, uncreatable category
/// folder) are returned as errors before any file is moved. A dry run
/// creates nothing, not even the destination. Per-file failures, including
/// files whose folder is blocked by a non-directory, are printed and counted
/// in the returned report.
///
/// # Examples
///
/// ```no_run
/// use folderize::cli::{OrganizeRequest, run_cli};
/// use folderize::config::{RawFlags, resolve_config};
///
/// let request = OrganizeRequest::new("/home/me/Downloads", resolve_config(RawFlags::default()));
/// match run_cli(&request) {
///     Ok(report) => println!("{} moved", report.moved),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(request: &OrganizeRequest) -> OrganizeResult<MoveReport> {
    if let Some(catch_all) = request.config.catch_all() {
        validate_folder_name(catch_all)?;
    }
    let filters = FilterConfig::load(request.filter_path.as_deref())?.compile()?;

    let destination = resolve_paths(
        &request.source,
        request.destination.as_deref(),
        request.dry_run,
    )?;
    let entries = list_source(&request.source)?;

    let organizer = FileOrganizer::new(destination.clone(), request.config.clone())
        .with_filters(filters)
        .dry_run(request.dry_run);

    if request.dry_run {
        OutputFormatter::dry_run_notice(&format!(
            "Analyzing {} -> {}",
            request.source.display(),
            destination.display()
        ));
    } else {
        log::info!(
            "Organizing {} into {}",
            request.source.display(),
            destination.display()
        );
    }
    log::debug!("Active folders: {:?}", organizer.folder_names());

    let prepared = organizer.prepare_destination()?;
    for path in &prepared.blocked {
        OutputFormatter::warning(&format!(
            "{} exists and is not a folder; files for it cannot be moved",
            path.display()
        ));
    }

    let report = organizer.organize(&entries, |entry, outcome| {
        report_outcome(entry, outcome, request.quiet)
    });

    print_summary(&report, request.dry_run);
    Ok(report)
}

fn report_outcome(entry: &SourceEntry, outcome: &MoveOutcome, quiet: bool) {
    let name = entry.display_name();
    match outcome {
        MoveOutcome::Moved { folder, .. } => {
            if !quiet {
                OutputFormatter::success(&format!("{} moved to {}/", name, folder));
            }
        }
        MoveOutcome::WouldMove { folder, .. } => {
            if !quiet {
                OutputFormatter::dry_run_notice(&format!("{} would move to {}/", name, folder));
            }
        }
        MoveOutcome::Failed(e) => {
            OutputFormatter::error(&format!("{} error while moving: {}", name, e));
        }
        MoveOutcome::Skipped => log::debug!("{} left in place", name),
    }
}

fn print_summary(report: &MoveReport, dry_run: bool) {
    OutputFormatter::summary_table(&report.per_folder);

    if report.failed > 0 {
        OutputFormatter::warning(&format!(
            "{} {} could not be moved",
            report.failed,
            plural(report.failed)
        ));
    }

    if dry_run {
        OutputFormatter::info(&format!("{} would be moved", report.moved));
        OutputFormatter::dry_run_notice("No files were modified.");
    } else {
        OutputFormatter::info(&format!("{} moved", report.moved));
    }
}
