//! folderize - sort the files of a directory into category folders
//!
//! This library classifies files by extension, prepares category folders
//! under a destination directory, and moves each file of a source directory
//! (non-recursively) into the folder its extension selects.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;

pub use config::{
    CompiledFilters, ConfigError, FilterConfig, FolderConfig, RawFlags, resolve_config,
    validate_folder_name,
};
pub use file_category::{Category, Classification, classify};
pub use file_organizer::{FileOrganizer, MoveOutcome, MoveReport, OrganizeError, PreparedFolders};

pub use cli::{OrganizeRequest, run_cli};
