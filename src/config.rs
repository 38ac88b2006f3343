//! Run configuration and optional exclusion filters.
//!
//! Two kinds of configuration live here:
//! - [`FolderConfig`], the set of enabled categories plus the optional
//!   catch-all folder, resolved once from command-line flags by
//!   [`resolve_config`].
//! - [`FilterConfig`], an opt-in TOML file (passed with `--config`) listing
//!   files that must never be touched.
//!
//! # Filter File Format
//!
//! ```toml
//! [filters]
//! skip_hidden_files = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db", "desktop.ini"]
//! patterns = ["*.part", "*.crdownload"]
//! extensions = [".tmp"]
//! regex = ["^~\\$"]
//!
//! [filters.include]
//! patterns = []
//! ```

use crate::file_category::{Category, extension_of};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Name of the catch-all folder used when no flag is given.
pub const DEFAULT_CATCH_ALL: &str = "others";

/// Flag values exactly as they arrive from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFlags {
    pub image: bool,
    pub pdf: bool,
    pub doc: bool,
    pub zip: bool,
    pub video: bool,
    pub program: bool,
    /// Catch-all folder name. `None` when `--others` was not passed.
    pub others: Option<String>,
}

/// The active configuration for one run.
///
/// Only [`resolve_config`] and [`FolderConfig::everything`] build one, so a
/// value of this type has always gone through the defaulting rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderConfig {
    image: bool,
    pdf: bool,
    doc: bool,
    zip: bool,
    video: bool,
    program: bool,
    others: Option<String>,
}

impl FolderConfig {
    /// Every predefined category plus the `others` catch-all.
    pub fn everything() -> Self {
        Self {
            image: true,
            pdf: true,
            doc: true,
            zip: true,
            video: true,
            program: true,
            others: Some(DEFAULT_CATCH_ALL.to_string()),
        }
    }

    /// Returns true if files of `category` should be moved.
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Image => self.image,
            Category::Pdf => self.pdf,
            Category::Doc => self.doc,
            Category::Zip => self.zip,
            Category::Video => self.video,
            Category::Program => self.program,
        }
    }

    /// The catch-all folder name, if one is configured.
    pub fn catch_all(&self) -> Option<&str> {
        self.others.as_deref().filter(|name| !name.is_empty())
    }

    /// Enabled categories in priority order.
    pub fn enabled_categories(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL
            .into_iter()
            .filter(|category| self.is_enabled(*category))
    }
}

/// Turns raw flags into the active configuration.
///
/// When no category flag is set and no catch-all name is given, every
/// category is enabled and the catch-all is `others`. Otherwise the flags are
/// used as given.
///
/// # Examples
///
/// ```
/// use folderize::config::{FolderConfig, RawFlags, resolve_config};
///
/// assert_eq!(resolve_config(RawFlags::default()), FolderConfig::everything());
///
/// let images_only = resolve_config(RawFlags { image: true, ..RawFlags::default() });
/// assert_eq!(images_only.catch_all(), None);
/// ```
pub fn resolve_config(flags: RawFlags) -> FolderConfig {
    let others = flags.others.filter(|name| !name.is_empty());
    let nothing_selected = !flags.image
        && !flags.pdf
        && !flags.doc
        && !flags.zip
        && !flags.video
        && !flags.program
        && others.is_none();

    if nothing_selected {
        return FolderConfig::everything();
    }

    FolderConfig {
        image: flags.image,
        pdf: flags.pdf,
        doc: flags.doc,
        zip: flags.zip,
        video: flags.video,
        program: flags.program,
        others,
    }
}

/// Checks that `name` is a single plain folder name.
///
/// Rejects empty names, `.` and `..`, anything containing `/` or `\`, and
/// anything the platform reads as absolute or prefixed (e.g. `C:`), so the
/// folder always ends up directly under the destination.
///
/// # Examples
///
/// ```
/// use folderize::config::validate_folder_name;
///
/// assert!(validate_folder_name("misc").is_ok());
/// assert!(validate_folder_name("../misc").is_err());
/// assert!(validate_folder_name("/tmp/misc").is_err());
/// ```
pub fn validate_folder_name(name: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &'static str| -> Result<String, ConfigError> {
        Err(ConfigError::InvalidFolderName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return invalid("name is empty");
    }
    if name == "." || name == ".." {
        return invalid("name refers to a directory, not a folder inside the destination");
    }
    if name.contains(['/', '\\']) {
        return invalid("name contains a path separator");
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(name.to_string()),
        _ => invalid("name is not a plain folder name"),
    }
}

/// Errors in folder names or in the filter file.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Filter file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern { pattern: String, reason: String },
    /// IO error while reading the filter file.
    IoError(String),
    /// A folder name that would not land directly under the destination.
    InvalidFolderName { name: String, reason: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Filter file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid filter file: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading filter file: {}", msg),
            ConfigError::InvalidFolderName { name, reason } => {
                write!(f, "Invalid folder name '{}': {}", name, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Exclusion rules loaded from a TOML filter file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

/// Root-level filter rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Leave files whose name starts with "." in place.
    #[serde(default)]
    pub skip_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Whitelist that overrides every exclude rule.
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for leaving files in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g. "*.part").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions with their leading dot (e.g. ".tmp"). Case-sensitive, like
    /// classification.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules that override exclusions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FilterConfig {
    /// Loads the filter file at `path`, or returns the empty (accept
    /// everything) configuration when no path is given.
    ///
    /// Filter files are never discovered implicitly.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        log::debug!("Loaded filter file {}", path.display());

        Self::from_toml(&content)
    }

    /// Parses a filter configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compiles glob and regex rules for matching.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is invalid.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters)
    }
}

/// Pre-compiled filter rules.
#[derive(Debug)]
pub struct CompiledFilters {
    skip_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden_files: rules.skip_hidden_files,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_extensions: rules.exclude.extensions.into_iter().collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Returns true if the file named `file_name` may be moved.
    ///
    /// Include patterns win over everything. After that a file is excluded
    /// by the hidden-file switch, an exact name, its extension, a glob or a
    /// regex, checked in that order.
    pub fn should_include(&self, file_name: &str) -> bool {
        if self
            .include_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
        {
            return true;
        }

        if self.skip_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        let extension = extension_of(file_name);
        if !extension.is_empty() && self.exclude_extensions.contains(extension) {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(file_name))
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
