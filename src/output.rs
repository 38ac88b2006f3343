//! Output formatting and styling module.
//!
//! Every line a user sees goes through [`OutputFormatter`]. `colored` drops
//! the styling on its own when `NO_COLOR` is set or `CLICOLOR=0`.

use colored::*;
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use folderize::output::OutputFormatter;
    /// OutputFormatter::success("photo.png moved to images/");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the number of files moved into each folder.
    ///
    /// Folders are listed alphabetically. Nothing is printed for an empty
    /// map.
    ///
    /// ```no_run
    /// use folderize::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("images".to_string(), 8);
    /// counts.insert("docs".to_string(), 15);
    /// OutputFormatter::summary_table(&counts);
    /// ```
    pub fn summary_table(per_folder: &BTreeMap<String, usize>) {
        if per_folder.is_empty() {
            return;
        }

        Self::header("SUMMARY");

        let width = per_folder
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Folder".len());

        println!("{:<width$} | {}", "Folder".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));

        for (folder, count) in per_folder {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

/// "file" or "files".
pub fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(0), "files");
        assert_eq!(plural(1), "file");
        assert_eq!(plural(2), "files");
    }
}
