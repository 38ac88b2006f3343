//! Extension-based file categorization.
//!
//! Every predefined category owns a fixed set of extensions (leading dot
//! included, lower-case). Classification looks at the substring that starts at
//! the last `.` of a file name and walks the categories in priority order.
//!
//! # Examples
//!
//! ```
//! use folderize::config::FolderConfig;
//! use folderize::file_category::{Category, Classification, classify};
//!
//! let config = FolderConfig::everything();
//! assert_eq!(classify("photo.png", &config), Classification::Category(Category::Image));
//! assert_eq!(classify("notes", &config).folder_name(), Some("others"));
//! ```

use crate::config::FolderConfig;

/// A predefined destination bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Image files (JPG, PNG, SVG, etc.)
    Image,
    /// PDF and e-book files
    Pdf,
    /// Office documents and plain text
    Doc,
    /// Compressed archives
    Zip,
    /// Video files
    Video,
    /// Installers and executables
    Program,
}

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp", ".ico", ".gif", ".svg"];
const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".mkv"];
const PDF_EXTENSIONS: &[&str] = &[".pdf", ".epub"];
const DOC_EXTENSIONS: &[&str] = &[".docx", ".pptx", ".txt", ".xlsx"];
const ZIP_EXTENSIONS: &[&str] = &[".zip", ".rar", ".7zip"];
const PROGRAM_EXTENSIONS: &[&str] = &[".msi", ".exe", ".bat"];

impl Category {
    /// All predefined categories in classification priority order.
    ///
    /// Destination folders are also created in this order.
    pub const ALL: [Category; 6] = [
        Category::Image,
        Category::Pdf,
        Category::Doc,
        Category::Zip,
        Category::Video,
        Category::Program,
    ];

    /// Returns the folder name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use folderize::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Program.dir_name(), "programs");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Pdf => "pdfs",
            Category::Doc => "docs",
            Category::Zip => "zips",
            Category::Video => "videos",
            Category::Program => "programs",
        }
    }

    /// The extensions owned by this category.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Image => IMAGE_EXTENSIONS,
            Category::Pdf => PDF_EXTENSIONS,
            Category::Doc => DOC_EXTENSIONS,
            Category::Zip => ZIP_EXTENSIONS,
            Category::Video => VIDEO_EXTENSIONS,
            Category::Program => PROGRAM_EXTENSIONS,
        }
    }

    /// Returns true if `extension` (dot included) belongs to this category.
    ///
    /// Matching is exact and case-sensitive.
    pub fn matches(&self, extension: &str) -> bool {
        self.extensions().contains(&extension)
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Image => "Image files",
            Category::Pdf => "PDF and e-book files",
            Category::Doc => "Document files",
            Category::Zip => "Archive files",
            Category::Video => "Video files",
            Category::Program => "Program files",
        }
    }
}

/// Where a single file should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// An enabled predefined category matched the extension.
    Category(Category),
    /// No enabled category matched; the catch-all folder takes the file.
    CatchAll(String),
    /// Nothing matched and there is no catch-all. The file stays in place.
    Unhandled,
}

impl Classification {
    /// The destination folder name, or `None` for unhandled files.
    pub fn folder_name(&self) -> Option<&str> {
        match self {
            Classification::Category(category) => Some(category.dir_name()),
            Classification::CatchAll(name) => Some(name.as_str()),
            Classification::Unhandled => None,
        }
    }
}

/// Extracts the extension of a file name: everything from the last `.` to
/// the end, dot included. A name without a dot yields `""`.
///
/// # Examples
///
/// ```
/// use folderize::file_category::extension_of;
///
/// assert_eq!(extension_of("backup.tar.zip"), ".zip");
/// assert_eq!(extension_of(".jpg"), ".jpg");
/// assert_eq!(extension_of("README"), "");
/// ```
pub fn extension_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(index) => &file_name[index..],
        None => "",
    }
}

/// Classifies a file name against the active configuration.
///
/// Categories are tried in [`Category::ALL`] order and the first one that both
/// owns the extension and is enabled wins. Otherwise the catch-all folder is
/// used when configured.
pub fn classify(file_name: &str, config: &FolderConfig) -> Classification {
    let extension = extension_of(file_name);

    if let Some(category) = Category::ALL
        .into_iter()
        .find(|category| category.matches(extension) && config.is_enabled(*category))
    {
        return Classification::Category(category);
    }

    match config.catch_all() {
        Some(name) => Classification::CatchAll(name.to_string()),
        None => Classification::Unhandled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RawFlags, resolve_config};

    fn only(category: Category) -> FolderConfig {
        let mut flags = RawFlags::default();
        match category {
            Category::Image => flags.image = true,
            Category::Pdf => flags.pdf = true,
            Category::Doc => flags.doc = true,
            Category::Zip => flags.zip = true,
            Category::Video => flags.video = true,
            Category::Program => flags.program = true,
        }
        resolve_config(flags)
    }

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Image.dir_name(), "images");
        assert_eq!(Category::Pdf.dir_name(), "pdfs");
        assert_eq!(Category::Doc.dir_name(), "docs");
        assert_eq!(Category::Zip.dir_name(), "zips");
        assert_eq!(Category::Video.dir_name(), "videos");
        assert_eq!(Category::Program.dir_name(), "programs");
    }

    #[test]
    fn test_priority_order() {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.dir_name()).collect();
        assert_eq!(
            names,
            vec!["images", "pdfs", "docs", "zips", "videos", "programs"]
        );
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.jpg"), ".jpg");
        assert_eq!(extension_of("archive.tar.zip"), ".zip");
        assert_eq!(extension_of("trailing."), ".");
        assert_eq!(extension_of(".hidden"), ".hidden");
        assert_eq!(extension_of("Makefile"), "");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn test_every_extension_maps_to_its_own_category() {
        let config = FolderConfig::everything();
        for category in Category::ALL {
            for ext in category.extensions() {
                let name = format!("file{}", ext);
                assert_eq!(
                    classify(&name, &config),
                    Classification::Category(category),
                    "{} should land in {}",
                    name,
                    category.dir_name()
                );
            }
        }
    }

    #[test]
    fn test_extension_tables_are_disjoint() {
        for category in Category::ALL {
            for ext in category.extensions() {
                let owners = Category::ALL.iter().filter(|c| c.matches(ext)).count();
                assert_eq!(owners, 1, "{} is owned by {} categories", ext, owners);
            }
        }
    }

    #[test]
    fn test_disabled_category_never_falls_into_another() {
        let images_only = only(Category::Image);
        for category in Category::ALL {
            if category == Category::Image {
                continue;
            }
            for ext in category.extensions() {
                let name = format!("file{}", ext);
                assert_eq!(classify(&name, &images_only), Classification::Unhandled);
            }
        }
    }

    #[test]
    fn test_disabled_category_goes_to_catch_all() {
        let config = resolve_config(RawFlags {
            image: true,
            others: Some("misc".to_string()),
            ..RawFlags::default()
        });
        assert_eq!(
            classify("movie.mkv", &config),
            Classification::CatchAll("misc".to_string())
        );
        assert_eq!(
            classify("photo.gif", &config),
            Classification::Category(Category::Image)
        );
    }

    #[test]
    fn test_videos_go_to_videos() {
        let config = FolderConfig::everything();
        assert_eq!(classify("clip.mp4", &config).folder_name(), Some("videos"));
        assert_eq!(classify("clip.mkv", &config).folder_name(), Some("videos"));
    }

    #[test]
    fn test_no_extension_never_matches_a_category() {
        let config = FolderConfig::everything();
        assert_eq!(
            classify("LICENSE", &config),
            Classification::CatchAll("others".to_string())
        );
        assert_eq!(classify("LICENSE", &only(Category::Doc)), Classification::Unhandled);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let config = FolderConfig::everything();
        assert_eq!(
            classify("PHOTO.JPG", &config),
            Classification::CatchAll("others".to_string())
        );
        assert_eq!(classify("PHOTO.JPG", &only(Category::Image)), Classification::Unhandled);
    }

    #[test]
    fn test_dot_file_uses_whole_name_as_extension() {
        let config = only(Category::Image);
        assert_eq!(classify(".png", &config), Classification::Category(Category::Image));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let config = FolderConfig::everything();
        let first = classify("report.pdf", &config);
        let second = classify("report.pdf", &config);
        assert_eq!(first, second);
    }
}
