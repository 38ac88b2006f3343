use clap::Parser;
use folderize::cli::{OrganizeRequest, run_cli};
use folderize::config::{RawFlags, resolve_config, validate_folder_name};
use folderize::logging::{init_logger, level_from_occurrences};
use folderize::output::OutputFormatter;
use std::path::PathBuf;
use std::process::ExitCode;

/// Organize the files of a directory into folders by type.
///
/// Files already present in the destination folders with the same name are
/// overwritten.
#[derive(Parser, Debug)]
#[command(name = "folderize", version, about, long_about)]
struct Args {
    /// Directory whose files are organized (not recursive)
    source: PathBuf,

    /// Directory that receives the category folders [default: SOURCE]
    destination: Option<PathBuf>,

    /// Move images into images/
    #[arg(short, long)]
    image: bool,

    /// Move pdfs and e-books into pdfs/
    #[arg(short, long)]
    pdf: bool,

    /// Move archives into zips/
    #[arg(short, long)]
    zip: bool,

    /// Move videos into videos/
    #[arg(short, long)]
    video: bool,

    /// Move programs into programs/
    #[arg(short = 'x', long)]
    program: bool,

    /// Move documents into docs/
    #[arg(short, long)]
    doc: bool,

    /// Move the rest of the files into a separate folder (--others=NAME)
    #[arg(
        short,
        long,
        value_name = "NAME",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "others",
        value_parser = validate_folder_name
    )]
    others: Option<String>,

    /// Show what would be moved without changing anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// TOML file with exclusion filters
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only print errors and the summary
    #[arg(short, long)]
    quiet: bool,

    /// Print diagnostic logs to stderr (repeat for more detail)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn raw_flags(&self) -> RawFlags {
        RawFlags {
            image: self.image,
            pdf: self.pdf,
            doc: self.doc,
            zip: self.zip,
            video: self.video,
            program: self.program,
            others: self.others.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logger(level_from_occurrences(args.verbose)) {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    let config = resolve_config(args.raw_flags());
    let request = OrganizeRequest {
        source: args.source,
        destination: args.destination,
        config,
        dry_run: args.dry_run,
        filter_path: args.config,
        quiet: args.quiet,
    };

    match run_cli(&request) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_bare_others_flag_uses_default_name() {
        let args = Args::try_parse_from(["folderize", "src", "--others"]).expect("valid args");
        assert_eq!(args.others.as_deref(), Some("others"));
        assert_eq!(args.destination, None);
    }

    #[test]
    fn test_others_does_not_swallow_destination() {
        let args =
            Args::try_parse_from(["folderize", "src", "-o", "dest"]).expect("valid args");
        assert_eq!(args.others.as_deref(), Some("others"));
        assert_eq!(args.destination, Some(PathBuf::from("dest")));
    }

    #[test]
    fn test_others_with_name() {
        let args =
            Args::try_parse_from(["folderize", "src", "--others=misc"]).expect("valid args");
        assert_eq!(args.others.as_deref(), Some("misc"));
    }

    #[test]
    fn test_others_rejects_names_outside_destination() {
        for bad in ["--others=../x", "--others=/tmp/x", "--others=a/b", "--others=.", "--others="] {
            let result = Args::try_parse_from(["folderize", "src", bad]);
            assert!(result.is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from(["folderize", "src", "dst", "-i", "-p", "-z", "-v", "-x", "-d"])
            .expect("valid args");
        let flags = args.raw_flags();
        assert!(flags.image && flags.pdf && flags.zip && flags.video && flags.program && flags.doc);
        assert_eq!(flags.others, None);
    }

    #[test]
    fn test_verbose_is_counted() {
        let args = Args::try_parse_from(["folderize", "src", "--verbose", "--verbose"])
            .expect("valid args");
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_missing_source_is_a_usage_error() {
        assert!(Args::try_parse_from(["folderize"]).is_err());
    }
}
