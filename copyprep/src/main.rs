//! Copyprep CLI - clean a CSV export before a PostgreSQL `COPY`
//!
//! ```bash
//! copyprep                                   # scripts/vendor_mapping.csv → scripts/vendor_mapping_clean.csv
//! copyprep -i raw.csv -o out/clean.csv       # explicit paths
//! copyprep --report run.json -v              # JSON run report, progress on stderr
//! copyprep check out/clean.csv              # verify a file is load-ready
//! ```
//!
//! Every clean option can also come from the environment (or a `.env`
//! file): `COPYPREP_INPUT`, `COPYPREP_OUTPUT`, `COPYPREP_COLUMNS`,
//! `COPYPREP_ENCODING`, `COPYPREP_REPORT`. `COPYPREP_LOG` overrides `-v`.

use clap::builder::RangedU64ValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};
use copyprep::logs::{init_logging, LogConfig};
use copyprep::{
    clean_file, read_document, validate_document, CleanOptions, SourceEncoding,
    DEFAULT_COLUMNS, DEFAULT_INPUT, DEFAULT_OUTPUT,
};
use std::path::PathBuf;

/// Violations listed by `check` before it stops printing.
const MAX_LISTED_VIOLATIONS: usize = 10;

#[derive(Parser)]
#[command(name = "copyprep", version)]
#[command(about = "Clean a CSV export so PostgreSQL COPY can load it", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    clean: CleanArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Pad/collapse rows and strip embedded line breaks (the default)
    Clean(CleanArgs),

    /// Verify that a CSV file is already load-ready
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
struct CleanArgs {
    /// Source CSV file
    #[arg(short, long, env = "COPYPREP_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Destination CSV file (parent directories are created)
    #[arg(short, long, env = "COPYPREP_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Number of columns every output row gets
    #[arg(
        short,
        long,
        env = "COPYPREP_COLUMNS",
        default_value_t = DEFAULT_COLUMNS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    columns: usize,

    /// Source encoding: utf-8, latin1, windows-1252 or auto
    #[arg(short, long, env = "COPYPREP_ENCODING", default_value = "utf-8")]
    encoding: SourceEncoding,

    /// Write a JSON run report to this path
    #[arg(long, env = "COPYPREP_REPORT")]
    report: Option<PathBuf>,

    /// Log progress to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Debug, Clone)]
struct CheckArgs {
    /// CSV file to verify
    file: PathBuf,

    /// Expected number of columns
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_COLUMNS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    columns: usize,

    /// Source encoding: utf-8, latin1, windows-1252 or auto
    #[arg(short, long, default_value = "utf-8")]
    encoding: SourceEncoding,

    /// Log progress to stderr
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Clean(args)) => cmd_clean(args),
        Some(Commands::Check(args)) => cmd_check(args),
        None => cmd_clean(cli.clean),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_clean(args: CleanArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::from_verbosity(args.verbose));

    let options = CleanOptions {
        input: args.input,
        output: args.output,
        columns: args.columns,
        encoding: args.encoding,
        report: args.report,
    };

    let report = clean_file(&options)?;
    println!("Wrote cleaned CSV to {}", report.output.display());
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LogConfig::from_verbosity(args.verbose));

    let parsed = read_document(&args.file, args.encoding)?;

    match validate_document(&parsed.document, args.columns) {
        Ok(()) => {
            println!("OK: {} ({} rows)", args.file.display(), parsed.document.len());
            Ok(())
        }
        Err(violations) => {
            for v in violations.iter().take(MAX_LISTED_VIOLATIONS) {
                eprintln!("   - {}", v);
            }
            if violations.len() > MAX_LISTED_VIOLATIONS {
                eprintln!("   ... and {} more", violations.len() - MAX_LISTED_VIOLATIONS);
            }
            Err(format!(
                "{} violation(s) in {}",
                violations.len(),
                args.file.display()
            )
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_cleans_with_defaults() {
        let cli = Cli::try_parse_from(["copyprep"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.clean.columns, DEFAULT_COLUMNS);
        assert_eq!(cli.clean.encoding, SourceEncoding::Utf8);
    }

    #[test]
    fn test_check_subcommand() {
        let cli = Cli::try_parse_from(["copyprep", "check", "-c", "3", "out.csv"]).unwrap();
        match cli.command {
            Some(Commands::Check(args)) => {
                assert_eq!(args.columns, 3);
                assert_eq!(args.file, PathBuf::from("out.csv"));
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_zero_columns_rejected() {
        assert!(Cli::try_parse_from(["copyprep", "--columns", "0"]).is_err());
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        assert!(Cli::try_parse_from(["copyprep", "clean", "-e", "ebcdic"]).is_err());
    }
}
