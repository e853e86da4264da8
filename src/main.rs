// Command-line entry point for actdiff.

use actdiff::application::CompareUsecase;
use actdiff::infrastructure::TextReportWriter;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str =
    "Usage: actdiff <path/to/project-before> <path/to/project-after> <path/to/output-file>";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root of the "before" snapshot
    before: PathBuf,

    /// Project root of the "after" snapshot
    after: PathBuf,

    /// Report output file path
    output: String,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            // Wrong argument count: usage on stdout, nonzero exit, no
            // comparison side effects.
            println!("{}", USAGE);
            return ExitCode::from(1);
        }
    };

    let usecase = CompareUsecase {
        sink: &TextReportWriter,
    };

    match usecase.run(&cli.before, &cli.after, &cli.output) {
        Ok(records) => {
            println!(
                "Comparison completed! {} change record(s) written to {}",
                records.len(),
                cli.output
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(1)
        }
    }
}
