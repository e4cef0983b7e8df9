// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stdout, timestamped, leveled)
// 3. Create the CSV report (fails fast on a bad output path)
// 4. Walk the source folder and inspect every .html file
// 5. Exit with proper code (0 = finished, 1 = error)
//
// Note that finding broken links is NOT an error: the findings are the
// report, and the run still exits with 0.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - per-document link checks
mod cli; // src/cli.rs - command-line parsing
mod inspect; // src/inspect/ - folder walking and per-file inspection
mod logging; // src/logging.rs - tracing setup
mod report; // src/report/ - findings and the CSV sink

use std::sync::Arc;

use anyhow::Result;
use clap::Parser; // Parser trait enables the parse() method
use tracing::{error, info, Instrument};

use cli::Cli;
use inspect::{inspect_tree, InspectionSession};
use report::CsvSink;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // clap prints usage and exits on its own if the arguments are wrong
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
async fn run(cli: Cli) -> Result<()> {
    // Create the report before touching the source folder so a bad
    // output path is reported straight away
    let sink = CsvSink::create(&cli.output_file).await?;
    let session = Arc::new(InspectionSession::new(sink));

    let span = tracing::info_span!("inspect", root = %cli.source_folder.display());
    let report = inspect_tree(&cli.source_folder, session)
        .instrument(span)
        .await?;

    info!(
        files_seen = report.files_seen,
        files_inspected = report.files_inspected,
        files_unreadable = report.files_unreadable,
        findings = report.findings_written,
        "Finished; report written to '{}'",
        cli.output_file.display()
    );

    Ok(())
}
