use clap::Parser;
use fdiff_core::application::{self, ComparisonServiceImpl};
use fdiff_core::domain::Extraction;
use fdiff_core::ports::{ReportWriter, SnapshotStore};
use markdown_adapter::MarkdownReportWriter;
use sqlite_adapter::SqliteSnapshotStore;
use std::fs;
use std::process;

/// Exit code for datasets that parsed but contained no recognizable
/// usernames; distinct from hard failures (1).
const EXIT_EMPTY_DATASET: i32 = 2;

/// CLI tool that compares exported follower/following JSON files and reports
/// who does not follow back and who has unfollowed since the last snapshot
#[derive(Parser, Debug)]
#[command(name = "fdiff-cli")]
#[command(about = "Compares follower/following JSON exports and tracks unfollowers")]
struct Cli {
    /// Path to the exported followers JSON file
    #[arg(long = "followers", required = true)]
    followers: String,

    /// Path to the exported following JSON file
    #[arg(long = "following", required = true)]
    following: String,

    /// Path where the markdown report will be written
    #[arg(short = 'o', long = "output-file", required = true)]
    output_file: String,

    /// Path of the SQLite file holding the follower snapshot
    #[arg(long = "snapshot-db", default_value = "follower_snapshot.db")]
    snapshot_db: String,

    /// Save the followers list as the new snapshot after comparing
    #[arg(long = "save-snapshot")]
    save_snapshot: bool,
}

/// Loads one export file: read, parse, extract. A bad file fails only its
/// own dataset, so the message always names which file is at fault.
fn load_file(path: &str, label: &str) -> Extraction {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            eprintln!("Error reading {} file {}: {}", label, path, err);
            process::exit(1);
        }
    };

    match application::load_dataset(&raw) {
        Ok(extraction) => {
            if extraction.dropped > 0 {
                log::debug!(
                    "{} file {}: {} candidates dropped during extraction",
                    label,
                    path,
                    extraction.dropped
                );
            }
            if extraction.is_empty() {
                // Keep the raw structure inspectable for diagnosis
                log::debug!("{} file {} extracted nothing; raw content: {}", label, path, raw);
            }
            println!("Loaded {} ({} {})", path, extraction.usernames.len(), label);
            extraction
        }
        Err(err) => {
            eprintln!("Error loading {} file {}: {}", label, path, err);
            process::exit(1);
        }
    }
}

fn main() {
    // warnings stay visible without RUST_LOG; debug diagnostics are opt-in
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let followers = load_file(&cli.followers, "followers");
    let following = load_file(&cli.following, "following");

    // Comparison needs both datasets; an empty one is a warning state,
    // not a hard failure
    if followers.is_empty() || following.is_empty() {
        if followers.is_empty() {
            eprintln!(
                "Warning: no usernames recognized in followers file {} (run with RUST_LOG=debug to inspect)",
                cli.followers
            );
        }
        if following.is_empty() {
            eprintln!(
                "Warning: no usernames recognized in following file {} (run with RUST_LOG=debug to inspect)",
                cli.following
            );
        }
        process::exit(EXIT_EMPTY_DATASET);
    }

    // Instantiate concrete implementations of secondary adapters
    let snapshot_store: Box<dyn SnapshotStore> =
        Box::new(SqliteSnapshotStore::new(cli.snapshot_db.clone()));
    let report_writer: Box<dyn ReportWriter> =
        Box::new(MarkdownReportWriter::new(cli.output_file.clone()));

    let service = ComparisonServiceImpl::new(snapshot_store, report_writer);

    match service.execute_comparison(&followers.usernames, &following.usernames) {
        Ok(report) => {
            if let Some(warning) = &report.storage_warning {
                eprintln!("Warning: {}; comparison ran without snapshot history", warning);
            }
            println!("Report written to {}", cli.output_file);
            println!(
                "{} not following back, {} unfollowers",
                report.not_following_back.len(),
                report.unfollowers.unfollowers.len()
            );
            if !report.unfollowers.has_previous {
                println!("No snapshot found; pass --save-snapshot to start tracking unfollowers");
            }
        }
        Err(err) => {
            eprintln!("Error during comparison: {}", err);
            process::exit(1);
        }
    }

    if cli.save_snapshot {
        // Storage problems must not fail the run; the report is already out
        match service.save_snapshot(&followers.usernames) {
            Ok(()) => println!(
                "Snapshot of {} followers saved to {}",
                followers.usernames.len(),
                cli.snapshot_db
            ),
            Err(err) => eprintln!("Warning: could not save snapshot: {}", err),
        }
    }
}
