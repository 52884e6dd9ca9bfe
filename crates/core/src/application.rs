use crate::comparator;
use crate::domain::{ComparisonReport, Extraction, Snapshot, Username};
use crate::error::Result;
use crate::extractor;
use crate::ports::{ReportWriter, SnapshotStore};
use crate::utils;

/// Parses one raw export file and extracts its usernames.
/// Fails only on invalid JSON; unrecognized content yields an empty
/// extraction, which the caller surfaces as a warning, not an error.
pub fn load_dataset(raw: &str) -> Result<Extraction> {
    let value = serde_json::from_str(raw)?;
    Ok(extractor::extract(&value))
}

/// Application service for comparing follower/following lists
pub struct ComparisonServiceImpl {
    snapshot_store: Box<dyn SnapshotStore>,
    report_writer: Box<dyn ReportWriter>,
}

impl ComparisonServiceImpl {
    /// Creates a new ComparisonServiceImpl with the given dependencies
    pub fn new(
        snapshot_store: Box<dyn SnapshotStore>,
        report_writer: Box<dyn ReportWriter>,
    ) -> Self {
        Self {
            snapshot_store,
            report_writer,
        }
    }

    /// Runs both comparisons and writes the report through the injected
    /// writer. Both inputs must be non-empty; the caller gates on that.
    /// An unavailable snapshot store downgrades to a warning carried on
    /// the report and the comparison proceeds without history.
    pub fn execute_comparison(
        &self,
        followers: &[Username],
        following: &[Username],
    ) -> Result<ComparisonReport> {
        let mut storage_warning = None;
        let snapshot = match self.snapshot_store.load() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("comparing without history: {}", err);
                storage_warning = Some(err.to_string());
                None
            }
        };

        let report = ComparisonReport {
            follower_count: followers.len(),
            following_count: following.len(),
            not_following_back: comparator::compare_not_following_back(followers, following),
            unfollowers: comparator::compute_unfollowers(followers, snapshot.as_ref()),
            storage_warning,
        };

        self.report_writer.write(&report)?;
        Ok(report)
    }

    /// Overwrites the persisted snapshot with the given follower list,
    /// stamped with the current time.
    pub fn save_snapshot(&self, followers: &[Username]) -> Result<()> {
        let snapshot = Snapshot {
            usernames: followers.to_vec(),
            captured_at: utils::now_timestamp(),
        };
        self.snapshot_store.save(&snapshot)
    }
}
