use crate::domain::{ComparisonReport, Snapshot};
use crate::error::Result;

/// Port for the single persisted follower snapshot.
/// `save` overwrites wholesale; `load` returns `None` when nothing was
/// ever saved.
pub trait SnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>>;
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Trait for rendering a finished comparison
/// This is a port (interface) that defines how the core communicates with output adapters
pub trait ReportWriter: Send + Sync {
    fn write(&self, report: &ComparisonReport) -> Result<()>;
}
