//! Result output port for writing classification reports.

use crate::domain::ClassificationReport;

/// Port for outputting classification reports.
pub trait ResultOutput: Send + Sync {
    /// Writes a single report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, report: &ClassificationReport) -> anyhow::Result<()>;

    /// Writes a complete batch at once.
    ///
    /// Defaults to writing each report in turn; formats with a single
    /// document per run override this.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_batch(&self, reports: &[ClassificationReport], _pretty: bool) -> anyhow::Result<()> {
        reports.iter().try_for_each(|report| self.write(report))
    }

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
