use crate::domain::ast::ChangeRecord;
use crate::domain::diff;
use crate::infrastructure::project_loader::SourceLoader;
use crate::ports::ReportSink;
use anyhow::{Context, Result};
use std::path::Path;

/// Wires the pipeline: load both roots, compare, write the report.
/// Every run builds fresh trees and discards them on return.
pub struct CompareUsecase<'a> {
    pub sink: &'a dyn ReportSink,
}

impl<'a> CompareUsecase<'a> {
    pub fn run(
        &self,
        before_root: &Path,
        after_root: &Path,
        output_path: &str,
    ) -> Result<Vec<ChangeRecord>> {
        let before = SourceLoader::load(before_root)?;
        let after = SourceLoader::load(after_root)?;
        let records = diff::compare_trees(&before, &after);
        self.sink
            .write(&records, output_path)
            .with_context(|| format!("Failed to write report to {}", output_path))?;
        Ok(records)
    }
}
