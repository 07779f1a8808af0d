//! The seam between the joiner and wherever the raw records live.
//!
//! [`Catalog::load`](crate::catalog::Catalog::load) reads every input exactly
//! once through a [`DataSource`]. The filesystem implementation is
//! [`FsDataSource`](crate::sources::FsDataSource); tests drive the joiner with
//! in-memory or instrumented sources.
//!
//! ```text
//! ┌──────────────┐   read_*()   ┌──────────┐   &Catalog   ┌──────────────┐
//! │  DataSource  │────────────▶│  Catalog  │────────────▶│ filter/render │
//! │ (fs, memory) │   (once)     │  (join)   │              │  CLI, server  │
//! └──────────────┘              └──────────┘              └──────────────┘
//! ```

use std::sync::Arc;

use crate::error::Result;
use crate::models::{RawProgramDetail, RawProgramSummary, RawProjectFile, ScoredProjectRow};

/// Read-only access to the raw catalogue inputs.
///
/// Implementations return the records as stored, without joining or
/// normalization. Failing to read a required input is an error; the
/// optional per-programme summaries return `Ok(None)` when absent.
pub trait DataSource {
    /// Programme summaries, in presentation order.
    fn read_summaries(&self) -> Result<Vec<RawProgramSummary>>;

    /// Programme details, keyed by `spp_number` during the join.
    fn read_details(&self) -> Result<Vec<RawProgramDetail>>;

    /// Scored project rows, one per project.
    fn read_scored_rows(&self) -> Result<Vec<ScoredProjectRow>>;

    /// All per-programme raw project files.
    fn read_project_files(&self) -> Result<Vec<RawProjectFile>>;

    /// The Markdown summary for a programme, if one exists.
    fn read_summary_markdown(&self, spp_number: &str) -> Result<Option<String>>;
}

impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    fn read_summaries(&self) -> Result<Vec<RawProgramSummary>> {
        (**self).read_summaries()
    }

    fn read_details(&self) -> Result<Vec<RawProgramDetail>> {
        (**self).read_details()
    }

    fn read_scored_rows(&self) -> Result<Vec<ScoredProjectRow>> {
        (**self).read_scored_rows()
    }

    fn read_project_files(&self) -> Result<Vec<RawProjectFile>> {
        (**self).read_project_files()
    }

    fn read_summary_markdown(&self, spp_number: &str) -> Result<Option<String>> {
        (**self).read_summary_markdown(spp_number)
    }
}
