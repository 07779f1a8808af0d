//! Filesystem record readers and the `spp sources` health listing.
//!
//! [`FsDataSource`] reads the raw inputs from the layout configured under
//! `[data]`. It performs no transformation; joining happens in
//! [`crate::catalog`].

use anyhow::Result;
use globset::{Glob, GlobMatcher};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::config::{Config, DataConfig};
use crate::error::{self, CatalogError};
use crate::models::{RawProgramDetail, RawProgramSummary, RawProjectFile, ScoredProjectRow};
use crate::traits::DataSource;

/// Reads catalogue inputs from a data root on disk.
#[derive(Debug, Clone)]
pub struct FsDataSource {
    summaries_path: PathBuf,
    details_path: PathBuf,
    projects_csv: PathBuf,
    projects_dir: PathBuf,
    projects_glob: String,
    summaries_dir: PathBuf,
}

impl FsDataSource {
    pub fn new(data: &DataConfig) -> Self {
        Self {
            summaries_path: data.resolve(&data.summaries_path),
            details_path: data.resolve(&data.details_path),
            projects_csv: data.resolve(&data.projects_csv),
            projects_dir: data.resolve(&data.projects_dir),
            projects_glob: data.projects_glob.clone(),
            summaries_dir: data.resolve(&data.summaries_dir),
        }
    }

    /// `SPP 2433` → `<summaries_dir>/SPP_2433_summary.md`.
    pub fn summary_path(&self, spp_number: &str) -> PathBuf {
        self.summaries_dir.join(summary_file_name(spp_number))
    }

    fn project_file_matcher(&self) -> error::Result<GlobMatcher> {
        Glob::new(&self.projects_glob)
            .map(|g| g.compile_matcher())
            .map_err(|source| CatalogError::Glob {
                pattern: self.projects_glob.clone(),
                source,
            })
    }

    /// Project files in file-name order.
    fn project_file_paths(&self) -> error::Result<Vec<PathBuf>> {
        let matcher = self.project_file_matcher()?;
        let mut paths = Vec::new();

        for entry in WalkDir::new(&self.projects_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| CatalogError::Walk {
                path: self.projects_dir.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if matcher.is_match(entry.file_name()) {
                paths.push(entry.into_path());
            }
        }

        paths.sort();
        Ok(paths)
    }
}

impl DataSource for FsDataSource {
    fn read_summaries(&self) -> error::Result<Vec<RawProgramSummary>> {
        read_json(&self.summaries_path)
    }

    fn read_details(&self) -> error::Result<Vec<RawProgramDetail>> {
        read_json(&self.details_path)
    }

    fn read_scored_rows(&self) -> error::Result<Vec<ScoredProjectRow>> {
        read_csv(&self.projects_csv)
    }

    fn read_project_files(&self) -> error::Result<Vec<RawProjectFile>> {
        let mut files = Vec::new();
        for path in self.project_file_paths()? {
            files.push(read_json(&path)?);
        }
        debug!(
            dir = %self.projects_dir.display(),
            files = files.len(),
            "read raw project files"
        );
        Ok(files)
    }

    fn read_summary_markdown(&self, spp_number: &str) -> error::Result<Option<String>> {
        let path = self.summary_path(spp_number);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CatalogError::Io { path, source }),
        }
    }
}

/// Whitespace runs become `_`, then `_summary.md` is appended.
pub fn summary_file_name(spp_number: &str) -> String {
    let mut name = String::with_capacity(spp_number.len() + 11);
    let mut in_space = false;
    for ch in spp_number.chars() {
        if ch.is_whitespace() {
            if !in_space {
                name.push('_');
            }
            in_space = true;
        } else {
            name.push(ch);
            in_space = false;
        }
    }
    name.push_str("_summary.md");
    name
}

fn read_json<T: DeserializeOwned>(path: &Path) -> error::Result<T> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&content).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "read JSON");
    Ok(value)
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> error::Result<Vec<T>> {
    let csv_err = |source| CatalogError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<T>() {
        rows.push(record.map_err(csv_err)?);
    }
    debug!(path = %path.display(), rows = rows.len(), "read CSV");
    Ok(rows)
}

/// Prints whether each configured input exists.
pub fn list_sources(config: &Config) -> Result<()> {
    let fs = FsDataSource::new(&config.data);
    let entries = [
        ("summaries", &fs.summaries_path, true),
        ("details", &fs.details_path, true),
        ("projects csv", &fs.projects_csv, true),
        ("project files", &fs.projects_dir, true),
        ("md summaries", &fs.summaries_dir, false),
    ];

    println!("{:<16} {:<10} {:<9} PATH", "INPUT", "STATUS", "REQUIRED");
    for (name, path, required) in entries {
        let status = if path.exists() { "OK" } else { "MISSING" };
        println!(
            "{:<16} {:<10} {:<9} {}",
            name,
            status,
            required,
            path.display()
        );
    }

    if fs.projects_dir.is_dir() {
        let count = fs.project_file_paths()?.len();
        println!();
        println!(
            "{} project file(s) matching '{}'",
            count, fs.projects_glob
        );
    }

    Ok(())
}
