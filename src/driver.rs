//! Batch download of monthly DASH tarballs.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::catalog::{DatasetId, filter_by_month_range};
use crate::client::Client;
use crate::error::{Error, Result};
use crate::extract::extract_tar;

/// Receives progress messages from [`run`].
pub trait Reporter {
    fn report(&self, message: &str);
}

impl<F: Fn(&str)> Reporter for F {
    fn report(&self, message: &str) {
        self(message)
    }
}

/// Prints progress messages to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report(&self, message: &str) {
        println!("{message}");
    }
}

#[derive(Debug, Clone)]
pub struct DashRequest {
    pub dataset: DatasetId,
    pub out_dir: PathBuf,
    /// Only the month of `start` is significant.
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub extract_tar: bool,
    /// Has no effect without `extract_tar`.
    pub delete_tar: bool,
    /// Progress messages are reported when > 0.
    pub verbose: u8,
}

impl DashRequest {
    pub fn new(dataset: DatasetId, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            dataset,
            out_dir: PathBuf::from("."),
            start,
            end,
            extract_tar: false,
            delete_tar: false,
            verbose: 0,
        }
    }
}

/// Downloads (and optionally unpacks) one file per requested month.
///
/// Returns the paths written by each download, in month order. The first
/// failure aborts the run; files already saved are left in place.
pub fn run(client: &Client, request: &DashRequest, reporter: &dyn Reporter) -> Result<Vec<PathBuf>> {
    if !request.out_dir.is_dir() {
        return Err(Error::BadOutputDir(request.out_dir.clone()));
    }
    let log = |msg: String| {
        if request.verbose > 0 {
            reporter.report(&msg);
        }
    };

    let manifest = client.files_for_doi(request.dataset.doi())?;
    let mut saved = Vec::new();
    for entry in filter_by_month_range(&manifest, request.start, request.end) {
        let save_name = request.out_dir.join(&entry.path);
        log(format!("Saving {} as {}", entry.url, save_name.display()));
        let path = client.download(&entry.url, &save_name)?;

        if request.extract_tar {
            log(format!("Extracting {}", path.display()));
            extract_tar(&path, false)?;
            if request.delete_tar {
                log(format!("Deleting {}", path.display()));
                std::fs::remove_file(&path).map_err(|source| Error::Extract {
                    path: path.clone(),
                    source,
                })?;
            }
        }
        saved.push(path);
    }

    tracing::info!(files = saved.len(), dataset = %request.dataset, "download finished");
    Ok(saved)
}
