//! Batch downloader for Berkeley High Resolution (BEHR) OMI NO2 data.
//!
//! Two independent flows are supported:
//! - the BEHR file server, where daily file names are derived from a date
//!   range and the server's current version string ([`Client::daily_filenames`]);
//! - the UC DASH archive, where the newest version of a dataset is looked up
//!   by DOI and its monthly tarballs are downloaded ([`driver::run`]).
//!
//! ## Quick start
//! ```no_run
//! use behrdownloader::{Client, DashRequest, StdoutReporter, parse_year_month};
//!
//! fn main() -> behrdownloader::Result<()> {
//!     let client = Client::from_env()?;
//!     let mut request = DashRequest::new(
//!         "monthly-gridded".parse()?,
//!         parse_year_month("2005-01")?,
//!         parse_year_month("2005-03")?,
//!     );
//!     request.extract_tar = true;
//!     request.verbose = 1;
//!     behrdownloader::driver::run(&client, &request, &StdoutReporter)?;
//!     Ok(())
//! }
//! ```
//!
//! Endpoints can be overridden with `BEHR_DASH_URL` / `BEHR_VERSION_URL` or a
//! `.behrrc` file in the current or home directory.

#![forbid(unsafe_code)]

mod catalog;
mod client;
mod config;
mod dates;
pub mod driver;
mod error;
mod extract;
mod filenames;
mod util;

pub use catalog::{
    DATASET_DOIS, DatasetId, Manifest, ManifestEntry, MonthlyMatches, VersionDescriptor,
    dataset_aliases, filter_by_month_range, pick_newest,
};
pub use client::{Client, ClientConfig, DEFAULT_BLOCK_SIZE, VERSION_MAX_BYTES};
pub use config::{DEFAULT_DASH_URL, DEFAULT_VERSION_URL};
pub use dates::{parse_iso_date, parse_year_month};
pub use driver::{DashRequest, Reporter, StdoutReporter};
pub use error::{Error, ErrorKind, Result};
pub use extract::extract_tar;
pub use filenames::{DailyFilenames, ProfileMode, REGIONS, Region, behr_filename};
pub use util::encode_doi;
