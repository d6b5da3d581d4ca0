//! DASH archive catalog: dataset identifiers, version descriptors and file manifests.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::dates::Months;
use crate::error::{Error, Result};
use crate::util::urljoin;

/// Dataset aliases and the DOIs they stand for.
pub const DATASET_DOIS: &[(&str, &str)] = &[
    ("daily-gridded", "doi:10.6078/D12D5X"),
    ("monthly-gridded", "doi:10.6078/D1RQ3G"),
    ("daily-native", "doi:10.6078/D1WH41"),
    ("monthly-native", "doi:10.6078/D1N086"),
];

pub fn dataset_aliases() -> Vec<&'static str> {
    DATASET_DOIS.iter().map(|(alias, _)| *alias).collect()
}

/// A dataset, given either as a literal DOI or as one of [`DATASET_DOIS`]'s aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetId {
    doi: String,
}

impl DatasetId {
    pub fn doi(&self) -> &str {
        &self.doi
    }
}

impl FromStr for DatasetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.starts_with("doi") {
            return Ok(Self { doi: s.to_string() });
        }
        DATASET_DOIS
            .iter()
            .find(|(alias, _)| *alias == s)
            .map(|(_, doi)| Self {
                doi: (*doi).to_string(),
            })
            .ok_or_else(|| Error::UnknownDataset {
                given: s.to_string(),
                valid: dataset_aliases().join(", "),
            })
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.doi)
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct Link {
    pub(crate) href: String,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct VersionsPage {
    #[serde(rename = "_embedded")]
    embedded: VersionsEmbedded,
}

#[derive(Debug, serde::Deserialize)]
struct VersionsEmbedded {
    #[serde(default, rename = "stash:versions")]
    versions: Vec<ApiVersion>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiVersion {
    #[serde(rename = "versionNumber")]
    version_number: i64,
    #[serde(rename = "_links")]
    links: ApiVersionLinks,
}

#[derive(Debug, serde::Deserialize)]
struct ApiVersionLinks {
    #[serde(rename = "stash:files")]
    files: Link,
}

impl VersionsPage {
    pub(crate) fn into_versions(self) -> Vec<VersionDescriptor> {
        self.embedded
            .versions
            .into_iter()
            .map(|v| VersionDescriptor {
                version_number: v.version_number,
                files_href: v.links.files.href,
            })
            .collect()
    }
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct FilesPage {
    #[serde(rename = "_embedded")]
    embedded: FilesEmbedded,
    #[serde(default, rename = "_links")]
    links: Option<PageLinks>,
}

#[derive(Debug, serde::Deserialize)]
struct FilesEmbedded {
    #[serde(default, rename = "stash:files")]
    files: Vec<ApiFile>,
}

#[derive(Debug, serde::Deserialize)]
struct ApiFile {
    path: String,
    #[serde(rename = "_links")]
    links: ApiFileLinks,
}

#[derive(Debug, serde::Deserialize)]
struct ApiFileLinks {
    #[serde(rename = "stash:download")]
    download: Link,
}

#[derive(Debug, serde::Deserialize)]
struct PageLinks {
    #[serde(default)]
    next: Option<Link>,
}

impl FilesPage {
    /// Appends this page's entries to `manifest` and returns the next page link, if any.
    pub(crate) fn drain_into(self, dash_root: &str, manifest: &mut Manifest) -> Option<String> {
        for f in self.embedded.files {
            manifest.push(ManifestEntry {
                path: f.path,
                url: urljoin(dash_root, &f.links.download.href),
            });
        }
        self.links.and_then(|l| l.next).map(|l| l.href)
    }
}

/// One published version of a DASH dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    pub version_number: i64,
    /// Server-relative link to this version's file list.
    pub files_href: String,
}

/// Picks the highest version number; the first one wins a tie.
pub fn pick_newest<'a>(doi: &str, versions: &'a [VersionDescriptor]) -> Result<&'a VersionDescriptor> {
    let mut newest: Option<&VersionDescriptor> = None;
    for v in versions {
        if newest.is_none_or(|n| v.version_number > n.version_number) {
            newest = Some(v);
        }
    }
    newest.ok_or_else(|| Error::NoVersions {
        doi: doi.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Filename as listed by the archive.
    pub path: String,
    /// Absolute download URL.
    pub url: String,
}

/// Files of one dataset version, in the order the archive listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn get(&self, path: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManifestEntry> {
        self.entries.iter()
    }
}

impl FromIterator<ManifestEntry> for Manifest {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Manifest {
    type Item = &'a ManifestEntry;
    type IntoIter = std::slice::Iter<'a, ManifestEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Manifest entries for each month in `[start, end]`, oldest first.
///
/// An entry matches a month when its path contains `YYYYMM`. When several
/// entries match the same month only the first in manifest order is
/// yielded, so each month appears at most once. Months without a match are
/// skipped.
pub fn filter_by_month_range(
    manifest: &Manifest,
    start: NaiveDate,
    end: NaiveDate,
) -> MonthlyMatches<'_> {
    MonthlyMatches {
        manifest,
        months: Months::new(start, end),
    }
}

#[derive(Debug, Clone)]
pub struct MonthlyMatches<'a> {
    manifest: &'a Manifest,
    months: Months,
}

impl<'a> Iterator for MonthlyMatches<'a> {
    type Item = &'a ManifestEntry;

    fn next(&mut self) -> Option<&'a ManifestEntry> {
        for month in self.months.by_ref() {
            let stamp = month.format("%Y%m").to_string();
            if let Some(entry) = self.manifest.iter().find(|e| e.path.contains(&stamp)) {
                return Some(entry);
            }
        }
        None
    }
}
