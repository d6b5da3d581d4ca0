use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::fs::File;
use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use crate::catalog::{FilesPage, Manifest, VersionDescriptor, VersionsPage, pick_newest};
use crate::config::load_config;
use crate::dates::parse_iso_date;
use crate::error::{Error, Result, truncate_body};
use crate::filenames::{DailyFilenames, ProfileMode, Region};
use crate::util::{encode_doi, urljoin};

/// Chunk size for streamed downloads.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Upper bound on bytes read from the version endpoint.
pub const VERSION_MAX_BYTES: u64 = 32;

const ACCEPT_JSON: [(&str, &str); 1] = [("accept", "application/json")];

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// DASH archive root, typically `https://dash.ucop.edu`.
    pub dash_url: String,
    /// Plain-text resource holding the current BEHR version string.
    pub version_url: String,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

#[derive(Debug, Clone)]
pub struct Client {
    dash_url: String,
    version_url: String,

    block_size: usize,
    progress: bool,

    http: HttpClient,
}

impl Client {
    /// Creates a client using environment variables and/or `.behrrc`.
    ///
    /// This is equivalent to `Client::new(None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit arguments
    /// - environment variables `BEHR_DASH_URL` / `BEHR_VERSION_URL`
    /// - config file from `BEHR_RC` or `.behrrc`
    /// - the public BEHR and DASH endpoints
    pub fn new(
        dash_url: Option<String>,
        version_url: Option<String>,
        verify: Option<bool>,
    ) -> Result<Self> {
        let cfg = load_config(dash_url, version_url, verify)?;
        Self::with_config(cfg)
    }

    pub fn with_config(cfg: ClientConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("behrdownloader/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("behrdownloader")),
        );

        let mut builder = HttpClient::builder().default_headers(default_headers);
        if !cfg.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;

        Ok(Self {
            dash_url: cfg.dash_url.trim_end_matches('/').to_string(),
            version_url: cfg.version_url,
            block_size: DEFAULT_BLOCK_SIZE,
            progress: false,
            http,
        })
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn dash_url(&self) -> &str {
        &self.dash_url
    }

    /// Reads the version string currently published by the BEHR server.
    ///
    /// At most [`VERSION_MAX_BYTES`] are read; surrounding whitespace is trimmed.
    pub fn current_version(&self) -> Result<String> {
        tracing::debug!(url = %self.version_url, "GET version");
        let resp = self.http.get(&self.version_url).send()?.error_for_status()?;

        let mut buf = Vec::with_capacity(VERSION_MAX_BYTES as usize);
        resp.take(VERSION_MAX_BYTES)
            .read_to_end(&mut buf)
            .map_err(|e| Error::io(&self.version_url, e))?;
        let version = String::from_utf8_lossy(&buf).trim().to_string();
        tracing::info!(%version, "current BEHR version");
        Ok(version)
    }

    /// Lists the daily file names for `[start_date, end_date]` (`YYYY-MM-DD`).
    ///
    /// Dates are validated before the single version lookup.
    pub fn daily_filenames(
        &self,
        region: Region,
        profile_mode: ProfileMode,
        start_date: &str,
        end_date: &str,
    ) -> Result<DailyFilenames> {
        let start = parse_iso_date(start_date)?;
        let end = parse_iso_date(end_date)?;
        let version = self.current_version()?;
        Ok(DailyFilenames::new(region, profile_mode, version, start, end))
    }

    /// All published versions of a dataset, in the order the archive lists them.
    pub fn dataset_versions(&self, doi: &str) -> Result<Vec<VersionDescriptor>> {
        let url = format!("{}/api/datasets/{}/versions", self.dash_url, encode_doi(doi));
        let page: VersionsPage = self.api_json(&url)?;
        Ok(page.into_versions())
    }

    /// Follows a version's file list (and any further pages) into a manifest.
    ///
    /// A `next` link pointing at a page already fetched is an error.
    pub fn list_files(&self, version: &VersionDescriptor) -> Result<Manifest> {
        let mut manifest = Manifest::new();
        let mut seen = HashSet::new();
        let mut next = Some(version.files_href.clone());
        while let Some(href) = next {
            let url = urljoin(&self.dash_url, &href);
            if !seen.insert(url.clone()) {
                return Err(Error::PageCycle { url });
            }
            let page: FilesPage = self.api_json(&url)?;
            next = page.drain_into(&self.dash_url, &mut manifest);
        }
        tracing::info!(
            version = version.version_number,
            files = manifest.len(),
            "fetched file list"
        );
        Ok(manifest)
    }

    /// Manifest of the newest version of `doi`.
    pub fn files_for_doi(&self, doi: &str) -> Result<Manifest> {
        let versions = self.dataset_versions(doi)?;
        let newest = pick_newest(doi, &versions)?;
        tracing::info!(doi, version = newest.version_number, "newest dataset version");
        self.list_files(newest)
    }

    /// Streams `url` into `target` using the client's block size.
    pub fn download(&self, url: &str, target: &Path) -> Result<PathBuf> {
        self.download_with_block_size(url, target, self.block_size)
    }

    /// Streams `url` into `target`, `block_size` bytes at a time.
    pub fn download_with_block_size(
        &self,
        url: &str,
        target: &Path,
        block_size: usize,
    ) -> Result<PathBuf> {
        let block_size = if block_size == 0 {
            DEFAULT_BLOCK_SIZE
        } else {
            block_size
        };

        tracing::debug!(url, target = %target.display(), block_size, "GET download");
        let resp = self.http.get(url).send()?.error_for_status()?;

        let pb = self.progress_bar(&resp);
        let mut out = File::create(target).map_err(|e| Error::io(target, e))?;
        stream_body(resp, &mut out, block_size, pb).map_err(|e| Error::io(target, e))?;
        Ok(target.to_path_buf())
    }

    fn progress_bar(&self, resp: &Response) -> Option<ProgressBar> {
        if !self.progress || !std::io::stdout().is_terminal() {
            return None;
        }
        let pb = match resp.content_length() {
            Some(len) => ProgressBar::new(len),
            None => ProgressBar::new_spinner(),
        };
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} {bytes}/{total_bytes} ({bytes_per_sec}) {wide_bar} {eta}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );
        Some(pb)
    }

    fn api_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url, "GET api");
        let resp = self.http.get(url).query(&ACCEPT_JSON).send()?;

        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(Error::Status {
                status,
                url: url.to_string(),
                body: truncate_body(&text),
            });
        }

        serde_json::from_str::<T>(&text).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Copies `reader` into `writer` in chunks of at most `block_size` bytes.
///
/// The progress bar is cleared whether or not the copy succeeds.
fn stream_body<R: Read, W: Write>(
    mut reader: R,
    writer: &mut W,
    block_size: usize,
    pb: Option<ProgressBar>,
) -> std::io::Result<u64> {
    let mut copy = || -> std::io::Result<u64> {
        let mut buf = vec![0u8; block_size];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            writer.write_all(&buf[..n])?;
            total += n as u64;
            if let Some(pb) = &pb {
                pb.inc(n as u64);
            }
        }
        writer.flush()?;
        Ok(total)
    };
    let result = copy();
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }
    result
}
