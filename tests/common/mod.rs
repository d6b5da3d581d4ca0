//! Mock DASH / BEHR server shared by the integration tests.
#![allow(dead_code)]

use std::path::Path;

use behrdownloader::{Client, ClientConfig};
use flate2::Compression;
use flate2::write::GzEncoder;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const VERSIONS_PATH: &str = "/api/datasets/doi%3A10.6078%2FD1RQ3G/versions";

/// A wiremock server driven from synchronous tests, so the blocking client
/// is never called from inside an async context.
pub struct TestServer {
    pub server: MockServer,
    rt: Runtime,
}

impl TestServer {
    pub fn start() -> Self {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap();
        let server = rt.block_on(MockServer::start());
        Self { server, rt }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn mount(&self, mock: Mock) {
        self.rt.block_on(mock.mount(&self.server));
    }

    pub fn received(&self) -> usize {
        self.rt
            .block_on(self.server.received_requests())
            .map(|r| r.len())
            .unwrap_or(0)
    }

    pub fn client(&self) -> Client {
        Client::with_config(ClientConfig {
            dash_url: self.uri(),
            version_url: format!("{}/behr/behr_version.txt", self.uri()),
            verify: true,
        })
        .unwrap()
    }

    pub fn mount_versions(&self, doi_path: &str, numbers: &[i64]) {
        let versions: Vec<Value> = numbers
            .iter()
            .map(|n| {
                json!({
                    "versionNumber": n,
                    "_links": {"stash:files": {"href": format!("/api/versions/{n}/files")}}
                })
            })
            .collect();
        self.mount(
            Mock::given(method("GET"))
                .and(path(doi_path))
                .and(query_param("accept", "application/json"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"_embedded": {"stash:versions": versions}})),
                ),
        );
    }

    /// Serves `files` (name, body) as version `version`'s file list and downloads.
    pub fn mount_files(&self, version: i64, files: &[(&str, Vec<u8>)]) {
        let entries: Vec<Value> = files
            .iter()
            .enumerate()
            .map(|(i, (name, _))| {
                json!({
                    "path": name,
                    "_links": {"stash:download": {"href": format!("/api/files/{i}/download")}}
                })
            })
            .collect();
        self.mount(
            Mock::given(method("GET"))
                .and(path(format!("/api/versions/{version}/files")))
                .and(query_param("accept", "application/json"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"_embedded": {"stash:files": entries}})),
                ),
        );
        for (i, (_, body)) in files.iter().enumerate() {
            self.mount(
                Mock::given(method("GET"))
                    .and(path(format!("/api/files/{i}/download")))
                    .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone())),
            );
        }
    }
}

/// Gzip-compressed tar holding `members` (name, contents).
pub fn tarball(members: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

pub fn sorted_dir(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
