use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::{Error, Result};

/// Unpacks a `.tar.gz` next to itself and optionally removes the archive afterwards.
///
/// Members already written stay on disk if unpacking fails partway.
pub fn extract_tar(path: &Path, delete_source: bool) -> Result<PathBuf> {
    let extract_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let file = File::open(path).map_err(|source| Error::Extract {
        path: path.to_path_buf(),
        source,
    })?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive
        .unpack(&extract_dir)
        .map_err(|source| Error::Extract {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(archive = %path.display(), into = %extract_dir.display(), "extracted");

    if delete_source {
        std::fs::remove_file(path).map_err(|source| Error::Extract {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Ok(extract_dir)
}
