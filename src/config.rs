use std::path::{Path, PathBuf};

use crate::client::ClientConfig;
use crate::error::{Error, Result};

pub const DEFAULT_DASH_URL: &str = "https://dash.ucop.edu";
pub const DEFAULT_VERSION_URL: &str = "http://behr.cchem.berkeley.edu/behr/behr_version.txt";

#[derive(Debug, Default, PartialEq, Eq)]
struct RcConfig {
    dash_url: Option<String>,
    version_url: Option<String>,
    verify: Option<bool>,
}

pub(crate) fn load_config(
    dash_url: Option<String>,
    version_url: Option<String>,
    verify: Option<bool>,
) -> Result<ClientConfig> {
    let mut dash_url = dash_url.or_else(|| std::env::var("BEHR_DASH_URL").ok());
    let mut version_url = version_url.or_else(|| std::env::var("BEHR_VERSION_URL").ok());
    let mut file_verify: Option<bool> = None;

    if dash_url.is_none() || version_url.is_none() || verify.is_none() {
        for rc_path in &rc_candidates() {
            if rc_path.exists() {
                let cfg = read_rc(rc_path).map_err(|e| {
                    Error::Config(format!(
                        "failed to read configuration file {}: {}",
                        rc_path.display(),
                        e
                    ))
                })?;
                tracing::debug!(path = %rc_path.display(), "loaded rc file");

                if dash_url.is_none() {
                    dash_url = cfg.dash_url;
                }
                if version_url.is_none() {
                    version_url = cfg.version_url;
                }
                file_verify = cfg.verify;
                break;
            }
        }
    }

    Ok(ClientConfig {
        dash_url: dash_url.unwrap_or_else(|| DEFAULT_DASH_URL.to_string()),
        version_url: version_url.unwrap_or_else(|| DEFAULT_VERSION_URL.to_string()),
        verify: verify.or(file_verify).unwrap_or(true),
    })
}

fn read_rc(path: &Path) -> std::io::Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // A bare `key:` line takes its value from the next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !looks_like_entry(line) {
                set_value(&mut cfg, pk, strip_quotes(line));
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':').filter(|_| looks_like_entry(line)) {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                set_value(&mut cfg, k, v);
            }
        }
    }

    cfg
}

// URL values contain a colon too, so only `<known key>:` starts an entry.
fn looks_like_entry(line: &str) -> bool {
    line.split_once(':')
        .map(|(k, _)| matches!(k.trim(), "dash_url" | "version_url" | "verify"))
        .unwrap_or(false)
}

fn set_value(cfg: &mut RcConfig, key: &str, value: &str) {
    match key {
        "dash_url" => cfg.dash_url = Some(value.to_string()),
        "version_url" => cfg.version_url = Some(value.to_string()),
        "verify" => cfg.verify = Some(value != "0"),
        _ => {}
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) BEHR_RC (explicit), 2) ./.behrrc, 3) ~/.behrrc
    if let Ok(p) = std::env::var("BEHR_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".behrrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".behrrc"));
    }
    v
}
