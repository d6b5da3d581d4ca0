pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Percent-encodes a DOI for use as a single path segment.
///
/// Only `:` and `/` are covered, which is all DOI syntax needs in practice.
pub fn encode_doi(doi: &str) -> String {
    let mut out = String::with_capacity(doi.len() + 8);
    for c in doi.chars() {
        match c {
            ':' => out.push_str("%3A"),
            '/' => out.push_str("%2F"),
            _ => out.push(c),
        }
    }
    out
}
