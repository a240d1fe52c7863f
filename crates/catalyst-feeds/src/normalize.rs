use sha2::{Digest, Sha256};
use url::Url;

const TRACKING_PARAM_PREFIXES: &[&str] = &["utm_", "ref", "fbclid", "gclid", "mc_"];

/// Strips known tracking query parameters and lowercases the scheme and
/// host of a URL, so the same article reached through different tracking
/// links hashes to the same canonical form (spec.md §4.E normalization).
pub fn normalize_link(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.trim().to_string();
    };

    let scheme = url.scheme().to_lowercase();
    let _ = url.set_scheme(&scheme);
    if let Some(host) = url.host_str() {
        let host = host.to_lowercase();
        let _ = url.set_host(Some(&host));
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(&kept);
    }

    url.to_string()
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAM_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

/// Collapses internal whitespace runs and trims a feed title.
pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Deterministic fallback canonical ID for feeds without a stable GUID:
/// a hash of the normalized title and publish timestamp.
pub fn fallback_canonical_id(title: &str, ts_published: chrono::DateTime<chrono::Utc>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_title(title).to_lowercase().as_bytes());
    hasher.update(ts_published.timestamp().to_le_bytes());
    format!("{:x}", hasher.finalize())
}
