use url::Url;

/// Query parameters that identify campaigns/clicks, not content. Two urls
/// differing only in these point at the same page.
const TRACKING_PARAMS: &[&str] = &[
    "fbclid", "gclid", "msclkid", "mc_cid", "mc_eid", "igshid", "ref", "ref_src",
];

/// Canonical form of a url for deduplication: lowercase scheme and host,
/// default port and fragment dropped, tracking parameters stripped, trailing
/// slash on a non-root path removed. Returns None for anything that is not
/// an absolute http(s) url.
pub fn canonicalize(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    let host = url.host_str()?.to_lowercase();

    let mut path = url.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| {
            let k = k.to_lowercase();
            !k.starts_with("utm_") && !TRACKING_PARAMS.contains(&k.as_str())
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut canon = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        canon.push_str(&format!(":{port}"));
    }
    canon.push_str(&path);
    if !kept.is_empty() {
        let query = kept
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    k.clone()
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join("&");
        canon.push('?');
        canon.push_str(&query);
    }
    Some(canon)
}

/// Drop items whose canonical url repeats an earlier one, preserving
/// first-seen order. Items that fail to canonicalize are dropped outright.
pub fn dedupe_by_canonical<T, F>(items: Vec<T>, url_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| match canonicalize(url_of(item)) {
            Some(canon) => seen.insert(canon),
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_utm_and_fragment() {
        let canon = canonicalize("https://Example.com/news/story/?utm_source=x&utm_medium=y#top");
        assert_eq!(canon.as_deref(), Some("https://example.com/news/story"));
    }

    #[test]
    fn test_keeps_content_params() {
        let canon = canonicalize("https://example.com/article?id=42&utm_campaign=z");
        assert_eq!(canon.as_deref(), Some("https://example.com/article?id=42"));
    }

    #[test]
    fn test_rejects_non_http() {
        assert!(canonicalize("ftp://example.com/file").is_none());
        assert!(canonicalize("not a url").is_none());
    }

    #[test]
    fn test_dedupe_preserves_first_seen_order() {
        let urls = vec![
            "https://a.com/x".to_string(),
            "https://b.com/y".to_string(),
            "https://A.com/x/?utm_source=feed".to_string(),
            "https://c.com/z".to_string(),
        ];
        let deduped = dedupe_by_canonical(urls, |u| u.as_str());
        assert_eq!(
            deduped,
            vec!["https://a.com/x", "https://b.com/y", "https://c.com/z"]
        );
    }
}
