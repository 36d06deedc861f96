//! URL and domain helpers.

/// Host of `url` with a leading `www.` stripped, or `None` if it does not parse.
pub fn registrable_host(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Resolve a possibly protocol-relative link (`//host/path`) to https.
pub fn absolutize(href: &str) -> String {
    if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    }
}
