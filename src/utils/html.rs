//! HTML entity decoding and text length helpers.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Named and common numeric entities, applied in order.
const ENTITY_MAP: &[(&str, &str)] = &[
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&apos;", "'"),
    ("&#x2F;", "/"),
    ("&#47;", "/"),
];

static DECIMAL_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#(\d+);").unwrap());
static HEX_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#[xX]([0-9A-Fa-f]+);").unwrap());

/// Decode HTML entities such as `Google&#x27;s` into `Google's`.
///
/// Numeric entities that do not map to a valid character are left untouched.
pub fn decode_html_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    for (entity, replacement) in ENTITY_MAP {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }

    let decoded = DECIMAL_ENTITY.replace_all(&decoded, |caps: &Captures| {
        caps[1]
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    HEX_ENTITY
        .replace_all(&decoded, |caps: &Captures| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Cap `text` at `max` characters, replacing the tail with `...` when it overflows.
///
/// Shorter text is returned unchanged; the ellipsis counts toward `max`.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
