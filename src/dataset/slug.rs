//! Display-name slug normalization
//!
//! Blocks and scripts are addressed by slug everywhere (lookups, routes,
//! record cross-references): lowercase, accents stripped, non-alphanumeric
//! runs collapsed to single hyphens, leading digits dropped.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derive the canonical slug for a block or script display name
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;
    for ch in name.nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch.to_ascii_lowercase());
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }

    // Slugs never start with a digit; trim up to the first letter
    let start = slug
        .find(|ch: char| ch.is_ascii_alphabetic())
        .unwrap_or(slug.len());
    slug[start..].to_string()
}
