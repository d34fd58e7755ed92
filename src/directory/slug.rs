//! Slug derivation for listing identifiers.

/// Upper bound on collision suffixes tried before giving up. Exhausting it
/// indicates a pathological store state rather than a naming conflict.
pub const MAX_SLUG_ATTEMPTS: u32 = 1000;

/// Derive a URL-safe slug from a display name: lowercased ASCII alphanumeric
/// runs joined by single dashes. Names with no usable characters fall back
/// to "listing".
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut gap = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            gap = true;
        }
    }
    if slug.is_empty() {
        "listing".to_string()
    } else {
        slug
    }
}

/// Find a slug for `name` that `taken` does not already claim.
///
/// The base slug is tried first; on collision, numeric suffixes starting at 2
/// are appended until a free slug is found or the attempt cap is reached.
pub fn unique_slug(name: &str, taken: impl Fn(&str) -> bool) -> Option<String> {
    let base = slugify(name);
    if !taken(&base) {
        return Some(base);
    }
    (2..=MAX_SLUG_ATTEMPTS)
        .map(|suffix| format!("{base}-{suffix}"))
        .find(|candidate| !taken(candidate))
}
