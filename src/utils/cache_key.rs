//! Cache key derivation.

/// Character substituted for every non-alphanumeric character.
pub const FILLER: char = '_';

/// Derives the content-store key for a URL.
///
/// Every character that is not alphanumeric becomes [`FILLER`], one for one.
/// Distinct URLs may collide (`a-b` and `a.b`); such collisions share a cache
/// entry.
pub fn sanitize_key(url: &str) -> String {
    url.chars()
        .map(|c| if c.is_alphanumeric() { c } else { FILLER })
        .collect()
}
