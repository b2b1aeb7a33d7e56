use crate::organize::parse::{CanonicalKey, normalize_separators, parse_title_year};
use crate::organize::ports::{Interaction, YearLookup};

/// Resolve a raw file stem or folder name to a canonical key.
///
/// Tries, in order and stopping at the first success:
/// the title and year parser, the online lookup on the normalized name,
/// and finally asking the operator for the year.
/// A manual year must be all digits; anything else leaves the name unresolved.
pub fn resolve_key(
    raw_name: &str,
    context: &str,
    lookup: &dyn YearLookup,
    interaction: &mut dyn Interaction,
) -> Option<CanonicalKey> {
    if let Some(key) = parse_title_year(raw_name) {
        return Some(key);
    }

    let title = normalize_separators(raw_name);
    if title.is_empty() {
        return None;
    }

    if let Some(year) = lookup.lookup_year(&title).filter(|year| is_valid_year(year)) {
        return Some(CanonicalKey::new(title, year));
    }

    interaction
        .ask_year(context)
        .map(|answer| answer.trim().to_string())
        .filter(|answer| is_valid_year(answer))
        .map(|year| CanonicalKey::new(title, year))
}

/// Non-empty string of ASCII digits.
fn is_valid_year(year: &str) -> bool {
    !year.is_empty() && year.chars().all(|c| c.is_ascii_digit())
}
