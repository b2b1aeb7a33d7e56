//! Title and year extraction from file and folder names.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Title followed by the first year token, 1900-2099, optionally in parentheses.
/// The year must not continue with another digit.
static RE_TITLE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*\(?((?:19|20)\d{2})\)?(?:\D|$)").expect("Invalid title year regex"));

/// Regex to match two or more consecutive whitespace characters
static RE_MULTI_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("Invalid spaces regex"));

/// Anything that is not a letter, digit or combining mark, used when comparing keys.
static RE_NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}]+").expect("Invalid alphanumeric regex"));

/// Title and year identifying one movie regardless of how its name is spelled.
///
/// Equality and hashing ignore letter case and punctuation,
/// so `Matrix (1999)` and `matrix (1999)` compare equal.
#[derive(Debug, Clone)]
pub struct CanonicalKey {
    pub title: String,
    pub year: String,
}

impl CanonicalKey {
    #[must_use]
    pub fn new(title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            year: year.into().trim().to_string(),
        }
    }

    /// Folder name for this key: `Title (Year)`.
    #[must_use]
    pub fn folder_name(&self) -> String {
        canonical_name(&self.title, &self.year)
    }

    /// Lowercase NFC form with punctuation replaced by single spaces.
    #[must_use]
    pub fn normalized(&self) -> String {
        let lower = self.title.nfc().collect::<String>().to_lowercase();
        let title = RE_NON_ALPHANUMERIC.replace_all(&lower, " ");
        format!("{} {}", title.trim(), self.year)
    }
}

impl PartialEq for CanonicalKey {
    fn eq(&self, other: &Self) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for CanonicalKey {}

impl Hash for CanonicalKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized().hash(state);
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.folder_name())
    }
}

/// Format the canonical folder and file base name.
#[must_use]
pub fn canonical_name(title: &str, year: &str) -> String {
    format!("{} ({})", title.trim(), year.trim())
}

/// Replace dot and dash separators with spaces and collapse repeated whitespace.
///
/// ```rust
/// use media_tidy::organize::normalize_separators;
///
/// assert_eq!(normalize_separators("The.Big-Lebowski "), "The Big Lebowski");
/// ```
#[must_use]
pub fn normalize_separators(name: &str) -> String {
    let replaced = name.replace(['.', '-'], " ");
    RE_MULTI_SPACES.replace_all(replaced.trim(), " ").into_owned()
}

/// Extract title and year from a raw file stem or folder name.
///
/// The year is the first token that looks like a year, scanning from the left,
/// and the title is everything before it.
/// Returns `None` when there is no year or nothing in front of it.
///
/// ```rust
/// use media_tidy::organize::parse_title_year;
///
/// let key = parse_title_year("Inception.2010.1080p.BluRay").unwrap();
/// assert_eq!(key.title, "Inception");
/// assert_eq!(key.year, "2010");
///
/// assert!(parse_title_year("Unknown Film").is_none());
/// ```
#[must_use]
pub fn parse_title_year(name: &str) -> Option<CanonicalKey> {
    let normalized = normalize_separators(name);
    let captures = RE_TITLE_YEAR.captures(&normalized)?;
    let title = captures
        .get(1)?
        .as_str()
        .trim_matches(|c: char| c.is_whitespace() || c == '(' || c == '[');

    if !title.chars().any(char::is_alphanumeric) {
        return None;
    }

    Some(CanonicalKey::new(title, &captures[2]))
}
