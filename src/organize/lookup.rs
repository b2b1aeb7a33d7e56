//! Online year lookup.
//!
//! Uses the public IMDb suggestion endpoint:
//! `https://v3.sg.media-imdb.com/suggestion/<first letter>/<query>.json`

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::organize::ports::YearLookup;
use crate::print_warning;

/// Year lookup against the IMDb suggestion API.
#[derive(Debug)]
pub struct ImdbLookup {
    client: Client,
    base_url: Url,
    verbose: bool,
}

/// Lookup that never finds anything, used in offline mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLookup;

/// Response body of the suggestion endpoint.
#[derive(Debug, Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    d: Vec<Suggestion>,
}

/// One search suggestion.
#[derive(Debug, Deserialize)]
struct Suggestion {
    /// Title
    #[serde(default)]
    l: Option<String>,
    /// Type of title, for example `movie` or `tvSeries`
    #[serde(default)]
    qid: Option<String>,
    /// Release year
    #[serde(default)]
    y: Option<u32>,
}

impl ImdbLookup {
    /// Create a lookup client with the given request timeout.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration, verbose: bool) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid lookup URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid lookup URL: {base_url}");
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            verbose,
        })
    }

    /// Build the request URL for a title.
    /// The title is a single percent-encoded path segment.
    fn build_url(&self, title: &str) -> Option<Url> {
        let query = title.trim().to_lowercase();
        let first = query.chars().find(|c| c.is_alphanumeric())?;
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push(&first.to_string())
            .push(&format!("{query}.json"));
        Some(url)
    }

    fn fetch_year(&self, title: &str) -> Result<Option<(String, String)>> {
        let Some(url) = self.build_url(title) else {
            return Ok(None);
        };
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to send lookup request for '{title}'"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Lookup request for '{title}' failed: HTTP {status}");
        }

        let body = response.text().context("Failed to read lookup response")?;
        best_match(&body)
    }
}

impl YearLookup for ImdbLookup {
    fn lookup_year(&self, title: &str) -> Option<String> {
        match self.fetch_year(title) {
            Ok(Some((found_title, year))) => {
                if self.verbose {
                    println!("Found year {year} for '{title}': {found_title}");
                }
                Some(year)
            }
            Ok(None) => {
                if self.verbose {
                    println!("No year found for '{title}'");
                }
                None
            }
            Err(error) => {
                print_warning!("IMDb lookup failed for '{title}': {error:#}");
                None
            }
        }
    }
}

impl YearLookup for NoLookup {
    fn lookup_year(&self, _title: &str) -> Option<String> {
        None
    }
}

/// Pick the title and year of the first suggestion with a year, preferring movies.
fn best_match(body: &str) -> Result<Option<(String, String)>> {
    let response: SuggestionResponse = serde_json::from_str(body).context("Failed to parse lookup response")?;

    let with_year = || response.d.iter().filter(|suggestion| suggestion.y.is_some());
    let best = with_year()
        .find(|suggestion| suggestion.qid.as_deref() == Some("movie"))
        .or_else(|| with_year().next());

    Ok(best.and_then(|suggestion| {
        let year = suggestion.y?;
        Some((suggestion.l.clone().unwrap_or_default(), year.to_string()))
    }))
}

#[cfg(test)]
mod lookup_tests {
    use super::*;

    #[test]
    fn best_match_prefers_movies() {
        let body = r#"{
            "d": [
                {"id": "tt0000001", "l": "Inception: The Cobol Job", "qid": "videoGame", "y": 2010},
                {"id": "tt1375666", "l": "Inception", "qid": "movie", "y": 2010, "s": "Leonardo DiCaprio"}
            ],
            "q": "inception",
            "v": 1
        }"#;
        assert_eq!(
            best_match(body).unwrap(),
            Some(("Inception".to_string(), "2010".to_string()))
        );
    }

    #[test]
    fn best_match_falls_back_to_first_with_year() {
        let body = r#"{"d": [{"l": "Some Name", "qid": "person"}, {"l": "Heat", "qid": "tvMovie", "y": 1972}]}"#;
        assert_eq!(best_match(body).unwrap(), Some(("Heat".to_string(), "1972".to_string())));
    }

    #[test]
    fn best_match_without_results() {
        assert_eq!(best_match(r#"{"q": "zzzz", "v": 1}"#).unwrap(), None);
        assert_eq!(best_match(r#"{"d": []}"#).unwrap(), None);
    }

    #[test]
    fn best_match_invalid_json() {
        assert!(best_match("<html>").is_err());
    }

    #[test]
    fn build_url_uses_first_letter() {
        let lookup = ImdbLookup::new("https://example.com/suggestion/", Duration::from_secs(1), false).unwrap();
        assert_eq!(
            lookup.build_url("Unknown Film").map(String::from).as_deref(),
            Some("https://example.com/suggestion/u/unknown%20film.json")
        );
        assert_eq!(lookup.build_url("  "), None);
    }

    #[test]
    fn build_url_encodes_reserved_characters() {
        let lookup = ImdbLookup::new("https://example.com/suggestion", Duration::from_secs(1), false).unwrap();

        let question = lookup.build_url("What Happened?").unwrap();
        assert_eq!(question.path(), "/suggestion/w/what%20happened%3F.json");
        assert_eq!(question.query(), None);

        let hash = lookup.build_url("Number #9").unwrap();
        assert_eq!(hash.path(), "/suggestion/n/number%20%239.json");
        assert_eq!(hash.fragment(), None);

        let percent = lookup.build_url("100% Wolf").unwrap();
        assert_eq!(percent.path(), "/suggestion/1/100%25%20wolf.json");

        let slash = lookup.build_url("AC/DC Live").unwrap();
        assert_eq!(slash.path(), "/suggestion/a/ac%2Fdc%20live.json");
    }

    #[test]
    fn build_url_on_root_base() {
        let lookup = ImdbLookup::new("http://127.0.0.1:9/", Duration::from_secs(1), false).unwrap();
        assert_eq!(lookup.build_url("Heat").unwrap().path(), "/h/heat.json");
    }

    #[test]
    fn invalid_base_url_is_error() {
        assert!(ImdbLookup::new("not a url", Duration::from_secs(1), false).is_err());
    }

    #[test]
    fn failed_request_is_no_result() {
        // Nothing listens on port 9 on a test machine
        let lookup = ImdbLookup::new("http://127.0.0.1:9", Duration::from_millis(500), false).unwrap();
        assert_eq!(lookup.lookup_year("Inception"), None);
    }

    #[test]
    fn no_lookup_never_finds() {
        assert_eq!(NoLookup.lookup_year("Inception"), None);
    }
}
