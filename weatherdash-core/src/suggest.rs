use std::collections::HashSet;

use crate::history::HistoryEntry;

/// Cities offered for autocomplete before any search has been made.
pub const DEFAULT_CITIES: &[&str] = &[
    "Hanoi",
    "Ho Chi Minh City",
    "Da Nang",
    "Hue",
    "Hai Phong",
    "Can Tho",
    "Nha Trang",
    "Da Lat",
    "Bangkok",
    "Singapore",
    "Tokyo",
    "Seoul",
    "Beijing",
    "Sydney",
    "London",
    "Paris",
    "Berlin",
    "New York",
];

/// Static city dictionary that suggestions are drawn from, together with
/// whatever cities appear in the search history at query time.
#[derive(Debug, Clone)]
pub struct SuggestionIndex {
    dictionary: Vec<String>,
}

impl SuggestionIndex {
    pub fn new<I, S>(dictionary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let dictionary = dictionary
            .into_iter()
            .map(Into::into)
            .filter(|city: &String| seen.insert(city.clone()))
            .collect();

        Self { dictionary }
    }

    /// [`DEFAULT_CITIES`] followed by `extra` (e.g. from the config file).
    pub fn with_default_cities<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let defaults = DEFAULT_CITIES.iter().map(|c| (*c).to_string());
        Self::new(defaults.chain(extra.into_iter().map(Into::into)))
    }

    pub fn dictionary(&self) -> &[String] {
        &self.dictionary
    }

    pub fn suggest(&self, query: &str, history: &[HistoryEntry]) -> Vec<String> {
        suggest(query, &self.dictionary, history)
    }
}

/// Candidate cities whose name starts with `query`, ignoring case.
///
/// Candidates are the dictionary followed by history cities, de-duplicated on
/// their exact spelling. An empty query means "hide suggestions" and yields
/// nothing.
pub fn suggest<S: AsRef<str>>(
    query: &str,
    dictionary: &[S],
    history: &[HistoryEntry],
) -> Vec<String> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let candidates =
        dictionary.iter().map(AsRef::as_ref).chain(history.iter().map(|e| e.city().trim()));

    let mut seen = HashSet::new();
    candidates
        .filter(|city| seen.insert(*city))
        .filter(|city| city.to_lowercase().starts_with(&query))
        .map(str::to_string)
        .collect()
}
