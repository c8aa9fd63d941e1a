//! Fragment routing: the URL decides which note is active.
//!
//! # Responsibility
//! - Read the note id from the fragment and seed content from `?note=`.
//! - Abstract the host's address bar behind `LocationHost`.
//!
//! # Invariants
//! - The fragment is used verbatim as the note id (no percent-decoding).
//! - Stripping the seed query preserves the fragment.

use url::{ParseError, Url};

/// Base used to resolve relative references such as `#abc`.
pub const LOCAL_BASE_URL: &str = "hashpad://local/";
/// Query parameter carrying one-shot seed content.
pub const SEED_QUERY_PARAM: &str = "note";

/// Current page address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLocation {
    url: Url,
}

impl NoteLocation {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Location with neither query nor fragment.
    pub fn local() -> Self {
        Self::new(local_base())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Non-empty fragment, which names the active note.
    pub fn note_id(&self) -> Option<&str> {
        self.url.fragment().filter(|fragment| !fragment.is_empty())
    }

    /// Decoded, non-empty `note` query parameter.
    pub fn seed_content(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(name, _)| name == SEED_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    pub fn with_fragment(&self, id: &str) -> Self {
        let mut url = self.url.clone();
        url.set_fragment(Some(id));
        Self::new(url)
    }

    /// Drops the whole query string, keeping path and fragment.
    pub fn without_query(&self) -> Self {
        let mut url = self.url.clone();
        url.set_query(None);
        Self::new(url)
    }
}

impl std::fmt::Display for NoteLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Parses an absolute URL or a reference relative to `LOCAL_BASE_URL`.
///
/// A bare id such as `abc12` is read as the fragment `#abc12`.
pub fn parse_location(input: &str) -> Result<NoteLocation, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(NoteLocation::local());
    }
    match Url::parse(trimmed) {
        Ok(url) => Ok(NoteLocation::new(url)),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let reference = if trimmed.starts_with(['#', '?', '/']) {
                trimmed.to_string()
            } else {
                format!("#{trimmed}")
            };
            local_base().join(&reference).map(NoteLocation::new)
        }
        Err(err) => Err(err),
    }
}

fn local_base() -> Url {
    Url::parse(LOCAL_BASE_URL).expect("valid local base url")
}

/// Host address bar.
pub trait LocationHost {
    fn location(&self) -> NoteLocation;
    /// Publishes `id` as the fragment, keeping the rest of the address.
    fn publish_fragment(&mut self, id: &str);
    /// Replaces the address without a navigation event.
    fn replace(&mut self, location: NoteLocation);
}

/// In-process address bar used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    current: NoteLocation,
    history: Vec<NoteLocation>,
}

impl MemoryLocation {
    pub fn new(current: NoteLocation) -> Self {
        Self {
            current,
            history: Vec::new(),
        }
    }

    /// Simulates the user editing the fragment; returns the new location.
    pub fn navigate_to_fragment(&mut self, id: &str) -> NoteLocation {
        let next = self.current.with_fragment(id);
        self.history.push(std::mem::replace(&mut self.current, next));
        self.current.clone()
    }

    /// Previous locations, oldest first.
    pub fn history(&self) -> &[NoteLocation] {
        &self.history
    }
}

impl LocationHost for MemoryLocation {
    fn location(&self) -> NoteLocation {
        self.current.clone()
    }

    fn publish_fragment(&mut self, id: &str) {
        self.navigate_to_fragment(id);
    }

    fn replace(&mut self, location: NoteLocation) {
        self.current = location;
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_location, LocationHost, MemoryLocation, NoteLocation};

    #[test]
    fn fragment_names_the_note() {
        let location = parse_location("https://pad.example/#ab12c").unwrap();
        assert_eq!(location.note_id(), Some("ab12c"));
        assert_eq!(parse_location("#").unwrap().note_id(), None);
        assert_eq!(NoteLocation::local().note_id(), None);
    }

    #[test]
    fn relative_inputs_resolve_against_local_base() {
        assert_eq!(parse_location("#x1").unwrap().note_id(), Some("x1"));
        assert_eq!(parse_location("x1").unwrap().note_id(), Some("x1"));
        let seeded = parse_location("?note=hi%20there#x1").unwrap();
        assert_eq!(seeded.note_id(), Some("x1"));
        assert_eq!(seeded.seed_content().as_deref(), Some("hi there"));
    }

    #[test]
    fn seed_query_is_decoded_and_empty_is_ignored() {
        let location = parse_location("https://pad.example/?note=a+b%0Ac").unwrap();
        assert_eq!(location.seed_content().as_deref(), Some("a b\nc"));
        assert_eq!(
            parse_location("https://pad.example/?note=").unwrap().seed_content(),
            None
        );
    }

    #[test]
    fn stripping_query_keeps_fragment() {
        let location = parse_location("https://pad.example/app?note=x&y=1#n1").unwrap();
        let stripped = location.without_query();
        assert_eq!(stripped.url().as_str(), "https://pad.example/app#n1");
    }

    #[test]
    fn memory_location_records_history() {
        let mut host = MemoryLocation::new(NoteLocation::local());
        host.publish_fragment("a");
        host.navigate_to_fragment("b");
        assert_eq!(host.location().note_id(), Some("b"));
        assert_eq!(host.history().len(), 2);
    }
}
