//! Completion text clean-up.
//!
//! Some completion backends prefix their output with a choice index such as
//! `"0:"`. The stripping lives behind `Postprocessor` so it can be swapped
//! per backend.

/// Cleans raw completion text before it is used.
pub trait Postprocessor: Send + Sync {
    /// Clean a single completion.
    fn clean(&self, text: &str) -> String;

    /// Clean each fragment of a multi-part completion and join them.
    ///
    /// For backends that return a list of choices rather than one string.
    /// `OllamaClient` concatenates its stream first and only calls `clean`.
    fn clean_fragments(&self, fragments: &[String]) -> String {
        fragments
            .iter()
            .map(|f| self.clean(f))
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }
}

/// Strips a leading `<token>:` marker and surrounding whitespace.
#[derive(Debug, Clone)]
pub struct IndexPrefixStripper {
    marker: String,
}

impl IndexPrefixStripper {
    /// Strip `<token>:`. An empty token disables stripping.
    pub fn new(token: &str) -> Self {
        let marker = if token.is_empty() {
            String::new()
        } else {
            format!("{token}:")
        };
        Self { marker }
    }
}

impl Default for IndexPrefixStripper {
    fn default() -> Self {
        Self::new("0")
    }
}

impl Postprocessor for IndexPrefixStripper {
    fn clean(&self, text: &str) -> String {
        let text = text.trim();
        if self.marker.is_empty() {
            return text.to_string();
        }
        match text.strip_prefix(self.marker.as_str()) {
            Some(rest) => rest.trim().to_string(),
            None => text.to_string(),
        }
    }
}
