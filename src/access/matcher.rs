//! Committee name matching
//!
//! Assigned committee labels on user profiles ("Tuni AMC") rarely equal the
//! canonical committee names in the backend ("Tuni Agricultural Market
//! Committee"). A label matches a committee name when, after
//! normalization, the two are equal, one contains the other, or both
//! contain the same town token from the alias table.

/// Town tokens linking short labels to full committee names
pub const DEFAULT_ALIAS_TOKENS: [&str; 2] = ["tuni", "kakinada"];

/// Normalize a name for matching: trim, lowercase, collapse whitespace
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Split normalized text into maximal alphanumeric runs
pub fn tokens(name: &str) -> Vec<String> {
    normalize(name)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Why a label matched a committee name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    Alias(String),
}

/// Matches assigned committee labels against committee names
#[derive(Debug, Clone)]
pub struct CommitteeMatcher {
    alias_tokens: Vec<String>,
}

impl Default for CommitteeMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_ALIAS_TOKENS.iter().copied())
    }
}

impl CommitteeMatcher {
    /// Create a matcher with exactly the given alias tokens
    pub fn new<I, S>(alias_tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = Self {
            alias_tokens: Vec::new(),
        };
        matcher.extend(alias_tokens);
        matcher
    }

    /// Create a matcher with the default tokens plus `extra`
    pub fn with_extra_aliases<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = Self::default();
        matcher.extend(extra);
        matcher
    }

    fn extend<I, S>(&mut self, alias_tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for token in alias_tokens {
            let token = normalize(token.as_ref());
            if !token.is_empty() && !self.alias_tokens.contains(&token) {
                self.alias_tokens.push(token);
            }
        }
    }

    pub fn alias_tokens(&self) -> &[String] {
        &self.alias_tokens
    }

    /// Explain how `label` matches `committee_name`, if it does
    ///
    /// An empty label never matches.
    pub fn match_kind(&self, label: &str, committee_name: &str) -> Option<MatchKind> {
        let label = normalize(label);
        let name = normalize(committee_name);
        if label.is_empty() || name.is_empty() {
            return None;
        }

        if label == name {
            return Some(MatchKind::Exact);
        }
        if name.contains(&label) || label.contains(&name) {
            return Some(MatchKind::Substring);
        }

        let label_tokens = tokens(&label);
        let name_tokens = tokens(&name);
        self.alias_tokens
            .iter()
            .find(|alias| label_tokens.contains(alias) && name_tokens.contains(alias))
            .map(|alias| MatchKind::Alias(alias.clone()))
    }

    pub fn matches(&self, label: &str, committee_name: &str) -> bool {
        self.match_kind(label, committee_name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_and_tokens() {
        assert_eq!(normalize("  Tuni   AMC "), "tuni amc");
        assert_eq!(tokens("Kakinada (Rural) AMC"), vec!["kakinada", "rural", "amc"]);
    }

    #[test]
    fn test_exact_and_substring() {
        let matcher = CommitteeMatcher::default();
        assert_eq!(matcher.match_kind("Tuni AMC", "tuni amc"), Some(MatchKind::Exact));
        assert_eq!(
            matcher.match_kind("Pune", "Pune Agricultural Market Committee"),
            Some(MatchKind::Substring)
        );
        assert_eq!(
            matcher.match_kind("Pune Agricultural Market Committee Office", "Pune Agricultural Market Committee"),
            Some(MatchKind::Substring)
        );
    }

    #[test]
    fn test_alias_rule() {
        let matcher = CommitteeMatcher::default();
        assert_eq!(
            matcher.match_kind("Tuni AMC", "Tuni Agricultural Market Committee"),
            Some(MatchKind::Alias("tuni".into()))
        );
        assert!(matcher.matches("Kakinada AMC", "Kakinada Agricultural Market Committee"));
        assert!(!matcher.matches("Tuni AMC", "Kakinada Agricultural Market Committee"));
    }

    #[test]
    fn test_alias_requires_whole_token() {
        let matcher = CommitteeMatcher::default();
        assert!(!matcher.matches("Tuni AMC", "Tunikota Agricultural Market Committee"));
    }

    #[test]
    fn test_unknown_town_without_alias_does_not_match() {
        let matcher = CommitteeMatcher::default();
        assert!(!matcher.matches("Rajahmundry AMC", "Rajahmundry Agricultural Market Committee"));

        let extended = CommitteeMatcher::with_extra_aliases(["Rajahmundry"]);
        assert!(extended.matches("Rajahmundry AMC", "Rajahmundry Agricultural Market Committee"));
        assert_eq!(extended.alias_tokens().len(), 3);
    }

    #[test]
    fn test_empty_label_never_matches() {
        let matcher = CommitteeMatcher::default();
        assert!(!matcher.matches("", "Tuni Agricultural Market Committee"));
        assert!(!matcher.matches("   ", "Tuni Agricultural Market Committee"));
    }
}
