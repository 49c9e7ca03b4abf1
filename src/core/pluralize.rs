//! Plural forms of resource names
//!
//! REST paths and list envelopes use the plural (`/categories`,
//! `{"categories": [...]}`) while single-item envelopes use the singular.

/// Converts singular resource names to plural ones
pub struct Pluralizer;

impl Pluralizer {
    /// Plural form of a lowercase resource name
    ///
    /// # Examples
    ///
    /// ```
    /// use bizlist::core::pluralize::Pluralizer;
    ///
    /// assert_eq!(Pluralizer::pluralize("lead"), "leads");
    /// assert_eq!(Pluralizer::pluralize("category"), "categories");
    /// assert_eq!(Pluralizer::pluralize("onboarding"), "onboardings");
    /// assert_eq!(Pluralizer::pluralize("address"), "addresses");
    /// ```
    pub fn pluralize(singular: &str) -> String {
        if singular.is_empty() {
            return String::new();
        }

        if let Some(irregular) = Self::irregular(singular) {
            return irregular.to_string();
        }

        // Compound names pluralize their last segment: budget_line -> budget_lines
        if let Some((head, tail)) = singular.rsplit_once(['_', '-']) {
            let sep = &singular[head.len()..head.len() + 1];
            return format!("{head}{sep}{}", Self::pluralize(tail));
        }

        let vowel_before = |suffix_len: usize| {
            singular[..singular.len() - suffix_len]
                .chars()
                .last()
                .is_some_and(|c| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        };

        if let Some(stem) = singular.strip_suffix('y') {
            if !stem.is_empty() && !vowel_before(1) {
                return format!("{stem}ies");
            }
        }

        if ["s", "sh", "ch", "x", "z"]
            .iter()
            .any(|suffix| singular.ends_with(suffix))
        {
            return format!("{singular}es");
        }

        format!("{singular}s")
    }

    fn irregular(word: &str) -> Option<&'static str> {
        match word {
            "person" => Some("people"),
            "staff" => Some("staff"),
            "data" => Some("data"),
            "analysis" => Some("analyses"),
            _ => None,
        }
    }
}
