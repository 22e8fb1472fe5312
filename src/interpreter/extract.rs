//! Structural extraction of a trailing noun phrase after a trigger word,
//! e.g. "incidents at Main Shaft" or "filter by type: Injury".

use regex::Regex;

/// Pulls the phrase following one of a set of trigger words.
#[derive(Debug, Clone)]
pub struct PhraseExtractor {
    trigger: Regex,
    date_suffix: Regex,
}

impl PhraseExtractor {
    /// `triggers` is a regex alternation matched case-insensitively on word boundaries.
    pub fn new(triggers: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            trigger: Regex::new(&format!(r"(?i)\b(?:{triggers})\b\s*:?\s*(?P<phrase>.*)$"))?,
            date_suffix: Regex::new(
                r"(?i)\s*\b(?:today|yesterday|this\s+week|this\s+month)\s*$",
            )?,
        })
    }

    pub fn location() -> Result<Self, regex::Error> {
        Self::new("location|at|in|from")
    }

    pub fn incident_type() -> Result<Self, regex::Error> {
        Self::new(r"type|kind\s+of|category")
    }

    /// The phrase after the first trigger, in the user's casing, or `None` when
    /// there is no trigger or nothing meaningful follows it.
    pub fn extract(&self, text: &str) -> Option<String> {
        let captures = self.trigger.captures(text)?;
        let raw = captures.name("phrase")?.as_str().trim();

        // At most one punctuation character goes, whether it ends the phrase
        // or follows a date qualifier.
        let without_punct = trim_one_trailing_punct(raw).trim_end();
        let without_date = self.date_suffix.replace(without_punct, "");
        let phrase = without_date.trim();

        if phrase.is_empty() {
            None
        } else {
            Some(phrase.to_string())
        }
    }
}

fn trim_one_trailing_punct(s: &str) -> &str {
    match s.chars().last() {
        Some(c) if c.is_ascii_punctuation() => &s[..s.len() - c.len_utf8()],
        _ => s,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_location_keeps_casing() {
        let extractor = PhraseExtractor::location().unwrap();
        assert_eq!(
            extractor.extract("Show incidents at Main Shaft"),
            Some("Main Shaft".to_string())
        );
    }

    #[test]
    fn test_location_with_colon() {
        let extractor = PhraseExtractor::location().unwrap();
        assert_eq!(
            extractor.extract("Filter by location: Tunnel B"),
            Some("Tunnel B".to_string())
        );
    }

    #[test]
    fn test_location_strips_date_qualifier_and_punctuation() {
        let extractor = PhraseExtractor::location().unwrap();
        assert_eq!(
            extractor.extract("show incidents at Main Shaft today"),
            Some("Main Shaft".to_string())
        );
        assert_eq!(
            extractor.extract("anything in Kolwezi this week?"),
            Some("Kolwezi".to_string())
        );
        assert_eq!(
            extractor.extract("incidents from Likasi."),
            Some("Likasi".to_string())
        );
    }

    #[test]
    fn test_only_one_trailing_punctuation_removed() {
        let extractor = PhraseExtractor::location().unwrap();
        assert_eq!(
            extractor.extract("incidents at Shaft 3?!"),
            Some("Shaft 3?".to_string())
        );
    }

    #[test]
    fn test_punctuation_before_date_qualifier_is_kept() {
        let extractor = PhraseExtractor::location().unwrap();
        assert_eq!(
            extractor.extract("at Shaft 3! today?"),
            Some("Shaft 3!".to_string())
        );
        assert_eq!(
            extractor.extract("incidents at Main Shaft today."),
            Some("Main Shaft".to_string())
        );
    }

    #[test]
    fn test_trigger_inside_word_is_ignored() {
        let extractor = PhraseExtractor::location().unwrap();
        assert_eq!(extractor.extract("what is the most common type"), None);
        assert_eq!(extractor.extract("show critical incidents"), None);
    }

    #[test]
    fn test_date_only_phrase_is_not_a_location() {
        let extractor = PhraseExtractor::location().unwrap();
        assert_eq!(extractor.extract("high severity from yesterday"), None);
        assert_eq!(extractor.extract("incidents from this month"), None);
    }

    #[test]
    fn test_type_extraction() {
        let extractor = PhraseExtractor::incident_type().unwrap();
        assert_eq!(
            extractor.extract("Filter by type: Injury"),
            Some("Injury".to_string())
        );
        assert_eq!(
            extractor.extract("what kind of equipment failures"),
            Some("equipment failures".to_string())
        );
        assert_eq!(
            extractor.extract("What is the most common incident type?"),
            None
        );
    }

    #[test]
    fn test_category_trigger() {
        let extractor = PhraseExtractor::incident_type().unwrap();
        assert_eq!(
            extractor.extract("show category: Environmental"),
            Some("Environmental".to_string())
        );
        assert_eq!(
            extractor.extract("incidents in category: Environmental"),
            Some("Environmental".to_string())
        );
    }

    #[test]
    fn test_location_trigger_also_sees_category_phrase() {
        // "in" is a location trigger, so the location extractor claims this
        // text too; the interpreter tries location first.
        let extractor = PhraseExtractor::location().unwrap();
        assert_eq!(
            extractor.extract("incidents in category: Environmental"),
            Some("category: Environmental".to_string())
        );
    }
}
