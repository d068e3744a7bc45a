//! Mention Scorer
//!
//! Extracts tracked official names present in a normalized article and
//! applies counter increments. Matching is a literal case-insensitive
//! substring check against the title and content; an official is credited at
//! most once per article regardless of how many times their name appears.

use tracing::debug;

use govwire_core::Article;

use crate::official_registry::{OfficialRegistry, RegistryError};

/// Tracked official names mentioned in the article, in tracked-set order.
///
/// Pure function of the article text and the tracked set. Each name appears
/// at most once in the result.
pub fn officials_mentioned(article: &Article, tracked: &[String]) -> Vec<String> {
    let haystack = format!(
        "{} {}",
        article.title.to_lowercase(),
        article.content.to_lowercase()
    );

    tracked
        .iter()
        .filter(|name| !name.is_empty() && haystack.contains(&name.to_lowercase()))
        .cloned()
        .collect()
}

/// Credit every tracked official mentioned in the article with exactly one
/// increment. Returns the number of credits applied.
///
/// An `UnknownOfficial` answer from the registry is ignored at this boundary
/// (the tracked set may have been administered between the snapshot and the
/// increment); storage failures propagate.
pub fn credit_mentions(
    article: &Article,
    tracked: &[String],
    registry: &OfficialRegistry,
) -> Result<usize, RegistryError> {
    let mut credited = 0;

    for name in officials_mentioned(article, tracked) {
        match registry.increment_mentions(&name) {
            Ok(count) => {
                debug!("Credited {} (now {}) for {}", name, count, article.url);
                credited += 1;
            }
            Err(RegistryError::UnknownOfficial(name)) => {
                debug!("Ignoring mention of untracked official: {}", name);
            }
            Err(e) => return Err(e),
        }
    }

    Ok(credited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(title: &str, content: &str) -> Article {
        Article {
            url: "https://example.com/a".to_string(),
            title: title.to_string(),
            content: content.to_string(),
            department: "General".to_string(),
            officials: vec![],
            date: Utc::now(),
            source: None,
        }
    }

    fn tracked() -> Vec<String> {
        vec!["Joe Biden".to_string(), "Janet Yellen".to_string()]
    }

    #[test]
    fn matching_is_case_insensitive() {
        let article = article("JOE BIDEN signs order", "routine business");
        assert_eq!(officials_mentioned(&article, &tracked()), vec!["Joe Biden"]);
    }

    #[test]
    fn repeated_occurrences_credit_once() {
        let article = article(
            "Joe Biden speaks",
            "Joe Biden said today that Joe Biden will travel",
        );
        let mentioned = officials_mentioned(&article, &tracked());
        assert_eq!(mentioned, vec!["Joe Biden"]);
    }

    #[test]
    fn matches_in_title_or_content() {
        let in_title = article("Janet Yellen testifies", "markets react");
        assert_eq!(
            officials_mentioned(&in_title, &tracked()),
            vec!["Janet Yellen"]
        );

        let in_content = article("Treasury hearing", "remarks from Janet Yellen");
        assert_eq!(
            officials_mentioned(&in_content, &tracked()),
            vec!["Janet Yellen"]
        );
    }

    #[test]
    fn unmentioned_officials_get_nothing() {
        let article = article("Weather report", "sunny with a chance of rain");
        assert!(officials_mentioned(&article, &tracked()).is_empty());
    }

    #[test]
    fn substring_matching_is_literal() {
        // Name-inside-name false positives are accepted behavior
        let tracked = vec!["John Smith".to_string(), "Smith".to_string()];
        let article = article("John Smith visits", "");
        assert_eq!(
            officials_mentioned(&article, &tracked),
            vec!["John Smith", "Smith"]
        );
    }

    #[test]
    fn credit_mentions_applies_one_increment_per_official() {
        let registry = OfficialRegistry::new_in_memory().unwrap();
        registry
            .seed(&[("Joe Biden", "Executive"), ("Janet Yellen", "Treasury")])
            .unwrap();

        let article = article("Joe Biden meets Janet Yellen", "Joe Biden again");
        let names = registry.tracked_names().unwrap();
        let credited = credit_mentions(&article, &names, &registry).unwrap();

        assert_eq!(credited, 2);
        assert_eq!(registry.mentions_count("Joe Biden").unwrap(), 1);
        assert_eq!(registry.mentions_count("Janet Yellen").unwrap(), 1);
    }

    #[test]
    fn credit_mentions_ignores_names_dropped_from_registry() {
        let registry = OfficialRegistry::new_in_memory().unwrap();
        registry.seed(&[("Joe Biden", "Executive")]).unwrap();

        // Tracked list mentions a name the registry does not know
        let names = vec!["Joe Biden".to_string(), "Janet Yellen".to_string()];
        let article = article("Joe Biden and Janet Yellen", "");
        let credited = credit_mentions(&article, &names, &registry).unwrap();

        assert_eq!(credited, 1);
        assert_eq!(registry.mentions_count("Joe Biden").unwrap(), 1);
    }
}
