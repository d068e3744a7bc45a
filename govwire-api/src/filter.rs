//! Presentation-layer article filtering
//!
//! Pure, stateless view function over an already-materialized article list:
//! exact match on official name, exact match on department, case-insensitive
//! keyword substring over title or content.

use govwire_core::Article;

pub fn filter_articles(
    articles: Vec<Article>,
    official: Option<&str>,
    department: Option<&str>,
    keyword: Option<&str>,
) -> Vec<Article> {
    let keyword_lower = keyword.map(str::to_lowercase);

    articles
        .into_iter()
        .filter(|article| {
            let official_match = official
                .map(|name| article.officials.iter().any(|o| o == name))
                .unwrap_or(true);

            let department_match = department
                .map(|d| article.department == d)
                .unwrap_or(true);

            let keyword_match = keyword_lower
                .as_deref()
                .map(|kw| {
                    article.title.to_lowercase().contains(kw)
                        || article.content.to_lowercase().contains(kw)
                })
                .unwrap_or(true);

            official_match && department_match && keyword_match
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(url: &str, title: &str, department: &str, officials: &[&str]) -> Article {
        Article {
            url: url.to_string(),
            title: title.to_string(),
            content: "summary text".to_string(),
            department: department.to_string(),
            officials: officials.iter().map(|s| s.to_string()).collect(),
            date: Utc::now(),
            source: None,
        }
    }

    fn fixture() -> Vec<Article> {
        vec![
            article(
                "https://a",
                "Budget Talks Continue",
                "Treasury",
                &["Janet Yellen"],
            ),
            article(
                "https://b",
                "Executive Order Signed",
                "Executive",
                &["Joe Biden"],
            ),
            article("https://c", "Transit funding", "Transportation", &[]),
        ]
    }

    #[test]
    fn no_filters_pass_everything_through() {
        assert_eq!(filter_articles(fixture(), None, None, None).len(), 3);
    }

    #[test]
    fn official_filter_is_exact_match() {
        let filtered = filter_articles(fixture(), Some("Janet Yellen"), None, None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].url, "https://a");

        // Partial names do not match
        assert!(filter_articles(fixture(), Some("Yellen"), None, None).is_empty());
    }

    #[test]
    fn department_filter_is_exact_match() {
        let filtered = filter_articles(fixture(), None, Some("Executive"), None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].url, "https://b");
    }

    #[test]
    fn keyword_filter_is_case_insensitive_substring() {
        let filtered = filter_articles(fixture(), None, None, Some("BUDGET"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].url, "https://a");

        // Matches content as well as title
        assert_eq!(filter_articles(fixture(), None, None, Some("summary")).len(), 3);
    }

    #[test]
    fn filters_compose() {
        let filtered = filter_articles(fixture(), Some("Joe Biden"), Some("Treasury"), None);
        assert!(filtered.is_empty());
    }
}
