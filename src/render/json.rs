use crate::app::Result;
use crate::domain::Article;

/// Pretty-printed JSON array; non-ASCII text is written as-is.
pub fn render(articles: &[Article]) -> Result<String> {
    tracing::info!("Output will be in JSON format");
    Ok(serde_json::to_string_pretty(articles)?)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Published;

    #[test]
    fn test_round_trip_preserves_fields() {
        let articles = vec![
            Article::new("Роспотребнадзор выявил нарушения", "http://x.com/1", "http://x.com")
                .unwrap()
                .with_published(Published::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
                .with_description(Some("Проверка «МДМ» — итоги".into()))
                .with_category(Some("Общество".into())),
            Article::new("B", "http://x.com/2", "http://x.com").unwrap(),
        ];

        let json = render(&articles).unwrap();
        let parsed: Vec<Article> = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, articles);
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let articles = vec![Article::new("Новости", "http://x.com/1", "http://x.com").unwrap()];
        let json = render(&articles).unwrap();

        assert!(json.contains("\"title\": \"Новости\""));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_sentinels_are_strings() {
        let articles = vec![Article::new("B", "http://x.com/2", "http://x.com").unwrap()];
        let value: serde_json::Value = serde_json::from_str(&render(&articles).unwrap()).unwrap();

        assert_eq!(value[0]["published"], "unknown");
        assert_eq!(value[0]["description"], "unknown");
        assert_eq!(value[0]["category"], "unknown");
    }
}
