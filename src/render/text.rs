use std::fmt::Write;

use crate::domain::Article;

/// Numbered console listing, one `key: value` line per field.
pub fn render(articles: &[Article]) -> String {
    let mut out = String::new();

    for (index, article) in articles.iter().enumerate() {
        let _ = writeln!(out, "{}.", index + 1);
        for (name, value) in article.fields() {
            let _ = writeln!(out, "{}: {}\n", name, value);
        }
    }

    out
}
