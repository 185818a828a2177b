use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::domain::Article;
use crate::render::DOCUMENT_TITLE;

/// Standalone HTML page with an ordered list of articles.
pub fn render(articles: &[Article]) -> String {
    let mut out = String::new();

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", DOCUMENT_TITLE);
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "<h3>{}</h3>", DOCUMENT_TITLE);
    out.push_str("<ol type=\"1\">\n");

    for article in articles {
        out.push_str("<li>");
        for (name, value) in article.fields() {
            let _ = write!(out, "{}:&nbsp;&nbsp;&nbsp;", name);
            match name {
                "link" | "source_origin" => {
                    let _ = write!(
                        out,
                        "<a href=\"{}\">{}</a>",
                        encode_double_quoted_attribute(&value),
                        encode_text(&value)
                    );
                }
                _ => out.push_str(&encode_text(&value)),
            }
            out.push_str("<br/>");
        }
        out.push_str("</li>\n");
    }

    out.push_str("</ol>\n</body>\n</html>\n");
    out
}
