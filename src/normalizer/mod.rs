mod dates;

use std::sync::LazyLock;

use feed_rs::model::{Entry, FeedType};
use feed_rs::parser;
use html_escape::decode_html_entities;
use regex::Regex;

use crate::app::{ReaderError, Result};
use crate::domain::{source_origin, Article, Published};

use dates::{parse_date, RawDates};

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[A-Za-z/][^>]*>").expect("markup tag pattern is valid"));

/// Turns raw feed bytes into [`Article`]s.
#[derive(Clone)]
pub struct Normalizer;

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Extract up to `limit` articles in feed order.
    ///
    /// Entries without a title or link are skipped and do not count towards
    /// the limit. Content that is not a feed, or a feed that yields no
    /// articles, is reported as [`ReaderError::NoArticles`].
    pub fn parse(&self, body: &[u8], limit: usize, source_url: &str) -> Result<Vec<Article>> {
        let feed = parser::parse(body).map_err(|e| {
            tracing::warn!("Content is not a feed: {}", e);
            ReaderError::NoArticles
        })?;

        let origin = source_origin(source_url);
        let use_updated = matches!(feed.feed_type, FeedType::Atom);
        tracing::debug!("Parsed {} entries from {}", feed.entries.len(), origin);

        let raw_dates = dates::scan_item_dates(body).filter(|raw| raw.len() == feed.entries.len());
        if raw_dates.is_none() {
            tracing::debug!("Item dates not aligned with entries, using normalized UTC dates");
        }

        let articles: Vec<Article> = feed
            .entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let raw = raw_dates.as_ref().and_then(|r| r.get(index));
                match to_article(entry, &origin, use_updated, raw) {
                    Ok(article) => Some(article),
                    Err(e) => {
                        tracing::warn!("Skipping entry #{}: {}", index + 1, e);
                        None
                    }
                }
            })
            .take(limit)
            .collect();

        if articles.is_empty() {
            return Err(ReaderError::NoArticles);
        }

        Ok(articles)
    }
}

fn to_article(entry: Entry, origin: &str, use_updated: bool, raw: Option<&RawDates>) -> Result<Article> {
    let title = entry
        .title
        .map(|t| decode_html_entities(&t.content).trim().to_string())
        .unwrap_or_default();
    let link = entry
        .links
        .first()
        .map(|l| l.href.trim().to_string())
        .unwrap_or_default();

    // the day as written wins; feed-rs only knows the UTC instant
    let as_written = raw.and_then(|r| {
        let updated = if use_updated { r.updated.as_deref() } else { None };
        r.published
            .as_deref()
            .and_then(parse_date)
            .or_else(|| updated.and_then(parse_date))
    });
    let published = as_written.or_else(|| {
        entry
            .published
            .or(if use_updated { entry.updated } else { None })
            .map(|dt| dt.date_naive())
    });

    let description = entry.summary.map(|s| strip_markup(&s.content));

    let category = entry.categories.into_iter().next().map(|c| c.label.unwrap_or(c.term));

    Ok(Article::new(title, link, origin)?
        .with_published(Published::from(published))
        .with_description(description)
        .with_category(category))
}

/// Remove markup tags and decode entities, leaving plain text.
pub fn strip_markup(html: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(html, "");
    decode_html_entities(&stripped).trim().to_string()
}
