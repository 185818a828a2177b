use std::io::Write;

use chrono::NaiveDate;

use crate::app::{AppContext, Result};
use crate::domain::Article;
use crate::render::{self, Format, Rendered};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Fetch a feed, store its articles, then render them.
    Live { url: String },
    /// Render stored articles; never fetches and never writes the store.
    History {
        date: NaiveDate,
        source: Option<String>,
    },
}

/// Formats requested on top of the plain console listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputFormats {
    pub json: bool,
    pub html: bool,
    pub pdf: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub mode: Mode,
    pub limit: usize,
    pub formats: OutputFormats,
}

impl RunPlan {
    /// Renderings to produce, in order.
    ///
    /// JSON replaces the text listing. In live mode a document format alone
    /// suppresses the console listing; stored news is always listed.
    pub fn steps(&self) -> Vec<Format> {
        let mut steps = Vec::with_capacity(3);
        let has_document = self.formats.html || self.formats.pdf;

        if self.formats.json {
            steps.push(Format::Json);
        } else if matches!(self.mode, Mode::History { .. }) || !has_document {
            steps.push(Format::Text);
        }
        if self.formats.html {
            steps.push(Format::Html);
        }
        if self.formats.pdf {
            steps.push(Format::Pdf);
        }

        steps
    }
}

#[derive(Debug)]
pub struct Outcome {
    pub articles: Vec<Article>,
    pub inserted: usize,
    pub files: Vec<(Format, std::path::PathBuf)>,
}

/// Execute `plan`, writing console output to `out`.
pub async fn run(ctx: &AppContext, plan: &RunPlan, out: &mut dyn Write) -> Result<Outcome> {
    let (articles, inserted) = match &plan.mode {
        Mode::Live { url } => fetch_and_store(ctx, url, plan.limit).await?,
        Mode::History { date, source } => {
            let articles = ctx.store.query(*date, source.as_deref(), plan.limit)?;
            tracing::info!("Found {} stored articles", articles.len());
            (articles, 0)
        }
    };

    let mut files = Vec::new();
    for format in plan.steps() {
        match render::render(&articles, format, &ctx.config.output)? {
            Rendered::Text(text) => {
                writeln!(out, "{}", text.trim_end())?;
            }
            Rendered::File(path) => {
                let label = if format == Format::Pdf { "PDF" } else { "HTML" };
                writeln!(out, "(the completed {} is stored at: {})", label, path.display())?;
                files.push((format, path));
            }
        }
    }

    Ok(Outcome {
        articles,
        inserted,
        files,
    })
}

async fn fetch_and_store(ctx: &AppContext, url: &str, limit: usize) -> Result<(Vec<Article>, usize)> {
    let body = ctx.fetcher.fetch(url).await?;
    let articles = ctx.normalizer.parse(&body, limit, url)?;
    tracing::info!("Extracted {} articles from {}", articles.len(), url);

    let inserted = ctx.store.upsert(&articles)?;
    match ctx.store.count() {
        Ok(total) => tracing::info!("Stored {} new articles ({} total)", inserted, total),
        Err(e) => tracing::info!("Stored {} new articles (total unavailable: {})", inserted, e),
    }

    Ok((articles, inserted))
}
