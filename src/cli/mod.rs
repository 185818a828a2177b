pub mod commands;

use std::path::PathBuf;

use clap::Parser;

use crate::app::{ReaderError, Result};
use crate::cli::commands::{Mode, OutputFormats, RunPlan};
use crate::config::ReaderConfig;
use crate::domain::source_origin;
use crate::fetcher::validate_feed_url;
use crate::store::parse_query_date;

#[derive(Parser, Debug)]
#[command(name = "rss_reader", version)]
#[command(about = "Command-line RSS reader", long_about = None)]
pub struct Cli {
    /// RSS link starting with http:// or https://; with --date it filters
    /// stored news by this source
    pub source: Option<String>,

    /// Output verbose status messages
    #[arg(short, long)]
    pub verbose: bool,

    /// Limit the number of news topics
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print news from the local storage published on this date
    #[arg(long, value_name = "YYYYMMDD")]
    pub date: Option<String>,

    /// Print result as JSON in stdout
    #[arg(long)]
    pub json: bool,

    /// Write the result to an HTML file
    #[arg(long)]
    pub html: bool,

    /// Write the result to a PDF file
    #[arg(long)]
    pub pdf: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Turn the parsed arguments into the plan for this invocation.
    pub fn plan(&self, reader: &ReaderConfig) -> Result<RunPlan> {
        let mode = match &self.date {
            Some(date) => Mode::History {
                date: parse_query_date(date)?,
                source: self.source.as_deref().map(source_origin),
            },
            None => {
                let source = self
                    .source
                    .as_deref()
                    .ok_or_else(|| ReaderError::InvalidUrl("no source given".into()))?;
                validate_feed_url(source)?;
                Mode::Live {
                    url: source.trim().to_string(),
                }
            }
        };

        Ok(RunPlan {
            mode,
            limit: self.limit.unwrap_or(reader.default_limit),
            formats: OutputFormats {
                json: self.json,
                html: self.html,
                pdf: self.pdf,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("rss_reader").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["https://rssexport.rbc.ru/rbcnews/news/30/full.rss"]);
        let plan = cli.plan(&ReaderConfig::default()).unwrap();

        assert_eq!(
            plan.mode,
            Mode::Live {
                url: "https://rssexport.rbc.ru/rbcnews/news/30/full.rss".into()
            }
        );
        assert_eq!(plan.limit, 400);
        assert_eq!(plan.formats, OutputFormats::default());
    }

    #[test]
    fn test_history_mode_with_source_filter() {
        let cli = parse(&["--date", "20240101", "http://x.com/feed.xml", "--limit=10", "--json"]);
        let plan = cli.plan(&ReaderConfig::default()).unwrap();

        assert_eq!(
            plan.mode,
            Mode::History {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                source: Some("http://x.com".into()),
            }
        );
        assert_eq!(plan.limit, 10);
        assert!(plan.formats.json);
    }

    #[test]
    fn test_bad_date_is_reported() {
        let cli = parse(&["--date", "2024-13-45"]);
        assert!(matches!(
            cli.plan(&ReaderConfig::default()),
            Err(ReaderError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_live_mode_requires_http_url() {
        let missing = parse(&[]);
        assert!(matches!(
            missing.plan(&ReaderConfig::default()),
            Err(ReaderError::InvalidUrl(_))
        ));

        let ftp = parse(&["ftp://x.com/feed"]);
        assert!(matches!(
            ftp.plan(&ReaderConfig::default()),
            Err(ReaderError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_limit_falls_back_to_config() {
        let cli = parse(&["http://x.com/feed", "--html", "--pdf"]);
        let plan = cli.plan(&ReaderConfig { default_limit: 25 }).unwrap();

        assert_eq!(plan.limit, 25);
        assert!(plan.formats.html && plan.formats.pdf && !plan.formats.json);
    }
}
