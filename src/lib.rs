//! # rss_reader
//!
//! A command-line RSS reader that keeps every article it has seen in a local
//! SQLite file, so past news can be listed again by publish date.
//!
//! ## Architecture
//!
//! ```text
//! live:    Fetcher → Normalizer → Store.upsert → Render
//! history:                        Store.query  → Render
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Print the latest news
//! rss_reader https://rssexport.rbc.ru/rbcnews/news/30/full.rss --limit 5
//!
//! # Same, as JSON plus an HTML page
//! rss_reader https://rssexport.rbc.ru/rbcnews/news/30/full.rss --json --html
//!
//! # News stored for 20 October 2019, from one source only
//! rss_reader --date 20191020 https://rssexport.rbc.ru/rbcnews/news/30/full.rss
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together the store,
/// fetcher and normalizer for one invocation.
pub mod app;

/// Command-line interface using clap.
///
/// [`Cli`](cli::Cli) parses arguments into a [`RunPlan`](cli::commands::RunPlan),
/// which [`run`](cli::commands::run) executes.
pub mod cli;

/// TOML configuration: storage location, output paths, HTTP settings.
pub mod config;

/// Core domain model: [`Article`](domain::Article) and its publish date.
pub mod domain;

/// HTTP fetching of raw feed content.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for feed fetching
/// - [`HttpFetcher`](fetcher::http_fetcher::HttpFetcher): reqwest-based implementation
pub mod fetcher;

/// Feed parsing and normalization.
///
/// Converts RSS 0.9x/1.0/2.0, Atom and JSON Feed into
/// [`Article`](domain::Article)s.
pub mod normalizer;

/// Console text, JSON, HTML and PDF output.
pub mod render;

/// SQLite persistence layer.
///
/// - [`Store`](store::Store): Trait defining storage operations
/// - [`SqliteStore`](store::SqliteStore): SQLite implementation
pub mod store;
