use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database migration failed: {0}")]
    Migration(String),

    #[error("Connection error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL or no URL at all: {0}")]
    InvalidUrl(String),

    #[error("Unsupported URL scheme '{0}', the link has to start with http:// or https://")]
    UnsupportedScheme(String),

    #[error("Parsing failed. No needed tags on your page. Maybe it's not an RSS link")]
    NoArticles,

    #[error("Feed item is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Not correct date format: '{0}'. Please, use 20191020 (%Y%m%d)")]
    InvalidDate(String),

    #[error("There is no news according to your criteria")]
    NoMatchingNews,

    #[error("Font error: {0}")]
    Font(String),

    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<url::ParseError> for ReaderError {
    fn from(e: url::ParseError) -> Self {
        ReaderError::InvalidUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;
