//! Output formats for a list of articles.
//!
//! Console formats come back as text; document formats are written to the
//! paths in [`OutputConfig`] and come back as the absolute path written.

pub mod html;
pub mod json;
pub mod pdf;
pub mod text;

use std::fs;
use std::path::{Path, PathBuf};

use crate::app::Result;
use crate::config::OutputConfig;
use crate::domain::Article;

pub const DOCUMENT_TITLE: &str = "List of your articles";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
    Html,
    Pdf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Text(String),
    File(PathBuf),
}

pub fn render(articles: &[Article], format: Format, output: &OutputConfig) -> Result<Rendered> {
    match format {
        Format::Text => Ok(Rendered::Text(text::render(articles))),
        Format::Json => Ok(Rendered::Text(json::render(articles)?)),
        Format::Html => {
            tracing::info!("Forming HTML");
            let document = html::render(articles);
            write_document(&output.html_path, document.as_bytes()).map(Rendered::File)
        }
        Format::Pdf => {
            tracing::info!("Forming PDF");
            let font_file = pdf::load_font_file(output.pdf_font.as_deref())?;
            let font = match &font_file {
                Some(file) => pdf::PdfFont::TrueType(pdf::TrueTypeFont::parse(&file.data, &file.name)?),
                None => pdf::PdfFont::Helvetica,
            };
            let document = pdf::render(articles, &font);
            write_document(&output.pdf_path, &document).map(Rendered::File)
        }
    }
}

/// Replace whatever is at `path` with `contents` and return its absolute path.
fn write_document(path: &Path, contents: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());

    Ok(fs::canonicalize(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ReaderError;

    fn output_in(dir: &Path) -> OutputConfig {
        OutputConfig {
            html_path: dir.join("docs").join("article_list.html"),
            pdf_path: dir.join("article_list.pdf"),
            pdf_font: None,
        }
    }

    fn articles() -> Vec<Article> {
        vec![Article::new("A", "http://x.com/1", "http://x.com").unwrap()]
    }

    #[test]
    fn test_console_formats_return_text() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());

        assert!(matches!(render(&articles(), Format::Text, &output).unwrap(), Rendered::Text(_)));
        assert!(matches!(render(&articles(), Format::Json, &output).unwrap(), Rendered::Text(_)));
    }

    #[test]
    fn test_html_file_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());
        fs::create_dir_all(output.html_path.parent().unwrap()).unwrap();
        fs::write(&output.html_path, "stale content that is much longer than anything rendered ".repeat(200)).unwrap();

        let Rendered::File(path) = render(&articles(), Format::Html, &output).unwrap() else {
            panic!("expected a file");
        };

        assert!(path.is_absolute());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(!written.contains("stale content"));
    }

    #[test]
    fn test_pdf_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let output = output_in(dir.path());

        let Rendered::File(path) = render(&articles(), Format::Pdf, &output).unwrap() else {
            panic!("expected a file");
        };

        assert_eq!(path, fs::canonicalize(&output.pdf_path).unwrap());
        let written = fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn test_unusable_configured_font_fails_the_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let font_path = dir.path().join("not-a-font.ttf");
        fs::write(&font_path, "plain text").unwrap();
        let output = OutputConfig {
            pdf_font: Some(font_path),
            ..output_in(dir.path())
        };

        let err = render(&articles(), Format::Pdf, &output).unwrap_err();

        assert!(matches!(err, ReaderError::Font(_)));
        assert!(!output.pdf_path.exists());
    }
}
