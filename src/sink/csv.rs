// src/sink/csv.rs
// =============================================================================
// CSV output: one row per article.
//
// Columns: title,url,summary,links,categories,image_url,date_scraped
//   links      -> JSON array of titles
//   categories -> joined with '|'
//
// Quoting follows RFC 4180: a field containing a comma, quote or newline is
// wrapped in quotes and inner quotes are doubled. The tiny reader below is
// only used by `dedupe` mode to learn which titles a file already holds.
// =============================================================================

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::mem::take;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ArticleSink;
use crate::article::{title_key, Article};
use crate::config::WriteMode;
use crate::error::SinkError;

pub const HEADERS: [&str; 7] = [
    "title",
    "url",
    "summary",
    "links",
    "categories",
    "image_url",
    "date_scraped",
];

pub struct CsvSink {
    path: PathBuf,
    mode: WriteMode,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, mode: WriteMode) -> Self {
        CsvSink {
            path: path.into(),
            mode,
        }
    }

    fn io_error(&self, source: io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }

    // Title keys already in the file (empty when it does not exist yet)
    fn existing_titles(&self) -> Result<Vec<String>, SinkError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let text = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        Ok(parse_rows(&text)
            .into_iter()
            .filter(|row| row.first().map(String::as_str) != Some(HEADERS[0]))
            .filter_map(|row| row.into_iter().next())
            .map(|title| title_key(&title))
            .collect())
    }
}

impl ArticleSink for CsvSink {
    fn write(&mut self, articles: &[Article]) -> Result<usize, SinkError> {
        ensure_parent(&self.path).map_err(|e| self.io_error(e))?;

        let rows: Vec<&Article> = match self.mode {
            WriteMode::Deduplicate => {
                let existing = self.existing_titles()?;
                articles
                    .iter()
                    .filter(|a| !existing.contains(&a.key()))
                    .collect()
            }
            _ => articles.iter().collect(),
        };

        let (file, needs_header) = match self.mode {
            WriteMode::Overwrite => (File::create(&self.path), true),
            WriteMode::Append | WriteMode::Deduplicate => {
                let is_empty = fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
                let file = OpenOptions::new().create(true).append(true).open(&self.path);
                (file, is_empty)
            }
        };

        let mut out = BufWriter::new(file.map_err(|e| self.io_error(e))?);
        if needs_header {
            let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
            write_row(&mut out, &header).map_err(|e| self.io_error(e))?;
        }

        for article in &rows {
            write_row(&mut out, &record(article)?).map_err(|e| self.io_error(e))?;
        }
        out.flush().map_err(|e| self.io_error(e))?;

        // A second write in the same run must not wipe the first one
        if self.mode == WriteMode::Overwrite {
            self.mode = WriteMode::Append;
        }

        debug!(path = %self.path.display(), rows = rows.len(), "wrote CSV rows");
        Ok(rows.len())
    }

    fn describe(&self) -> String {
        format!("CSV {}", self.path.display())
    }
}

fn record(article: &Article) -> Result<Vec<String>, SinkError> {
    Ok(vec![
        article.title.clone(),
        article.url.clone(),
        article.summary.clone(),
        serde_json::to_string(&article.links)?,
        article.categories.join("|"),
        article.image_url.clone().unwrap_or_default(),
        article.date_scraped(),
    ])
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Minimal CSV reader (quotes + CRLF tolerant).
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without a final newline
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
