// src/sink/mod.rs
// =============================================================================
// Where collected articles end up.
//
// Submodules:
// - csv:    one CSV file (always written)
// - sqlite: an `articles` table (written with --db)
//
// Both implement ArticleSink, so main just loops over whatever sinks the
// configuration asked for.
// =============================================================================

mod csv;
mod sqlite;

use crate::article::Article;
use crate::config::OutputConfig;
use crate::error::SinkError;

pub use csv::{CsvSink, HEADERS};
pub use sqlite::SqliteSink;

pub trait ArticleSink {
    /// Stores the articles and returns how many rows were actually written
    fn write(&mut self, articles: &[Article]) -> Result<usize, SinkError>;

    /// Human-readable destination, for logs and the summary
    fn describe(&self) -> String;
}

pub fn open_sinks(output: &OutputConfig) -> Result<Vec<Box<dyn ArticleSink>>, SinkError> {
    let mut sinks: Vec<Box<dyn ArticleSink>> =
        vec![Box::new(CsvSink::new(&output.csv_path, output.write_mode))];

    if let Some(path) = &output.sqlite_path {
        sinks.push(Box::new(SqliteSink::open(path, output.write_mode)?));
    }

    Ok(sinks)
}
