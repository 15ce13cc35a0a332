//! CSV loader: one `header: value` block per data row

use sofia_application::LoadError;
use sofia_domain::{Document, SourceKind};
use std::path::Path;

/// Key for values past the last header
const EXTRA_FIELDS_KEY: &str = "None";

pub async fn load_csv(path: &Path) -> Result<Document, LoadError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| LoadError::io(path, e))?;
    let rows = csv_rows(&bytes)?;
    Ok(Document::from_parts(SourceKind::Csv, rows))
}

/// Render each data row as `header: value` lines
pub fn csv_rows(data: &[u8]) -> Result<Vec<String>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);
    let headers = reader
        .headers()
        .map_err(|e| LoadError::parse(SourceKind::Csv, e))?
        .clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::parse(SourceKind::Csv, e))?;
        let mut lines: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, header)| format!("{}: {}", header.trim(), record.get(i).unwrap_or("").trim()))
            .collect();
        if record.len() > headers.len() {
            let extra: Vec<&str> = record.iter().skip(headers.len()).map(str::trim).collect();
            lines.push(format!("{}: {}", EXTRA_FIELDS_KEY, extra.join(",")));
        }
        rows.push(lines.join("\n"));
    }
    Ok(rows)
}
