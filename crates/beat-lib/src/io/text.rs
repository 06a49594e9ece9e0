use super::LoadError;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use std::path::Path;

/// Parse delimited sample text: one value per line, comma separated values, or any
/// mix of commas, tabs, spaces and line breaks. Every token must be a number.
pub fn parse_f32_series(text: &str) -> Result<Vec<f32>, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        for field in record.iter() {
            for token in field.split_whitespace() {
                let value = token.parse::<f32>().map_err(|_| LoadError::CsvParseFailed {
                    token: token.to_string(),
                    position: out.len() + 1,
                })?;
                out.push(value);
            }
        }
    }
    if out.is_empty() {
        return Err(LoadError::EmptyData);
    }
    Ok(out)
}

/// Parse newline-delimited sample indices, ignoring blank/comment lines.
pub fn parse_event_indices(text: &str) -> Result<Vec<usize>> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let val: usize = trimmed
            .parse()
            .with_context(|| format!("line {} is not a sample index: {}", idx + 1, trimmed))?;
        out.push(val);
    }
    Ok(out)
}

/// Read peak indices from a file.
pub fn read_event_indices(path: &Path) -> Result<Vec<usize>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_event_indices(&text)
}
