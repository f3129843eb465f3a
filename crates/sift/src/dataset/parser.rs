//! Comma-separated text parser with quote-aware field splitting.

use crate::error::{Result, SiftError};

use super::row::{Row, Value};

/// Parse raw comma-separated text into headers and typed rows.
///
/// The format is line-oriented: a double quote toggles "inside quoted
/// field" mode, a comma inside quotes is literal, and a doubled quote is
/// simply two toggles (no unescaping). Blank lines are dropped before
/// parsing. The first remaining line is the header row.
///
/// Zero non-blank lines is a hard error, as is a duplicated header name;
/// headers with zero data rows is valid and yields an empty row set.
pub fn parse_delimited(text: &str) -> Result<(Vec<String>, Vec<Row>)> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let header_line = lines.next().ok_or_else(|| {
        SiftError::MalformedInput("no non-blank lines to derive headers from".to_string())
    })?;

    let headers: Vec<String> = split_fields(header_line)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    // Duplicate names would silently collapse into one record key while
    // still profiling as two columns.
    let mut seen = std::collections::HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(SiftError::MalformedInput(format!(
                "duplicate header '{}'",
                header
            )));
        }
    }

    let mut rows = Vec::new();
    for line in lines {
        let fields = split_fields(line);
        let mut row = Row::new();
        // Zipping drops surplus fields; short lines leave trailing headers
        // absent, keeping every record's key set a subset of the headers.
        for (header, field) in headers.iter().zip(fields) {
            row.insert(header.clone(), Value::parse_field(&field));
        }
        rows.push(row);
    }

    Ok((headers, rows))
}

/// Split one line into fields, toggling quote state per `"` character.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);

    fields
}
