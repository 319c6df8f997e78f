//! Line tokenizer for the catalog CSV import format.
//!
//! Splits one line of text into fields on unquoted commas. A double quote
//! anywhere in the line toggles the quoting state, so a quoted field may
//! contain commas. There is no RFC-4180 `""` escaping. Each flushed field is
//! trimmed and loses one surrounding quote pair if both ends carry one.

/// Split a single CSV line into fields.
///
/// A line with N unquoted commas always yields N + 1 fields, empty ones
/// included.
pub fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                field.push(c);
            }
            ',' if !in_quotes => {
                fields.push(strip_quotes(&field));
                field.clear();
            }
            _ => field.push(c),
        }
    }

    fields.push(strip_quotes(&field));
    fields
}

/// Trim the token, then remove one surrounding quote pair if present.
/// The content inside the quotes is not re-trimmed.
fn strip_quotes(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}
