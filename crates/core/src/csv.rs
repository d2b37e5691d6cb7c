//! Minimal RFC 4180 CSV writer used by report exports.

use std::borrow::Cow;

/// Quote a field when it contains a delimiter, quote, or line break.
/// Embedded quotes are doubled.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Accumulates CSV rows into an in-memory string.
#[derive(Debug)]
pub struct CsvWriter {
    buf: String,
    columns: usize,
}

impl CsvWriter {
    /// Start a document with the given header row.
    pub fn with_header(header: &[&str]) -> Self {
        let mut writer = Self {
            buf: String::new(),
            columns: header.len(),
        };
        writer.push_line(header.iter().copied());
        writer
    }

    /// Append one record. Missing trailing fields are left empty and extra
    /// fields are dropped so every row has the header's width.
    pub fn push_record<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut row: Vec<String> = fields
            .into_iter()
            .take(self.columns)
            .map(|f| f.as_ref().to_string())
            .collect();
        row.resize(self.columns, String::new());
        self.push_line(row.iter().map(String::as_str));
    }

    fn push_line<'a>(&mut self, fields: impl Iterator<Item = &'a str>) {
        let mut first = true;
        for field in fields {
            if !first {
                self.buf.push(',');
            }
            first = false;
            self.buf.push_str(&escape_field(field));
        }
        self.buf.push_str("\r\n");
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

/// Render an optional value as a CSV field (`None` becomes empty).
pub fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}
