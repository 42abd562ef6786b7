// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Helpers for cleaning and merging product-catalog translation exports.
//!
//! A translation export is a delimited UTF-8 text file with eight fixed
//! columns per record: `Type`, `Identification`, `Field`, `Locale`,
//! `Market`, `Status`, `Default content` and `Translated content`. Cells
//! are separated by `;` and optionally quoted with `"`; a quoted cell may
//! contain the separator, doubled quotes (`""`) and raw newlines, so one
//! record can span several physical lines.
//!
//! The functions here reconstruct logical rows from such a file, split
//! them into fields, and serialize fields back with consistent escaping.
//! The [`fragment`], [`lookup`], [`merge`] and [`report`] modules build
//! the file-level transforms on top of this core.

pub mod fragment;
pub mod lookup;
pub mod merge;
pub mod report;

use thiserror::Error;

/// Default field separator for export files.
pub const DEFAULT_SEPARATOR: char = ';';

/// Marker used in place of raw newlines when a cell is serialized.
pub const LINE_BREAK: &str = "<br>";

/// Column names of a well-formed export row, in order.
pub const COLUMNS: [&str; 8] = [
    "Type",
    "Identification",
    "Field",
    "Locale",
    "Market",
    "Status",
    "Default content",
    "Translated content",
];

/// Number of fields in a well-formed export row.
pub const COLUMN_COUNT: usize = COLUMNS.len();

/// Index of the `Identification` column.
pub const IDENTIFICATION: usize = 1;
/// Index of the `Field` column.
pub const FIELD: usize = 2;
/// Index of the `Default content` column.
pub const DEFAULT_CONTENT: usize = 6;
/// Index of the `Translated content` column.
pub const TRANSLATED_CONTENT: usize = 7;

/// Errors encountered while reconstructing logical rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowError {
    /// A quoted field was still open when the input ended. The file is
    /// misquoted from the given physical line onward and the remainder
    /// cannot be split into rows reliably.
    #[error("unterminated quoted field in row starting on line {line}")]
    UnterminatedQuote {
        /// 1-based physical line where the unterminated row started.
        line: usize,
    },
}

/// Reconstruct logical rows from `text`.
///
/// A logical row covers one or more physical lines: while a `"`-quoted
/// cell is open, subsequent physical lines are joined with `\n` until
/// quote parity returns to even. Quote parity is the only row-boundary
/// strategy used; no knowledge of the row contents is required.
///
/// The returned iterator makes a single forward pass over `text`. The
/// final item is a [`RowError::UnterminatedQuote`] if a quoted cell is
/// still open at end of input.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::logical_rows;
///
/// let rows = logical_rows("a;\"multi\nline\";b\nc;d;e")
///     .collect::<Result<Vec<_>, _>>()
///     .unwrap();
/// assert_eq!(rows, vec!["a;\"multi\nline\";b", "c;d;e"]);
/// ```
pub fn logical_rows(text: &str) -> LogicalRows<'_> {
    LogicalRows {
        lines: text.lines().enumerate(),
        failed: false,
    }
}

/// Iterator over the logical rows of an export file.
///
/// Created by [`logical_rows`].
#[derive(Debug)]
pub struct LogicalRows<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    failed: bool,
}

impl Iterator for LogicalRows<'_> {
    type Item = Result<String, RowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let mut row = String::new();
        let mut started_on = None;
        let mut in_quotes = false;
        for (idx, line) in self.lines.by_ref() {
            if started_on.is_none() {
                started_on = Some(idx + 1);
            } else {
                row.push('\n');
            }
            row.push_str(line);
            if line.matches('"').count() % 2 == 1 {
                in_quotes = !in_quotes;
            }
            if !in_quotes {
                return Some(Ok(row));
            }
        }

        // The lines are exhausted. If a row was accumulated, its quote
        // never closed.
        started_on.map(|line| {
            self.failed = true;
            Err(RowError::UnterminatedQuote { line })
        })
    }
}

/// Split a logical row into its fields.
///
/// The row is split on `separator` outside quoted spans. Surrounding
/// quotes are stripped from quoted cells, and a doubled quote (`""`)
/// inside a quoted span yields a single literal `"`. This makes the
/// splitter the exact inverse of [`escape_field`], so repeated
/// round-trips cannot corrupt cell contents.
///
/// A malformed row simply yields however many fields it has; callers
/// working with export rows must check for [`COLUMN_COUNT`] fields
/// before indexing.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::split_fields;
///
/// assert_eq!(
///     split_fields("PRODUCT;'1234;\"a;b\";\"say \"\"hi\"\"\"", ';'),
///     vec!["PRODUCT", "'1234", "a;b", "say \"hi\""],
/// );
/// ```
pub fn split_fields(row: &str, separator: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = row.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes && chars.peek() == Some(&'"') {
                chars.next();
                field.push('"');
            } else {
                in_quotes = !in_quotes;
            }
        } else if c == separator && !in_quotes {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);

    fields
}

/// Serialize a field value as a quoted, separator-safe cell.
///
/// Literal quotes are doubled, raw newlines are replaced by the visible
/// [`LINE_BREAK`] marker, and the whole value is wrapped in quotes. The
/// newline replacement is a one-way normalization: line breaks inside a
/// cell are represented as literal `<br>` markers once serialized, per
/// the export convention.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::escape_field;
///
/// assert_eq!(
///     escape_field("He said \"hi\"\nbye"),
///     "\"He said \"\"hi\"\"<br>bye\"",
/// );
/// ```
pub fn escape_field(value: &str) -> String {
    let mut cell = String::with_capacity(value.len() + 2);
    cell.push('"');
    for c in value.chars() {
        match c {
            '"' => cell.push_str("\"\""),
            '\n' => cell.push_str(LINE_BREAK),
            _ => cell.push(c),
        }
    }
    cell.push('"');
    cell
}

/// Serialize a row of fields with [`escape_field`] applied to each cell.
///
/// For fields free of raw newlines, `split_fields(&serialize_row(fields,
/// sep), sep)` gives back `fields` unchanged.
pub fn serialize_row<S: AsRef<str>>(fields: &[S], separator: char) -> String {
    let mut row = String::new();
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            row.push(separator);
        }
        row.push_str(&escape_field(field.as_ref()));
    }
    row
}
