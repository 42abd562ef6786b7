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

//! Non-fatal diagnostics over a translation export.
//!
//! The scan observes and counts; it never mutates the file and never
//! fails on a malformed row. Only an unterminated quote is an error,
//! since rows cannot be counted past that point.

use std::collections::HashSet;

use serde::Serialize;

use crate::fragment::{is_balanced, split_at_marker};
use crate::lookup::product_key;
use crate::{logical_rows, split_fields, COLUMN_COUNT, DEFAULT_CONTENT, FIELD, TRANSLATED_CONTENT};

/// Counts of notable row shapes in one export file.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ExportReport {
    /// Logical rows in the file, header included.
    pub row_count: u32,
    /// Rows with fewer than [`COLUMN_COUNT`] fields.
    pub short_rows: u32,
    /// Rows carrying a size-table fragment in a content cell.
    pub fragment_rows: u32,
    /// Fragment rows whose `<div>` tags do not balance.
    pub unbalanced_fragments: u32,
    /// Rows whose (`Field`, product key) pair was already seen earlier
    /// in the file. A product legitimately has one row per field name;
    /// a second `title` row for the same key is the duplicate that a
    /// last-wins lookup map would silently overwrite.
    pub duplicate_keys: u32,
}

/// Scan `text` and count notable row shapes.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::fragment::SIZE_TABLE_MARKER;
/// use catalog_i18n_helpers::report::scan;
///
/// let report = scan("PRODUCT;'1;body_html;fi;;ok;;\"x\"\nshort;row\n", ';', SIZE_TABLE_MARKER)
///     .unwrap();
/// assert_eq!(report.row_count, 2);
/// assert_eq!(report.short_rows, 1);
/// ```
pub fn scan(text: &str, separator: char, marker: &str) -> anyhow::Result<ExportReport> {
    let mut report = ExportReport::default();
    let mut seen_keys = HashSet::new();

    for row in logical_rows(text) {
        let fields = split_fields(&row?, separator);
        report.row_count += 1;
        if fields.len() < COLUMN_COUNT {
            report.short_rows += 1;
            continue;
        }

        let mut has_fragment = false;
        for column in [DEFAULT_CONTENT, TRANSLATED_CONTENT] {
            if let Some((_, fragment)) = split_at_marker(&fields[column], marker) {
                has_fragment = true;
                if !is_balanced(fragment) {
                    report.unbalanced_fragments += 1;
                }
            }
        }
        if has_fragment {
            report.fragment_rows += 1;
        }

        if let Some(key) = product_key(&fields) {
            if !seen_keys.insert((fields[FIELD].clone(), key.to_string())) {
                report.duplicate_keys += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::SIZE_TABLE_MARKER;
    use pretty_assertions::assert_eq;

    #[track_caller]
    fn assert_scan(text: &str, expected: ExportReport) {
        assert_eq!(scan(text, ';', SIZE_TABLE_MARKER).unwrap(), expected);
    }

    #[test]
    fn scan_empty_file() {
        assert_scan("", ExportReport::default());
    }

    #[test]
    fn scan_counts_short_rows() {
        assert_scan(
            "PRODUCT;'1;title;fi;;ok;\"a\";\"b\"\nstray note\n",
            ExportReport {
                row_count: 2,
                short_rows: 1,
                ..ExportReport::default()
            },
        );
    }

    #[test]
    fn scan_flags_unbalanced_fragment() {
        assert_scan(
            "PRODUCT;'1;body_html;fi;;ok;;\"d<div class=\"\"size-table\"\">open\"\n\
             PRODUCT;'2;body_html;fi;;ok;;\"d<div class=\"\"size-table\"\">x</div>\"\n",
            ExportReport {
                row_count: 2,
                fragment_rows: 2,
                unbalanced_fragments: 1,
                ..ExportReport::default()
            },
        );
    }

    #[test]
    fn scan_counts_duplicate_keys() {
        // Same key for different fields is fine; a repeated
        // (field, key) pair is the duplicate.
        assert_scan(
            "PRODUCT;'1;title;fi;;ok;\"a\";\"b\"\n\
             PRODUCT;'1;body_html;fi;;ok;\"a\";\"c\"\n\
             PRODUCT;'1;title;fi;;ok;\"a\";\"d\"\n",
            ExportReport {
                row_count: 3,
                duplicate_keys: 1,
                ..ExportReport::default()
            },
        );
    }

    #[test]
    fn scan_serializes_to_json() {
        let report = ExportReport {
            row_count: 1,
            ..ExportReport::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"row_count\":1"), "{json}");
    }
}
