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

//! Whole-file transforms over a translation export.
//!
//! Both transforms read every logical row, rewrite the rows they
//! understand, and pass everything else through untouched. A row that
//! fails to match the expected shape never aborts the file; only an
//! unterminated quote does, since the remainder of the file cannot be
//! split into rows at that point.

use std::collections::HashMap;

use crate::fragment::reembed;
use crate::lookup::product_key;
use crate::{
    logical_rows, serialize_row, split_fields, COLUMN_COUNT, DEFAULT_CONTENT, FIELD,
    TRANSLATED_CONTENT,
};

/// Relocate size-table fragments in both content columns of every row.
///
/// Each well-formed row has [`reembed`] applied to its `Default content`
/// and `Translated content` cells and is re-serialized with consistent
/// escaping. Short rows are passed through as raw text. The transform is
/// idempotent: re-running it on its own output is a no-op.
pub fn relocate_fragments(text: &str, separator: char, marker: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(text.len());
    for row in logical_rows(text) {
        let row = row?;
        let mut fields = split_fields(&row, separator);
        if fields.len() < COLUMN_COUNT {
            out.push_str(&row);
        } else {
            for column in [DEFAULT_CONTENT, TRANSLATED_CONTENT] {
                fields[column] = reembed(&fields[column], marker).into_owned();
            }
            out.push_str(&serialize_row(&fields, separator));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Merge translated content from a secondary export into a primary one.
///
/// Two phases, so the secondary file is scanned exactly once:
///
/// 1. The secondary file is parsed into a frozen product-key map of
///    `Translated content` values for rows whose `Field` column equals
///    `field_name`.
/// 2. The primary file is rewritten against that map: a matching row
///    with a known key gets its `Translated content` cell replaced.
///
/// Empty translations in the secondary file are ignored, and rows
/// without a product key or with an unknown key keep their existing
/// content. Short rows are passed through as raw text.
pub fn merge_translations(
    primary: &str,
    secondary: &str,
    separator: char,
    field_name: &str,
) -> anyhow::Result<String> {
    let translations = translation_map(secondary, separator, field_name)?;

    let mut out = String::with_capacity(primary.len());
    for row in logical_rows(primary) {
        let row = row?;
        let mut fields = split_fields(&row, separator);
        if fields.len() < COLUMN_COUNT {
            out.push_str(&row);
        } else {
            if fields[FIELD] == field_name {
                let translated = product_key(&fields).and_then(|key| translations.get(key));
                if let Some(translated) = translated {
                    fields[TRANSLATED_CONTENT] = translated.clone();
                }
            }
            out.push_str(&serialize_row(&fields, separator));
        }
        out.push('\n');
    }
    Ok(out)
}

/// Build the frozen key-to-translation map for phase one of the merge.
fn translation_map(
    secondary: &str,
    separator: char,
    field_name: &str,
) -> anyhow::Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for row in logical_rows(secondary) {
        let fields = split_fields(&row?, separator);
        if fields.len() < COLUMN_COUNT || fields[FIELD] != field_name {
            continue;
        }
        if fields[TRANSLATED_CONTENT].is_empty() {
            continue;
        }
        if let Some(key) = product_key(&fields) {
            // Last row wins on duplicate keys.
            map.insert(key.to_string(), fields[TRANSLATED_CONTENT].clone());
        }
    }
    Ok(map)
}
