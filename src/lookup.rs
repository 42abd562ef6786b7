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

//! Product keys and the key-to-value lookup map.
//!
//! A product key is the numeric identifier that correlates rows across
//! two independently exported files. It appears either as an
//! apostrophe-prefixed number in the `Identification` column (the
//! spreadsheet text-forcing convention) or as the leading digits of a
//! product handle such as `9913310-wool-socks`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::{split_fields, COLUMN_COUNT, FIELD, IDENTIFICATION};

fn leading_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+").expect("well-formed regex"))
}

/// Extract a product key from an `Identification` cell.
///
/// A leading apostrophe is stripped; the remainder must be all digits.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::lookup::key_from_identification;
///
/// assert_eq!(key_from_identification("'9913310"), Some("9913310"));
/// assert_eq!(key_from_identification("9913310"), Some("9913310"));
/// assert_eq!(key_from_identification("gid://shopify/Product/1"), None);
/// ```
pub fn key_from_identification(value: &str) -> Option<&str> {
    let digits = value.strip_prefix('\'').unwrap_or(value);
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

/// Extract a product key from a handle's leading run of digits.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::lookup::key_from_handle;
///
/// assert_eq!(key_from_handle("9913310-wool-socks"), Some("9913310"));
/// assert_eq!(key_from_handle("wool-socks"), None);
/// ```
pub fn key_from_handle(handle: &str) -> Option<&str> {
    leading_digits().find(handle).map(|m| m.as_str())
}

/// Extract the product key of a full export row.
///
/// Tries the `Identification` column first (apostrophe rule), then falls
/// back to the leading digits of whatever is in that column, covering
/// exports that put the handle there.
pub fn product_key(fields: &[String]) -> Option<&str> {
    let identification = fields.get(IDENTIFICATION)?;
    key_from_identification(identification).or_else(|| key_from_handle(identification))
}

/// Build a product-key lookup map from the rows of one export.
///
/// Only rows whose `Field` column equals `field_name` contribute; the
/// stored value is taken from `value_column`. Duplicate keys are not an
/// error: the last row scanned wins, matching the export convention
/// where a later correction row supersedes an earlier one. Short rows
/// are skipped.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::lookup::build_map;
/// use catalog_i18n_helpers::TRANSLATED_CONTENT;
///
/// let rows = [
///     "PRODUCT;'1;handle;fi;;ok;;\"first\"",
///     "PRODUCT;'1;handle;fi;;ok;;\"second\"",
/// ];
/// let map = build_map(rows, "handle", TRANSLATED_CONTENT, ';');
/// assert_eq!(map["1"], "second");
/// ```
pub fn build_map<I>(
    rows: I,
    field_name: &str,
    value_column: usize,
    separator: char,
) -> HashMap<String, String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut map = HashMap::new();
    for row in rows {
        let fields = split_fields(row.as_ref(), separator);
        if fields.len() < COLUMN_COUNT || fields[FIELD] != field_name {
            continue;
        }
        if let Some(key) = product_key(&fields) {
            map.insert(key.to_string(), fields[value_column].clone());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TRANSLATED_CONTENT;
    use pretty_assertions::assert_eq;

    #[test]
    fn identification_key_strips_apostrophe() {
        assert_eq!(key_from_identification("'123"), Some("123"));
        assert_eq!(key_from_identification("123"), Some("123"));
        assert_eq!(key_from_identification("'"), None);
        assert_eq!(key_from_identification(""), None);
        assert_eq!(key_from_identification("'12a"), None);
    }

    #[test]
    fn handle_key_takes_leading_digits() {
        assert_eq!(key_from_handle("9913310-wool-socks"), Some("9913310"));
        assert_eq!(key_from_handle("007-bond"), Some("007"));
        assert_eq!(key_from_handle("socks-9913310"), None);
    }

    #[test]
    fn row_key_falls_back_to_handle_digits() {
        let fields = split_fields("PRODUCT;9913310-wool-socks;title;fi;;;;", ';');
        assert_eq!(product_key(&fields), Some("9913310"));
    }

    #[test]
    fn build_map_last_wins_on_duplicates() {
        let rows = [
            "PRODUCT;'42;handle;fi;;ok;;\"first\"",
            "PRODUCT;'42;handle;fi;;ok;;\"second\"",
        ];
        let map = build_map(rows, "handle", TRANSLATED_CONTENT, ';');
        assert_eq!(map.len(), 1);
        assert_eq!(map["42"], "second");
    }

    #[test]
    fn build_map_skips_short_and_foreign_rows() {
        let rows = [
            "PRODUCT;'1;handle",
            "PRODUCT;'2;title;fi;;ok;;\"name\"",
            "PRODUCT;'3;handle;fi;;ok;;\"kept\"",
        ];
        let map = build_map(rows, "handle", TRANSLATED_CONTENT, ';');
        assert_eq!(map.len(), 1);
        assert_eq!(map["3"], "kept");
    }
}
