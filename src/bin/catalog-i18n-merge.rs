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

//! Merge translated content from a secondary export into a primary one.
//!
//! The secondary file is scanned once into a frozen product-key map;
//! the primary file is then rewritten against that map. Rows are
//! correlated by product key: the numeric `Identification` value with
//! its spreadsheet apostrophe stripped, or the leading digits of a
//! product handle. By default only `body_html` rows are merged; pass a
//! field name as the fourth argument to merge a different field.

use anyhow::{bail, Context};
use catalog_i18n_helpers::merge::merge_translations;
use catalog_i18n_helpers::DEFAULT_SEPARATOR;

fn main() -> anyhow::Result<()> {
    let args = std::env::args().collect::<Vec<_>>();
    let (primary, secondary, output, field_name) = match args.as_slice() {
        [_, primary, secondary, output] => (primary, secondary, output, "body_html"),
        [_, primary, secondary, output, field_name] => {
            (primary, secondary, output, field_name.as_str())
        }
        [prog_name, ..] => {
            bail!("Usage: {prog_name} <primary.csv> <secondary.csv> <output.csv> [field]")
        }
        [] => unreachable!(),
    };

    let primary_text = std::fs::read_to_string(primary)
        .with_context(|| format!("Could not read {}", &primary))?;
    let secondary_text = std::fs::read_to_string(secondary)
        .with_context(|| format!("Could not read {}", &secondary))?;

    let merged = merge_translations(&primary_text, &secondary_text, DEFAULT_SEPARATOR, field_name)?;
    std::fs::write(output, merged)
        .with_context(|| format!("Could not write {}", &output))?;

    Ok(())
}
