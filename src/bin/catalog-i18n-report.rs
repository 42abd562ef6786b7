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

//! Generate a JSON diagnostics report for one or more export files.
//!
//! The report counts short rows, size-table fragments with unbalanced
//! tags, and duplicate product keys per field. All findings are
//! observations; the exports are never modified and a malformed row is
//! never an error.

use std::collections::BTreeMap;
use std::fs::File;

use anyhow::{bail, Context};
use catalog_i18n_helpers::fragment::SIZE_TABLE_MARKER;
use catalog_i18n_helpers::report::scan;
use catalog_i18n_helpers::DEFAULT_SEPARATOR;

fn main() -> anyhow::Result<()> {
    let args = std::env::args().collect::<Vec<_>>();
    let [_, report_file, exports @ ..] = args.as_slice() else {
        bail!("Usage: {} <report.json> <export.csv>...", args[0]);
    };

    let mut reports = BTreeMap::new();
    for export in exports {
        let text = std::fs::read_to_string(export)
            .with_context(|| format!("Could not read {}", &export))?;
        let report = scan(&text, DEFAULT_SEPARATOR, SIZE_TABLE_MARKER)
            .with_context(|| format!("Could not scan {}", &export))?;
        println!("Scanned {} rows in {}", report.row_count, export);
        if report.unbalanced_fragments > 0 {
            eprintln!(
                "Warning: {} unbalanced size-table fragment(s) in {}",
                report.unbalanced_fragments, export
            );
        }
        reports.insert(export.clone(), report);
    }

    let file = File::create(report_file)
        .with_context(|| format!("Could not create {}", &report_file))?;
    serde_json::to_writer_pretty(file, &reports)?;

    Ok(())
}
