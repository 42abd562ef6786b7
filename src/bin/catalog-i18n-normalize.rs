//! Normalize the content cells of a translation export.
//!
//! This program reconstructs the logical rows of an export file,
//! relocates any size-table fragment so it sits directly after the
//! description in both content columns, and rewrites the file with
//! consistent cell escaping.
//!
//! Re-running the program on its own output is a no-op, so a file can
//! be normalized again after every upstream edit without the fragments
//! drifting further.

use anyhow::{bail, Context};
use catalog_i18n_helpers::fragment::SIZE_TABLE_MARKER;
use catalog_i18n_helpers::merge::relocate_fragments;
use catalog_i18n_helpers::DEFAULT_SEPARATOR;

fn main() -> anyhow::Result<()> {
    let args = std::env::args().collect::<Vec<_>>();
    let [input, output] = match args.as_slice() {
        [_, input, output] => [input, output],
        [prog_name, ..] => bail!("Usage: {prog_name} <input.csv> <output.csv>"),
        [] => unreachable!(),
    };

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Could not read {}", &input))?;
    let normalized = relocate_fragments(&text, DEFAULT_SEPARATOR, SIZE_TABLE_MARKER)?;
    std::fs::write(output, normalized)
        .with_context(|| format!("Could not write {}", &output))?;

    Ok(())
}
