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

//! Locate and re-embed HTML size-table fragments inside a content cell.
//!
//! A product-description cell can carry a "size table" HTML snippet after
//! the description text. Lossy line-splitting in upstream tooling leaves
//! the fragment separated from the description by a ragged run of `<br>`
//! markers; [`reembed`] stitches the two halves back together with a
//! single uniform double break.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Opening tag of a size-table fragment in a content cell.
pub const SIZE_TABLE_MARKER: &str = "<div class=\"size-table\">";

/// Separator placed between a description and its fragment.
pub const DOUBLE_BREAK: &str = "<br><br>";

fn trailing_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:\s|<br\s*/?>)+$").expect("well-formed regex"))
}

/// Split `text` at the first occurrence of `marker`.
///
/// Everything before the marker is the description, everything from the
/// marker onward is the fragment. Returns `None` when the marker is
/// absent.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::fragment::{split_at_marker, SIZE_TABLE_MARKER};
///
/// let cell = "A<br>B<div class=\"size-table\">C</div>";
/// let (description, fragment) = split_at_marker(cell, SIZE_TABLE_MARKER).unwrap();
/// assert_eq!(description, "A<br>B");
/// assert_eq!(fragment, "<div class=\"size-table\">C</div>");
/// ```
pub fn split_at_marker<'a>(text: &'a str, marker: &str) -> Option<(&'a str, &'a str)> {
    let start = text.find(marker)?;
    Some((&text[..start], &text[start..]))
}

/// Strip trailing `<br>`-equivalent markers and whitespace from a
/// description.
///
/// `<br>`, `<br/>` and `<br />` all count as break markers.
pub fn trim_trailing_breaks(description: &str) -> &str {
    match trailing_breaks().find(description) {
        Some(m) => &description[..m.start()],
        None => description,
    }
}

/// Re-embed the fragment in `text` directly after its description.
///
/// The description's trailing break markers are trimmed and the two
/// halves are rejoined with [`DOUBLE_BREAK`]. Cells without the marker
/// are passed through unchanged, as are cells that are already in the
/// normalized shape, so the transform is idempotent. The fragment is
/// never validated or repaired; see [`is_balanced`] for the diagnostic.
///
/// # Examples
///
/// ```
/// use catalog_i18n_helpers::fragment::{reembed, SIZE_TABLE_MARKER};
///
/// assert_eq!(
///     reembed("A<br>B<div class=\"size-table\">C</div>", SIZE_TABLE_MARKER),
///     "A<br>B<br><br><div class=\"size-table\">C</div>",
/// );
/// assert_eq!(reembed("no fragment here", SIZE_TABLE_MARKER), "no fragment here");
/// ```
pub fn reembed<'a>(text: &'a str, marker: &str) -> Cow<'a, str> {
    match split_at_marker(text, marker) {
        Some((description, fragment)) => {
            let description = trim_trailing_breaks(description);
            Cow::Owned(format!("{description}{DOUBLE_BREAK}{fragment}"))
        }
        None => Cow::Borrowed(text),
    }
}

/// Check whether a fragment has as many `<div` openings as `</div>`
/// closings.
///
/// Purely a diagnostic: unbalanced fragments are reported, never
/// rejected or repaired.
pub fn is_balanced(fragment: &str) -> bool {
    fragment.matches("<div").count() == fragment.matches("</div>").count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn split_at_marker_absent() {
        assert_eq!(split_at_marker("plain description", SIZE_TABLE_MARKER), None);
    }

    #[test]
    fn split_at_marker_first_occurrence() {
        let cell = "desc<div class=\"size-table\">a</div><div class=\"size-table\">b</div>";
        let (description, fragment) = split_at_marker(cell, SIZE_TABLE_MARKER).unwrap();
        assert_eq!(description, "desc");
        assert_eq!(
            fragment,
            "<div class=\"size-table\">a</div><div class=\"size-table\">b</div>",
        );
    }

    #[test]
    fn trim_trailing_breaks_variants() {
        assert_eq!(trim_trailing_breaks("A<br>B<br><br/> <br />\n"), "A<br>B");
        assert_eq!(trim_trailing_breaks("A<br>B"), "A<br>B");
        assert_eq!(trim_trailing_breaks(""), "");
    }

    #[test]
    fn reembed_relocates_fragment() {
        assert_eq!(
            reembed("A<br>B<div class=\"size-table\">C</div>", SIZE_TABLE_MARKER),
            "A<br>B<br><br><div class=\"size-table\">C</div>",
        );
    }

    #[test]
    fn reembed_without_marker_is_passthrough() {
        let cell = "A<br>B";
        assert!(matches!(reembed(cell, SIZE_TABLE_MARKER), Cow::Borrowed(_)));
    }

    #[test]
    fn reembed_is_idempotent() {
        let once = reembed(
            "A<br>B<br><br><br><div class=\"size-table\">C</div>",
            SIZE_TABLE_MARKER,
        )
        .into_owned();
        let twice = reembed(&once, SIZE_TABLE_MARKER);
        assert_eq!(once, "A<br>B<br><br><div class=\"size-table\">C</div>");
        assert_eq!(twice, once);
    }

    #[test]
    fn balance_diagnostic() {
        assert!(is_balanced("<div class=\"size-table\"><div>x</div></div>"));
        assert!(!is_balanced("<div class=\"size-table\">x"));
    }
}
