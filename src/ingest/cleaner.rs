use std::sync::LazyLock;

use regex::Regex;

/// Spaces immediately before a period.
static SPACE_BEFORE_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +\.").expect("static regex"));

/// Normalize text extracted from a PDF fragment.
///
/// Removes every newline (layout artifacts, not semantic breaks) and then collapses
/// spaces in front of a period, so `"Hello \n.World"` becomes `"Hello.World"`.
/// Newlines go first so that a space and a period separated only by a line break
/// are joined before the period rule runs.
#[must_use]
pub fn clean(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return String::new();
    }
    let joined = raw_text.replace('\n', "");
    SPACE_BEFORE_PERIOD.replace_all(&joined, ".").into_owned()
}

/// Clean every fragment and join them into one document text, one fragment per line.
#[must_use]
pub fn clean_and_join<'a>(fragments: impl IntoIterator<Item = &'a str>) -> String {
    fragments
        .into_iter()
        .map(clean)
        .collect::<Vec<_>>()
        .join("\n")
}
