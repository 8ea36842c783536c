/// Canonical form for categorical labels: invisible characters removed,
/// whitespace trimmed and collapsed. Case is preserved.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{a0}'], " ");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`normalize_label`] but maps blank input to `None`.
pub(crate) fn optional_label(value: Option<&str>) -> Option<String> {
    value
        .map(normalize_label)
        .filter(|label| !label.is_empty())
}
