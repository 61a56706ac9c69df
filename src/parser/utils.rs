//! Escaping helpers for writing labels and annotation values back into
//! Newick and Nexus text.

/// Characters that force a label into single quotes.
const SPECIAL_LABEL_CHARS: &[char] = &[
    ' ', ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\'', '=',
];

/// Escapes a label for Newick/Nexus output.
///
/// Labels without special characters are returned unchanged. Otherwise the
/// label is wrapped in single quotes and inner single quotes are doubled.
///
/// # Examples
/// ```
/// # use phylotrunk::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// assert_eq!(escape_label(""), "");
/// ```
pub fn escape_label(label: &str) -> String {
    if label.contains(SPECIAL_LABEL_CHARS) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

/// Escapes a string annotation value for a `[&key=value]` block.
///
/// Values made of alphanumerics, `_`, `.`, `-` and `+` are written bare;
/// anything else is wrapped in double quotes with inner quotes doubled.
///
/// # Examples
/// ```
/// # use phylotrunk::parser::utils::escape_annotation_value;
/// assert_eq!(escape_annotation_value("UK"), "UK");
/// assert_eq!(escape_annotation_value("New Zealand"), "\"New Zealand\"");
/// assert_eq!(escape_annotation_value("{a,b}"), "\"{a,b}\"");
/// ```
pub fn escape_annotation_value(value: &str) -> String {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | '+'));
    if bare {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('"', "\"\""))
    }
}
