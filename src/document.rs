/// Splits a document into lines.
///
/// `\n` terminates a line and a `\r` directly before it is dropped with the
/// terminator. A final terminator does not open a new, empty line, so `"a\n"`
/// and `"a"` both yield `["a"]` while `"a\n\n"` yields `["a", ""]`. The empty
/// string has no lines at all.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Number of lines `split_lines` would produce, without allocating.
pub fn line_count(text: &str) -> usize {
    text.lines().count()
}
