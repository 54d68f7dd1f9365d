//! Indentation analysis for located containers.

/// One level of indentation inside a container. The generated data files are
/// tab-indented.
pub const INDENT_UNIT: &str = "\t";

/// Returns the run of tabs and spaces immediately before the closing `}` of a
/// matched container, in its original order.
///
/// The scan stops at the first other character, usually the newline that
/// ends the last entry. A container that closes on the same line as its last
/// entry yields an empty depth string.
pub fn depth_string(full_span: &str) -> &str {
    let before_close = full_span.strip_suffix('}').unwrap_or(full_span);
    let content_end = before_close.trim_end_matches([' ', '\t']).len();
    &before_close[content_end..]
}

/// Prefixes every line of `entry` with `depth` plus one [`INDENT_UNIT`].
pub fn reindent(entry: &str, depth: &str) -> String {
    entry
        .split('\n')
        .map(|line| format!("{depth}{INDENT_UNIT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
