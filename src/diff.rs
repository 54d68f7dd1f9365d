use console::style;
use similar::{DiffTag, TextDiff};

const CONTEXT_LINES: usize = 2;

fn line_label(number: usize) -> String {
    format!("{:>4}", number + 1)
}

/// Renders a colored, line-numbered diff between two versions of a file.
///
/// Removed lines carry their old line number, added and context lines their
/// new one. A single line replaced by a line that only differs in whitespace
/// is shown as context.
pub fn render_diff(old: &str, new: &str) -> String {
    if old == new {
        return "No changes detected.".to_string();
    }

    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let diff = TextDiff::from_slices(&old_lines, &new_lines);

    let mut diff_lines = Vec::new();

    for (hunk_idx, group) in diff.grouped_ops(CONTEXT_LINES).iter().enumerate() {
        if hunk_idx > 0 {
            diff_lines.push("...".to_string());
        }

        for op in group {
            let (tag, old_range, new_range) = (op.tag(), op.old_range(), op.new_range());
            match tag {
                DiffTag::Replace => {
                    if old_range.len() == 1 && new_range.len() == 1 {
                        let old_normalized: String =
                            old_lines[old_range.start].split_whitespace().collect();
                        let new_normalized: String =
                            new_lines[new_range.start].split_whitespace().collect();

                        if old_normalized == new_normalized {
                            let n = new_range.start;
                            diff_lines.push(format!("  {}: {}", line_label(n), new_lines[n]));
                            continue;
                        }
                    }

                    for i in old_range {
                        diff_lines.push(
                            style(format!("- {}: {}", line_label(i), old_lines[i]))
                                .red()
                                .to_string(),
                        );
                    }
                    for i in new_range {
                        diff_lines.push(
                            style(format!("+ {}: {}", line_label(i), new_lines[i]))
                                .green()
                                .to_string(),
                        );
                    }
                }
                DiffTag::Delete => {
                    for i in old_range {
                        diff_lines.push(
                            style(format!("- {}: {}", line_label(i), old_lines[i]))
                                .red()
                                .to_string(),
                        );
                    }
                }
                DiffTag::Insert => {
                    for i in new_range {
                        diff_lines.push(
                            style(format!("+ {}: {}", line_label(i), new_lines[i]))
                                .green()
                                .to_string(),
                        );
                    }
                }
                DiffTag::Equal => {
                    for i in new_range {
                        diff_lines.push(format!("  {}: {}", line_label(i), new_lines[i]));
                    }
                }
            }
        }
    }
    diff_lines.join("\n")
}
