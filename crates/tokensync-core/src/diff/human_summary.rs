//! Human-readable renderers for comparison results.

use crate::diff::aggregate::{get_change_counts, has_changes};
use crate::diff::model::{ChangeCategory, ComparisonResult};

/// Render a compact console summary: one line per non-empty category,
/// followed by breaking and total counts.
pub fn render_console_summary(result: &ComparisonResult) -> String {
    let mut out = String::new();

    if !has_changes(result) {
        out.push_str("No changes detected.\n");
        return out;
    }

    for category in ChangeCategory::ALL {
        let n = result.count(category);
        if n == 0 {
            continue;
        }
        let marker = if category.is_breaking() { "!" } else { " " };
        out.push_str(&format!("{} {:<20} {}\n", marker, category.label(), n));
    }

    let counts = get_change_counts(result);
    out.push_str(&format!("Breaking changes: {}\n", counts.breaking));
    out.push_str(&format!("Total changes: {}\n", counts.total));
    out
}

/// Render a Markdown report with a counts table and one section per
/// non-empty category.
pub fn render_markdown_report(result: &ComparisonResult) -> String {
    let mut out = String::new();
    let counts = get_change_counts(result);

    out.push_str("## Token Changes\n\n");
    out.push_str(&format!(
        "**Breaking**: {}  \n**Total**: {}\n\n",
        counts.breaking, counts.total
    ));

    if !has_changes(result) {
        out.push_str("_No changes detected._\n");
        return out;
    }

    out.push_str("| Category | Count | Breaking |\n|---|---|---|\n");
    for category in ChangeCategory::ALL {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            category.label(),
            result.count(category),
            if category.is_breaking() { "yes" } else { "no" }
        ));
    }
    out.push('\n');

    if !result.collection_renames.is_empty() {
        out.push_str("### Collection renames\n\n");
        for r in &result.collection_renames {
            out.push_str(&format!("- `{}` → `{}`\n", r.old_name, r.new_name));
        }
        out.push('\n');
    }

    if !result.mode_renames.is_empty() {
        out.push_str("### Mode renames\n\n");
        for r in &result.mode_renames {
            out.push_str(&format!(
                "- `{}`: `{}` → `{}`\n",
                r.collection, r.old_mode, r.new_mode
            ));
        }
        out.push('\n');
    }

    if !result.new_modes.is_empty() {
        out.push_str("### New modes\n\n");
        for m in &result.new_modes {
            out.push_str(&format!("- `{}.{}`\n", m.collection, m.mode));
        }
        out.push('\n');
    }

    if !result.deleted_modes.is_empty() {
        out.push_str("### Deleted modes\n\n");
        for m in &result.deleted_modes {
            out.push_str(&format!("- `{}.{}`\n", m.collection, m.mode));
        }
        out.push('\n');
    }

    if !result.path_changes.is_empty() {
        out.push_str("### Path changes\n\n");
        for c in &result.path_changes {
            out.push_str(&format!(
                "- `{}` → `{}` ({}.{})\n",
                c.old_path, c.new_path, c.collection, c.mode
            ));
        }
        out.push('\n');
    }

    if !result.value_changes.is_empty() {
        out.push_str("### Value changes\n\n");
        out.push_str("| Path | Collection | Mode | Old | New |\n|---|---|---|---|---|\n");
        for c in &result.value_changes {
            out.push_str(&format!(
                "| `{}` | {} | {} | `{}` | `{}` |\n",
                c.path, c.collection, c.mode, c.old_value, c.new_value
            ));
        }
        out.push('\n');
    }

    if !result.new_variables.is_empty() {
        out.push_str("### New variables\n\n");
        for v in &result.new_variables {
            out.push_str(&format!(
                "- `{}` ({}.{}) = `{}`\n",
                v.path, v.collection, v.mode, v.value
            ));
        }
        out.push('\n');
    }

    if !result.deleted_variables.is_empty() {
        out.push_str("### Deleted variables\n\n");
        for v in &result.deleted_variables {
            out.push_str(&format!("- `{}` ({}.{})\n", v.path, v.collection, v.mode));
        }
        out.push('\n');
    }

    out
}
