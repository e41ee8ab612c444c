//! Markdown for the property usage reports.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use super::{by_count, PropertyTally};

/// File name of the overall summary.
pub const SUMMARY_FILE: &str = "summary.md";

/// File name of the color table.
pub const COLORS_FILE: &str = "used-colors.md";

/// Shared header data for every report page.
#[derive(Debug, Clone, Copy)]
pub struct ReportHeader<'a> {
    /// Scanned root as shown to the reader.
    pub scanned: &'a str,
    /// Clock reading taken once per run.
    pub generated: DateTime<Utc>,
}

impl ReportHeader<'_> {
    fn write(&self, out: &mut String, title: &str) {
        let _ = write!(out, "# {title}\n\n");
        let _ = writeln!(out, "- Generated on: **{}**", self.generated.format("%Y-%m-%d %H:%M:%S"));
        let _ = write!(out, "- Scanned path: `{}`\n\n", self.scanned);
    }
}

fn table(out: &mut String, column: &str, rows: &[(&str, usize)]) {
    let _ = writeln!(out, "| {column} | Count |");
    let _ = writeln!(out, "|{}|-------|", "-".repeat(column.len() + 2));
    for (name, count) in rows {
        let _ = writeln!(out, "| `{name}` | {count} |");
    }
    out.push('\n');
}

/// Every report file as `(file name, contents)`, summary first.
#[must_use]
pub fn render_all(tally: &PropertyTally, header: ReportHeader<'_>) -> Vec<(String, String)> {
    let mut files = vec![(SUMMARY_FILE.to_string(), render_summary(tally, header))];
    for family in tally.values.keys() {
        files.push((format!("{family}-details.md"), render_family_details(tally, family, header)));
    }
    files.push((COLORS_FILE.to_string(), render_used_colors(tally, header)));
    files
}

/// Global counts followed by one table per family, largest family first.
#[must_use]
pub fn render_summary(tally: &PropertyTally, header: ReportHeader<'_>) -> String {
    let mut out = String::new();
    header.write(&mut out, "CSS / SCSS Property Usage Summary");
    let _ = write!(out, "Total distinct properties: **{}**\n\n", tally.properties.len());

    out.push_str("## Global property usage\n\n");
    table(&mut out, "Property", &by_count(&tally.properties));

    out.push_str("## By family\n\n");
    let mut families: Vec<(&str, usize)> =
        tally.families.iter().map(|(name, props)| (name.as_str(), props.values().sum())).collect();
    families.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    for (family, total) in families {
        let _ = writeln!(out, "### {family}");
        let _ = write!(out, "Total declarations: **{total}**\n\n");
        if let Some(props) = tally.families.get(family) {
            table(&mut out, "Property", &by_count(props));
        }
    }
    out
}

/// Value counts for each property of `family`.
#[must_use]
pub fn render_family_details(tally: &PropertyTally, family: &str, header: ReportHeader<'_>) -> String {
    let mut out = String::new();
    header.write(&mut out, &format!("{} family details", capitalize(family)));
    let Some(props) = tally.values.get(family) else {
        return out;
    };
    let mut ordered: Vec<(&str, usize)> =
        props.iter().map(|(name, values)| (name.as_str(), values.values().sum())).collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    for (property, total) in ordered {
        let _ = writeln!(out, "## `{property}`");
        let _ = write!(out, "Total declarations: **{total}**\n\n");
        if let Some(values) = props.get(property) {
            table(&mut out, "Value", &by_count(values));
        }
    }
    out
}

/// Distinct colors with their counts.
#[must_use]
pub fn render_used_colors(tally: &PropertyTally, header: ReportHeader<'_>) -> String {
    let mut out = String::new();
    header.write(&mut out, "Used Colors");
    let _ = write!(out, "Total distinct colors: **{}**\n\n", tally.colors.len());
    table(&mut out, "Color", &by_count(&tally.colors));
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
