//! Table formatting for CLI output.

use comfy_table::{ContentArrangement, Table, presets};

/// Coverage of one locale against the source file.
pub struct LocaleCoverage {
    pub locale: String,
    /// Number of source messages present in the locale.
    pub translated: usize,
    /// Source message ids absent from the locale, sorted.
    pub missing: Vec<String>,
}

/// Format coverage data as a table.
pub fn format_coverage_table(source_count: usize, coverage: &[LocaleCoverage]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_BORDERS_ONLY);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Locale", "Coverage", "Missing"]);

    for entry in coverage {
        table.add_row(vec![
            entry.locale.clone(),
            format!("{}/{source_count}", entry.translated),
            entry.missing.len().to_string(),
        ]);
    }

    table
}
