//! Tabular output shared by the list commands
//!
//! Each list command builds a header row plus data rows, then renders
//! them as a markdown table, CSV, or JSON depending on `--format`.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::args::OutputFormat;

/// Render rows in the requested format.
///
/// `records` carries the same data as `rows` but as serializable values,
/// so JSON output keeps field names instead of positional cells.
pub fn print_rows<T: Serialize>(
    format: OutputFormat,
    header: &[&str],
    rows: &[Vec<String>],
    records: &[T],
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", render_table(header, rows));
            Ok(())
        }
        OutputFormat::Csv => print_csv(header, rows),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(records).into_diagnostic()?;
            println!("{}", json);
            Ok(())
        }
    }
}

pub fn render_table(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());
    for row in rows {
        builder.push_record(row.iter().map(String::as_str));
    }
    builder.build().with(Style::markdown()).to_string()
}

fn print_csv(header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(header).into_diagnostic()?;
    for row in rows {
        writer.write_record(row).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_table_produces_markdown() {
        let rows = vec![vec!["1".to_string(), "shirt".to_string()]];
        let out = render_table(&["ID", "Name"], &rows);
        assert!(out.contains("| ID | Name |"));
        assert!(out.contains("| 1 | shirt |"));
    }

    #[test]
    fn render_table_handles_empty_rows() {
        let out = render_table(&["ID"], &[]);
        assert!(out.contains("ID"));
    }
}
