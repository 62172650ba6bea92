//! Terminal rendering for query results, table lists and import receipts.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use sheetwise_db::QueryResult;

use crate::importer::ImportReport;

/// Build a table with the shared styling.
fn styled_table<S: AsRef<str>>(headers: &[S], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h.as_ref()).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }
    table
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// Render the result of one statement.
///
/// Row sets print as a table plus a row count, other statements print the
/// number of affected rows.
pub fn render_result(result: &QueryResult) -> String {
    if !result.has_row_set() {
        return format!("{} row{} affected", result.changes, plural(result.changes));
    }

    let count = result.row_count();
    if count == 0 {
        return format!("(0 rows) columns: {}", result.columns.join(", "));
    }

    let rows = result
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();
    let table = styled_table(result.columns.as_slice(), rows);
    format!("{}\n({} row{})", table, count, plural(count))
}

/// Render the output of `tables`.
pub fn render_tables(tables: &[String]) -> String {
    if tables.is_empty() {
        return "No tables found.".to_string();
    }
    let mut out = String::from("Tables in database:");
    for name in tables {
        out.push_str("\n  - ");
        out.push_str(name);
    }
    out
}

/// Render an import receipt with its schema and preview.
pub fn render_import(report: &ImportReport) -> String {
    let verb = if report.replaced { "replaced" } else { "created" };
    let mut out = format!(
        "Table '{}' {} from '{}' with {} row{}.",
        report.table,
        verb,
        report.source.display(),
        report.rows_inserted,
        plural(report.rows_inserted)
    );

    let schema = report
        .columns
        .iter()
        .map(|c| vec![c.name.clone(), c.sql_type.to_string()])
        .collect();
    out.push_str("\nSchema:\n");
    out.push_str(&styled_table(&["column", "type"][..], schema).to_string());

    out.push_str(&format!(
        "\nFirst {} row{} of '{}':\n",
        report.preview.row_count(),
        plural(report.preview.row_count()),
        report.table
    ));
    out.push_str(&render_result(&report.preview));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetwise_db::Value;

    #[test]
    fn test_render_rows() {
        let result = QueryResult {
            columns: vec!["id".to_string(), "name".to_string()],
            rows: vec![
                vec![Value::Integer(1), Value::from("alice")],
                vec![Value::Integer(2), Value::Null],
            ],
            changes: 0,
        };
        let text = render_result(&result);
        assert!(text.contains("alice"));
        assert!(text.contains("NULL"));
        assert!(text.ends_with("(2 rows)"));
    }

    #[test]
    fn test_render_changes() {
        let result = QueryResult {
            changes: 1,
            ..QueryResult::default()
        };
        assert_eq!(render_result(&result), "1 row affected");
    }

    #[test]
    fn test_render_empty_row_set() {
        let result = QueryResult {
            columns: vec!["id".to_string()],
            ..QueryResult::default()
        };
        assert_eq!(render_result(&result), "(0 rows) columns: id");
    }

    #[test]
    fn test_render_tables() {
        assert_eq!(render_tables(&[]), "No tables found.");
        let text = render_tables(&["a".to_string(), "b".to_string()]);
        assert_eq!(text, "Tables in database:\n  - a\n  - b");
    }
}
