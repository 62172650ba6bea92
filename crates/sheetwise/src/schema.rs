//! Schema description for translation prompts.

use sheetwise_db::{Result, Store};

/// One `- table (col1, col2, ...)` line per table, tables in name order and
/// columns in storage order. Empty when the store has no tables.
pub fn describe_schema(store: &Store) -> Result<String> {
    let mut out = String::new();
    for table in store.list_tables()? {
        let columns: Vec<String> = store
            .table_columns(&table)?
            .into_iter()
            .map(|c| c.name)
            .collect();
        out.push_str(&format!("- {} ({})\n", table, columns.join(", ")));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetwise_db::{ColumnDescriptor, CreateMode, SqlType};

    #[test]
    fn test_describe_schema() {
        let mut store = Store::open_in_memory().unwrap();
        assert_eq!(describe_schema(&store).unwrap(), "");

        store
            .create_table(
                "orders",
                &[
                    ColumnDescriptor::new("id", SqlType::Integer),
                    ColumnDescriptor::new("total", SqlType::Real),
                ],
                &[],
                CreateMode::New,
            )
            .unwrap();
        store
            .create_table(
                "customers",
                &[ColumnDescriptor::new("name", SqlType::Text)],
                &[],
                CreateMode::New,
            )
            .unwrap();

        assert_eq!(
            describe_schema(&store).unwrap(),
            "- customers (name)\n- orders (id, total)\n"
        );
    }
}
