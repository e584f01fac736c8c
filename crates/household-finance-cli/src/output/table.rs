use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{cell, headers, split_result};

/// Format output as tables using the tabled crate.
///
/// Scalar results go in a Field/Value table; every array of rows in the
/// result (schedules, projections, payoff order) gets its own table.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", cell(value));
        return;
    };

    let result = match envelope.get("result") {
        Some(Value::Object(result)) => result,
        _ => envelope,
    };
    let sections = split_result(result);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &sections.fields {
        builder.push_record([key.as_str(), val.as_str()]);
    }
    println!("{}", Table::from(builder));

    for (name, rows) in &sections.tables {
        println!("\n{name}:");
        println!("{}", rows_table(rows));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {methodology}");
    }
}

fn rows_table(rows: &[Map<String, Value>]) -> Table {
    let headers = headers(rows);
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for row in rows {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(cell).unwrap_or_default()),
        );
    }
    Table::from(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rows_table_contains_every_column() {
        let rows = vec![
            json!({"month": 1, "balance": "4900.00"}).as_object().unwrap().clone(),
            json!({"month": 2, "balance": "4798.50"}).as_object().unwrap().clone(),
        ];
        let rendered = rows_table(&rows).to_string();
        assert!(rendered.contains("month"));
        assert!(rendered.contains("4798.50"));
    }
}
