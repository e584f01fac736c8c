pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Result object split into scalar fields (nested objects flattened to
/// dotted keys) and arrays of row objects.
#[derive(Debug, Default)]
pub(crate) struct Sections {
    pub fields: Vec<(String, String)>,
    pub tables: Vec<(String, Vec<Map<String, Value>>)>,
}

pub(crate) fn split_result(result: &Map<String, Value>) -> Sections {
    let mut sections = Sections::default();
    collect(result, "", &mut sections);
    sections
}

fn collect(map: &Map<String, Value>, prefix: &str, sections: &mut Sections) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => collect(inner, &name, sections),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                let rows = items.iter().filter_map(|v| v.as_object().cloned()).collect();
                sections.tables.push((name, rows));
            }
            other => sections.fields.push((name, cell(other))),
        }
    }
}

/// Render a scalar (or a short array of scalars) as a single cell.
pub(crate) fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Column headers for a set of rows, in first-seen order.
pub(crate) fn headers(rows: &[Map<String, Value>]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_flattens_nested_objects() {
        let result = json!({
            "loan_amount": "200000",
            "breakdown": {"tax": "250", "total": "1599.10"},
            "schedule": [{"period": 1, "balance": "10"}],
            "price_path": ["300000", "290000"],
        });
        let sections = split_result(result.as_object().unwrap());
        let names: Vec<&str> = sections.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(names.contains(&"breakdown.tax"));
        assert!(names.contains(&"price_path"));
        assert_eq!(sections.tables.len(), 1);
        assert_eq!(sections.tables[0].0, "schedule");
    }

    #[test]
    fn test_headers_union_in_order() {
        let rows = vec![
            json!({"a": 1, "b": 2}).as_object().unwrap().clone(),
            json!({"a": 1, "c": 3}).as_object().unwrap().clone(),
        ];
        assert_eq!(headers(&rows), vec!["a", "b", "c"]);
    }
}
