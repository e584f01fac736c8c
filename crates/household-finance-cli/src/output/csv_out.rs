use serde_json::{Map, Value};
use std::io;

use super::{cell, headers, split_result};

/// Write output as CSV to stdout.
///
/// When the result carries a row array (a schedule or projection) the
/// rows are written one per line; otherwise field/value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    if let Err(e) = write_csv(&mut wtr, value) {
        eprintln!("CSV write error: {e}");
    }
}

fn write_csv<W: io::Write>(wtr: &mut csv::Writer<W>, value: &Value) -> csv::Result<()> {
    let result = match value {
        Value::Object(envelope) => match envelope.get("result") {
            Some(Value::Object(result)) => result,
            _ => envelope,
        },
        other => {
            wtr.write_record([cell(other)])?;
            return wtr.flush().map_err(csv::Error::from);
        }
    };

    let sections = split_result(result);
    match sections.tables.first() {
        Some((_, rows)) => write_rows(wtr, rows)?,
        None => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in &sections.fields {
                wtr.write_record([key, val])?;
            }
        }
    }
    wtr.flush().map_err(csv::Error::from)
}

fn write_rows<W: io::Write>(
    wtr: &mut csv::Writer<W>,
    rows: &[Map<String, Value>],
) -> csv::Result<()> {
    let headers = headers(rows);
    wtr.write_record(&headers)?;
    for row in rows {
        wtr.write_record(headers.iter().map(|h| row.get(h).map(cell).unwrap_or_default()))?;
    }
    Ok(())
}
