use serde_json::{Map, Value};
use std::io;

/// Result fields that hold row-shaped data worth exporting on their own.
const TABULAR_KEYS: [&str; 4] = ["schedule", "installments", "lines", "allocations"];

/// Write output as CSV to stdout.
///
/// When the result carries a row-shaped field (an amortization schedule,
/// advance-tax installments, budget lines) that array is written with one
/// column per field. Otherwise the result becomes two-column field/value
/// rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match tabular_field(result) {
                Some(rows) => write_array_csv(&mut wtr, rows),
                None => write_field_value(&mut wtr, result),
            },
            _ => write_field_value(&mut wtr, map),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn tabular_field(result: &Map<String, Value>) -> Option<&[Value]> {
    TABULAR_KEYS.iter().find_map(|key| match result.get(*key) {
        Some(Value::Array(rows)) if !rows.is_empty() => Some(rows.as_slice()),
        _ => None,
    })
}

fn write_field_value(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_preferred_over_scalars() {
        let result = json!({
            "installment": "26991.85",
            "schedule": [{ "month": 1, "interest": "22500" }],
        });
        let rows = tabular_field(result.as_object().unwrap()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_empty_schedule_falls_back() {
        let result = json!({ "installment": "26991.85", "schedule": [] });
        assert!(tabular_field(result.as_object().unwrap()).is_none());
    }
}
