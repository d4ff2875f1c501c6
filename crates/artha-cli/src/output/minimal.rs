use serde_json::Value;

/// Headline figure for each command, in priority order.
const PRIORITY_KEYS: [&str; 12] = [
    "installment",
    "tenure_months",
    "interest_saved",
    "recommendation",
    "recommended",
    "total_tax",
    "net_liability",
    "future_value",
    "monthly_contribution",
    "allocated_total",
    "allocated_amount",
    "net_worth",
];

/// Print just the headline value from the output.
///
/// Looks for well-known result fields first, then falls back to the first
/// field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
