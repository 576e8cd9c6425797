use serde_json::Value;

/// Key answers in priority order. Dotted paths reach into nested results.
const PRIORITY_PATHS: [&str; 10] = [
    "returns.project_irr",
    "irr_pct",
    "lp_multiple",
    "dscr",
    "monthly_payment",
    "returns.exit_price",
    "total_cash_flow",
    "raise_amount",
    "lp_total",
    "loan_amount",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, then falls back
/// to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", format_minimal(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "N/A".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
