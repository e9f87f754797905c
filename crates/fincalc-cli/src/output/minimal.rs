use serde_json::Value;

/// Print just the headline figure of the output.
///
/// Heuristic: look for each calculator's headline field in order of
/// priority, then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "emi",
        "maturity_amount",
        "required_monthly_saving",
        "max_loan_amount",
        "annualized_roi",
        "outcome",
        "formatted",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
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
        // Card payoff outcome: months when it pays off, "never" otherwise.
        Value::Object(map) => match map.get("status").and_then(Value::as_str) {
            Some("paid_off") => map
                .get("months")
                .map(|m| format!("{} months", format_minimal(m)))
                .unwrap_or_default(),
            Some("never_pays_off") => "never".to_string(),
            _ => serde_json::to_string(value).unwrap_or_default(),
        },
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
