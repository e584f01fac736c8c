use serde_json::Value;

/// Where the headline number lives for each command, in lookup order.
const HEADLINE_POINTERS: &[&str] = &[
    "/periodic_payment",
    "/breakdown/total",
    "/loan/periodic_payment",
    "/max_price",
    "/affordability/max_price",
    "/final_balance",
    "/required_contribution",
    "/horizon/periods",
    "/monthly_delta",
    "/interest_saved_vs_minimum",
    "/months",
    "/projected_balance",
    "/contribution_limit",
];

/// Print the single most useful value from a command's output.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = value.get("result").unwrap_or(value);

    if let Some(found) = HEADLINE_POINTERS
        .iter()
        .filter_map(|p| result.pointer(p))
        .find(|v| !v.is_null())
    {
        return scalar(found);
    }

    match result {
        Value::Object(map) => map
            .iter()
            .next()
            .map(|(key, val)| format!("{key}: {}", scalar(val)))
            .unwrap_or_default(),
        other => scalar(other),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_headline_reads_result_envelope() {
        let out = json!({"result": {"total_interest": "100", "periodic_payment": "1199.10"}});
        assert_eq!(headline(&out), "1199.10");
    }

    #[test]
    fn test_headline_follows_nested_pointer() {
        let out = json!({"result": {"loan_amount": "200000", "breakdown": {"total": "1599.10"}}});
        assert_eq!(headline(&out), "1599.10");
    }

    #[test]
    fn test_headline_without_envelope() {
        let out = json!({"balance": "5000", "months": 32});
        assert_eq!(headline(&out), "32");
    }

    #[test]
    fn test_headline_falls_back_to_first_field() {
        let out = json!({"result": {"alpha": 1}});
        assert_eq!(headline(&out), "alpha: 1");
    }
}
