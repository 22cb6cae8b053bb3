//! Query-string construction for list endpoints

use serde_json::Value as JsonValue;

/// Append parameters to a URL as `key=value&` pairs
///
/// Values that are falsy (`null`, `false`, `0`, `NaN`, `""`) are skipped and
/// arrays expand to one pair per element. Values are not percent-encoded here
/// and the trailing `&` is kept. When no pair is emitted the URL is returned
/// unchanged.
pub fn add_params<'a, I, K>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, &'a JsonValue)>,
    K: AsRef<str>,
{
    let mut pairs = String::new();

    for (name, value) in params {
        let name = name.as_ref();
        if !is_truthy(value) {
            continue;
        }

        match value {
            JsonValue::Array(items) => {
                let joined = items
                    .iter()
                    .map(param_text)
                    .collect::<Vec<_>>()
                    .join(&format!("&{}=", name));
                pairs.push_str(&format!("{}={}&", name, joined));
            }
            other => pairs.push_str(&format!("{}={}&", name, param_text(other))),
        }
    }

    if pairs.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, pairs)
    }
}

/// JavaScript truthiness of a JSON value
pub fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Plain-text rendering of a value inside a URL
pub fn param_text(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        JsonValue::Array(items) => items.iter().map(param_text).collect::<Vec<_>>().join(","),
        JsonValue::Object(_) => "[object Object]".to_string(),
    }
}
