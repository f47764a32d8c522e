use serde_json::Value;

/// Placeholder the catalog's source data uses for "no value".
pub const NOT_SPECIFIED: &str = "Not specified";

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 10;

/// Normalizes a stored or imported list field into its canonical sequence.
///
/// Structured JSON array text is tried first; anything else is treated as the
/// legacy comma-separated shape. Text that looks like a JSON array but does
/// not parse yields an empty list. This never fails.
pub fn normalize_array_field(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim) else {
        return Vec::new();
    };
    if raw.is_empty() || raw == NOT_SPECIFIED {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => collect_items(&items),
        Ok(Value::String(inner)) => split_commas(&inner),
        _ if raw.starts_with('[') || raw.starts_with('{') => Vec::new(),
        _ => split_commas(raw),
    }
}

/// Same rules as [`normalize_array_field`] for values arriving in a JSON body.
pub fn normalize_array_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => collect_items(items),
        Value::String(raw) => normalize_array_field(Some(raw)),
        _ => Vec::new(),
    }
}

/// Parses a 1-10 score. Sentinels, garbage and out-of-range values are absent.
pub fn normalize_score(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    if raw.is_empty() || raw == NOT_SPECIFIED {
        return None;
    }
    raw.parse::<i64>().ok().and_then(in_score_range)
}

pub fn normalize_score_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().and_then(in_score_range),
        Value::String(raw) => normalize_score(Some(raw)),
        _ => None,
    }
}

/// Serializes a normalized list into its storage text.
pub fn to_storage(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Trims free text; blank values become absent.
pub fn normalize_text(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

fn in_score_range(score: i64) -> Option<i64> {
    (MIN_SCORE..=MAX_SCORE).contains(&score).then_some(score)
}

fn collect_items(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn split_commas(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
