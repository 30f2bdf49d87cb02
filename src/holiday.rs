// Normalized holiday record shared by the query service and the batch collector

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// Common shape every provider is mapped into. Field names follow the public
// JSON contract of the query endpoint, not any one provider's schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub name: String,
    pub name_local: String,
    pub description: String,
    pub country: String,
    pub location: String,
    #[serde(rename = "type")]
    pub holiday_type: String,
    pub date: String,
    pub date_year: String,
    pub date_month: String,
    pub date_day: String,
    pub week_day: String,
    // Only the secondary provider reports these
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global: Option<bool>,
}

// Splits an ISO `YYYY-MM-DD` date into its year, month and day pieces.
// Missing pieces come back as empty strings; nothing here ever fails.
pub fn split_date(date: &str) -> (String, String, String) {
    let mut parts = date.split('-');
    let mut next = || parts.next().unwrap_or_default().to_string();
    let year = next();
    let month = next();
    let day = next();
    (year, month, day)
}

// Month as the collector reports it: only present when the date has a `-`.
pub fn month_of(date: &str) -> Option<String> {
    if !date.contains('-') {
        return None;
    }
    date.split('-').nth(1).map(str::to_string)
}

pub fn join_types(types: &[String]) -> String {
    types.join(", ")
}

// Providers are inconsistent about quoting numeric fields, and some send
// null. Everything is kept as a string.
pub(crate) fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

// Flags come as JSON booleans, but quoted "true"/"false" are accepted too.
// Anything else is treated as not supplied.
pub(crate) fn loose_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

// A list of labels. Nulls inside the list are dropped, a bare string is a
// one-element list, and any other shape counts as not supplied.
pub(crate) fn loose_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    other => Some(other.to_string()),
                })
                .collect(),
        ),
        Some(Value::String(s)) => Some(vec![s]),
        _ => None,
    })
}
