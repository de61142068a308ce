//! Wire format of the analytics status endpoints

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /conditions/status`
#[derive(Debug, Serialize)]
pub struct ConditionsRequest<'a> {
    pub symbol: &'a str,
    pub conditions: &'a [String],
}

/// Body of `POST /indicators/status`
#[derive(Debug, Serialize)]
pub struct IndicatorsRequest<'a> {
    pub symbol: &'a str,
    pub indicators: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct ConditionsResponse {
    #[serde(default)]
    pub last_timestamp: Option<i64>,
    #[serde(default)]
    pub conditions: Vec<ConditionValue>,
}

#[derive(Debug, Deserialize)]
pub struct ConditionValue {
    pub definition: String,
    pub value: bool,
}

#[derive(Debug, Deserialize)]
pub struct IndicatorsResponse {
    #[serde(default)]
    pub last_timestamp: Option<i64>,
    #[serde(default)]
    pub indicators: Vec<IndicatorValue>,
}

#[derive(Debug, Deserialize)]
pub struct IndicatorValue {
    #[serde(alias = "definition")]
    pub indicator: String,
    #[serde(deserialize_with = "display_value")]
    pub value: String,
}

/// Error payload returned with non-200 statuses
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Value,
}

impl ErrorBody {
    /// Flatten the `errors` member into one line per field error.
    ///
    /// The service sends either a list of strings or an object mapping field
    /// names to a message or a list of messages.
    pub fn field_errors(&self) -> Vec<String> {
        match &self.errors {
            Value::Null => Vec::new(),
            Value::Array(items) => items.iter().map(value_text).collect(),
            Value::Object(fields) => fields
                .iter()
                .flat_map(|(field, messages)| match messages {
                    Value::Array(items) => items
                        .iter()
                        .map(|m| format!("{}: {}", field, value_text(m)))
                        .collect::<Vec<_>>(),
                    other => vec![format!("{}: {}", field, value_text(other))],
                })
                .collect(),
            other => vec![value_text(other)],
        }
    }
}

/// Indicator values arrive as strings or bare numbers; keep them as text.
fn display_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_text(&value))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
