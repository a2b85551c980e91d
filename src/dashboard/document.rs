use crate::kpi::{FieldValue, KpiResult, KpiStore};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde_json::{Map, Number, Value as Json};

/// Typed tree of everything that ends up in a JSON document.
///
/// The tree is built from owned data only, so it cannot contain cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentValue {
    Count(u64),
    Number(f64),
    Text(String),
    Timestamp(DateTime<FixedOffset>),
    Mapping(Vec<(String, DocumentValue)>),
    Sequence(Vec<DocumentValue>),
}

impl DocumentValue {
    /// Converts the tree to JSON. Timestamps become RFC 3339 text; non-finite numbers
    /// become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Count(count) => Json::from(*count),
            Self::Number(number) => Number::from_f64(*number).map_or(Json::Null, Json::Number),
            Self::Text(text) => Json::String(text.clone()),
            Self::Timestamp(timestamp) => {
                Json::String(timestamp.to_rfc3339_opts(SecondsFormat::Secs, false))
            }
            Self::Mapping(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect::<Map<String, Json>>(),
            ),
            Self::Sequence(items) => Json::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

impl From<&FieldValue> for DocumentValue {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Count(count) => Self::Count(*count),
            FieldValue::Number(number) => Self::Number(*number),
            FieldValue::Histogram(buckets) => Self::Mapping(
                buckets
                    .iter()
                    .map(|(key, count)| (key.to_string(), Self::Count(*count)))
                    .collect(),
            ),
        }
    }
}

impl From<&KpiResult> for DocumentValue {
    fn from(result: &KpiResult) -> Self {
        Self::Mapping(
            result
                .fields()
                .iter()
                .map(|(name, value)| (name.to_string(), Self::from(value)))
                .collect(),
        )
    }
}

impl From<&KpiStore> for DocumentValue {
    fn from(store: &KpiStore) -> Self {
        Self::Mapping(
            store
                .iter()
                .map(|result| (result.name().to_string(), Self::from(result)))
                .collect(),
        )
    }
}
