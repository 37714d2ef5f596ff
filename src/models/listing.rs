use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Records shown in list views: they expose an identifier and the text
/// fields the search box matches against.
pub trait Listed {
    fn record_id(&self) -> Option<&str>;

    /// Name- and description-like fields, in display order.
    fn search_fields(&self) -> Vec<&str>;
}

/// Drop records whose identifier is missing or blank, logging each one.
pub fn drop_blank_ids<T: Listed>(records: Vec<T>, kind: &str) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let valid = record.record_id().is_some_and(|id| !id.trim().is_empty());
            if !valid {
                log::warn!("Dropping {kind} record at position {index}: missing identifier");
                return None;
            }
            Some(record)
        })
        .collect()
}

/// Case-insensitive substring search over each record's search fields.
/// A blank term keeps every record; any other term is matched as typed,
/// surrounding spaces included.
pub fn search<T: Listed>(records: Vec<T>, term: &str) -> Vec<T> {
    if term.trim().is_empty() {
        return records;
    }
    let needle = term.to_lowercase();
    records
        .into_iter()
        .filter(|record| {
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Backend identifiers arrive as strings or integers depending on the
/// resource; normalise both to `Option<String>`.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(id_from_value))
}

/// Same as [`lenient_id`] for a list of identifiers; unusable entries are skipped.
pub fn lenient_id_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(values.into_iter().filter_map(id_from_value).collect())
}

fn id_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
