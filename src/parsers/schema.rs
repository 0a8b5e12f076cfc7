use serde_json::Value;

/// Best-effort `@type` extraction for one JSON-LD block.
///
/// The outer `Option` says whether the block contributes an entry at all:
/// unparseable JSON, an empty array, or a first array element that is not an
/// object yield `None`. The inner `Option` is the `@type` itself, absent when
/// the object carries none.
pub fn block_type(block: &str) -> Option<Option<String>> {
    let value: Value = match serde_json::from_str(block.trim()) {
        Ok(value) => value,
        Err(e) => {
            ::log::debug!("Skipping unparseable JSON-LD block: {}", e);
            return None;
        }
    };

    match value {
        Value::Object(_) => Some(type_of(&value)),
        Value::Array(items) => match items.first() {
            Some(first @ Value::Object(_)) => Some(type_of(first)),
            _ => {
                ::log::debug!("Skipping JSON-LD array without a leading object");
                None
            }
        },
        _ => None,
    }
}

fn type_of(object: &Value) -> Option<String> {
    match object.get("@type")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        // JSON-LD allows multiple types on one node
        Value::Array(types) => Some(
            types
                .iter()
                .map(|t| match t {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}
