//! Field-level helpers shared by request bodies. Clients send ids and flags
//! either as JSON scalars or as strings, and treat empty values as absent.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Trims a string field. Blank strings count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|raw| raw.trim().to_string()).filter(|trimmed| !trimmed.is_empty())
}

/// Stored text form of an opaque JSON blob (questions, answers, id lists).
/// Strings are stored as given after trimming; any other value is stored as
/// its compact JSON serialisation, keeping the client's key order.
pub(crate) fn blob_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        other => serde_json::to_string(other).ok(),
    }
}

/// Integer given as a JSON number or a numeric string. `null` and `""` are
/// absent; anything else is a type error.
pub(crate) fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => number
            .as_i64()
            .and_then(|value| i32::try_from(value).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected an integer, found {number}"))),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => text
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("expected an integer, found \"{text}\""))),
        Some(other) => Err(D::Error::custom(format!("expected an integer, found {other}"))),
    }
}

/// Boolean given as `true`/`false`, `0`/`1`, or their string forms.
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(flag)),
        Some(Value::Number(number)) => match number.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(D::Error::custom(format!("expected a boolean, found {number}"))),
        },
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(D::Error::custom(format!("expected a boolean, found \"{text}\""))),
        },
        Some(other) => Err(D::Error::custom(format!("expected a boolean, found {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "lenient_i32")]
        id: Option<i32>,
        #[serde(default, deserialize_with = "lenient_bool")]
        flag: Option<bool>,
    }

    #[test]
    fn blobs_keep_client_key_order_and_strings_pass_through() {
        let questions = json!([{ "q": "2+2=?", "options": ["3", "4", "5"], "ans": "4" }]);
        let stored = blob_text(Some(&questions)).expect("stored");
        assert_eq!(stored, r#"[{"q":"2+2=?","options":["3","4","5"],"ans":"4"}]"#);
        let reparsed: Value = serde_json::from_str(&stored).expect("parse back");
        assert_eq!(reparsed, questions);

        assert_eq!(blob_text(Some(&json!("  [1,2] "))).as_deref(), Some("[1,2]"));
        assert_eq!(blob_text(Some(&json!("   "))), None);
        assert_eq!(blob_text(Some(&Value::Null)), None);
        assert_eq!(blob_text(None), None);
    }

    #[test]
    fn ids_accept_numbers_and_numeric_strings() {
        let probe: Probe = serde_json::from_value(json!({ "id": "12", "flag": 1 })).unwrap();
        assert_eq!(probe.id, Some(12));
        assert_eq!(probe.flag, Some(true));

        let probe: Probe = serde_json::from_value(json!({ "id": "", "flag": "false" })).unwrap();
        assert_eq!(probe.id, None);
        assert_eq!(probe.flag, Some(false));

        let probe: Probe = serde_json::from_value(json!({})).unwrap();
        assert_eq!(probe.id, None);
        assert_eq!(probe.flag, None);
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        assert!(serde_json::from_value::<Probe>(json!({ "id": "abc" })).is_err());
        assert!(serde_json::from_value::<Probe>(json!({ "id": 1.5 })).is_err());
        assert!(serde_json::from_value::<Probe>(json!({ "flag": "maybe" })).is_err());
    }

    #[test]
    fn blank_strings_are_absent() {
        assert_eq!(non_blank(Some("  Ann ".to_string())).as_deref(), Some("Ann"));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }
}
