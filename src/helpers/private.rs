use std::collections::HashMap;

use serde_json::{Map, Value};
use url::form_urlencoded;

pub(crate) const SCRUBBED: &str = "***";

pub(crate) fn string_map_to_form_url_encoded(map: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    let mut form_urlencoded = form_urlencoded::Serializer::new(String::new());
    for k in keys {
        form_urlencoded.append_pair(k, &map[k]);
    }

    form_urlencoded.finish()
}

#[cfg(test)]
pub(crate) fn form_url_encoded_to_string_map(string: &str) -> HashMap<String, String> {
    form_urlencoded::parse(string.as_bytes())
        .map(|(x, y)| (x.to_string(), y.to_string()))
        .collect()
}

/// Masks token values in a provider response before it is shown anywhere
pub(crate) fn scrub_secrets(content: &mut Map<String, Value>) {
    for secret in ["access_token", "refresh_token"] {
        if let Some(value) = content.get_mut(secret) {
            *value = Value::String(SCRUBBED.to_string());
        }
    }
}

/// Reads an integer field that providers send either as a number or a numeric string
pub(crate) fn get_int(content: &Map<String, Value>, key: &str) -> Option<i64> {
    match content.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub(crate) fn get_str<'a>(content: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    content.get(key).and_then(Value::as_str)
}
