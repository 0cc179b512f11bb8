//! Lenient argument conversion for tool calls
//!
//! MCP clients are inconsistent about types: numbers and flags often arrive
//! as strings and lists as comma separated text. These helpers accept both
//! forms and report anything else as a readable message.

use crate::catalog::ParamType;
use serde_json::{Number, Value};

/// `organization_id` -> `organizationId`
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert a raw argument to the declared type
pub fn convert(value: &Value, param_type: ParamType) -> Result<Value, String> {
    match param_type {
        ParamType::String => to_string(value).map(Value::String),
        ParamType::Integer => to_integer(value).map(|i| Value::Number(i.into())),
        ParamType::Number => to_number(value),
        ParamType::Boolean => to_bool(value).map(Value::Bool),
        ParamType::StringList => {
            to_string_list(value).map(|items| Value::Array(items.into_iter().map(Value::String).collect()))
        }
        ParamType::Json => to_json(value),
    }
}

fn to_string(value: &Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected a string, got {}", type_name(other))),
    }
}

fn to_integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .ok_or_else(|| format!("expected an integer, got {n}")),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("expected an integer, got \"{s}\"")),
        other => Err(format!("expected an integer, got {}", type_name(other))),
    }
}

fn to_number(value: &Value) -> Result<Value, String> {
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("expected a number, got \"{s}\"")),
        other => Err(format!("expected a number, got {}", type_name(other))),
    }
}

fn to_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => crate::common::env_loader::parse_bool(s)
            .ok_or_else(|| format!("expected true or false, got \"{s}\"")),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(false),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(true),
        other => Err(format!("expected a boolean, got {}", type_name(other))),
    }
}

fn to_string_list(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(to_string)
            .map(|item| item.map(|s| s.trim().to_string()))
            .filter(|item| !matches!(item, Ok(s) if s.is_empty()))
            .collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            // A JSON encoded array is also accepted
            if trimmed.starts_with('[') {
                if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                    return to_string_list(&Value::Array(items));
                }
            }
            Ok(crate::common::env_loader::split_list(trimmed))
        }
        Value::Number(n) => Ok(vec![n.to_string()]),
        other => Err(format!("expected a list of strings, got {}", type_name(other))),
    }
}

fn to_json(value: &Value) -> Result<Value, String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                serde_json::from_str(trimmed).map_err(|e| format!("invalid JSON: {e}"))
            } else {
                Ok(value.clone())
            }
        }
        _ => Ok(value.clone()),
    }
}

/// Text used when substituting a converted value into a path
pub fn path_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitute `{name}` placeholders, percent-encoding each value
pub fn fill_path(template: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| format!("unterminated placeholder in {template}"))?;
        let key = &after[..end];
        let value = lookup(key).ok_or_else(|| format!("no value for path placeholder '{key}'"))?;
        out.push_str(&urlencoding::encode(&value));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// JSON type name for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("organization_id"), "organizationId");
        assert_eq!(snake_to_camel("per_page"), "perPage");
        assert_eq!(snake_to_camel("serial"), "serial");
        assert_eq!(snake_to_camel("t0"), "t0");
        assert_eq!(snake_to_camel("is_bound_to_config_template"), "isBoundToConfigTemplate");
        assert_eq!(snake_to_camel("_private"), "private");
    }

    #[test]
    fn test_convert_integer() {
        assert_eq!(convert(&json!(5), ParamType::Integer).unwrap(), json!(5));
        assert_eq!(convert(&json!(" 42 "), ParamType::Integer).unwrap(), json!(42));
        assert_eq!(convert(&json!(3.0), ParamType::Integer).unwrap(), json!(3));
        assert!(convert(&json!(3.5), ParamType::Integer).is_err());
        assert!(convert(&json!("five"), ParamType::Integer).is_err());
        assert!(convert(&json!([1]), ParamType::Integer).is_err());
    }

    #[test]
    fn test_convert_boolean() {
        assert_eq!(convert(&json!(true), ParamType::Boolean).unwrap(), json!(true));
        assert_eq!(convert(&json!("false"), ParamType::Boolean).unwrap(), json!(false));
        assert_eq!(convert(&json!("Yes"), ParamType::Boolean).unwrap(), json!(true));
        assert_eq!(convert(&json!(1), ParamType::Boolean).unwrap(), json!(true));
        assert!(convert(&json!("sometimes"), ParamType::Boolean).is_err());
    }

    #[test]
    fn test_convert_number_and_string() {
        assert_eq!(convert(&json!("37.5"), ParamType::Number).unwrap(), json!(37.5));
        assert!(convert(&json!("north"), ParamType::Number).is_err());
        assert_eq!(convert(&json!(12), ParamType::String).unwrap(), json!("12"));
        assert!(convert(&json!({"a": 1}), ParamType::String).is_err());
    }

    #[test]
    fn test_convert_string_list() {
        assert_eq!(
            convert(&json!("a, b,,c "), ParamType::StringList).unwrap(),
            json!(["a", "b", "c"])
        );
        assert_eq!(
            convert(&json!([" x ", "", "y"]), ParamType::StringList).unwrap(),
            json!(["x", "y"])
        );
        assert_eq!(
            convert(&json!("[\"Q2XX\", \"Q2YY\"]"), ParamType::StringList).unwrap(),
            json!(["Q2XX", "Q2YY"])
        );
        assert!(convert(&json!({"a": 1}), ParamType::StringList).is_err());
    }

    #[test]
    fn test_convert_json() {
        assert_eq!(
            convert(&json!("[{\"policy\": \"deny\"}]"), ParamType::Json).unwrap(),
            json!([{"policy": "deny"}])
        );
        assert_eq!(
            convert(&json!({"enabled": true}), ParamType::Json).unwrap(),
            json!({"enabled": true})
        );
        assert_eq!(convert(&json!("plain"), ParamType::Json).unwrap(), json!("plain"));
        assert!(convert(&json!("{broken"), ParamType::Json).is_err());
    }

    #[test]
    fn test_fill_path_encodes_values() {
        let path = fill_path("/networks/{networkId}/clients/{clientId}", |key| match key {
            "networkId" => Some("N_123".to_string()),
            "clientId" => Some("aa:bb/cc".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(path, "/networks/N_123/clients/aa%3Abb%2Fcc");

        let err = fill_path("/devices/{serial}", |_| None).unwrap_err();
        assert!(err.contains("serial"));
    }
}
