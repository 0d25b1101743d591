use anyhow::{Context, bail};
use serde_json::{Map, Value};

use crate::cli::root_commands::BodyArgs;

/// Build a request payload from `--json` or repeated `--set key=value`.
///
/// A `--set` value is read as a JSON literal when it parses (`25`, `true`,
/// `null`, `"quoted"`), otherwise as a plain string. Later keys win.
pub fn parse_body(args: &BodyArgs) -> anyhow::Result<Value> {
    if let Some(json) = &args.json {
        let value: Value = serde_json::from_str(json).context("--json is not valid JSON")?;
        if !value.is_object() {
            bail!("--json must be a JSON object");
        }
        return Ok(value);
    }

    let mut body = Map::new();
    for pair in &args.set {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("invalid --set '{pair}': expected KEY=VALUE"))?;
        let key = key.trim();
        if key.is_empty() {
            bail!("invalid --set '{pair}': key is empty");
        }
        body.insert(key.to_string(), parse_scalar(raw));
    }
    Ok(Value::Object(body))
}

fn parse_scalar(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn set(pairs: &[&str]) -> BodyArgs {
        BodyArgs {
            set: pairs.iter().map(ToString::to_string).collect(),
            json: None,
        }
    }

    #[test]
    fn set_values_are_typed_when_they_parse() {
        let body = parse_body(&set(&["name=Mouse", "price=25", "in_stock=true", "notes=null"]))
            .unwrap();
        assert_eq!(
            body,
            json!({"name": "Mouse", "price": 25, "in_stock": true, "notes": null})
        );
    }

    #[test]
    fn quoted_value_stays_a_string() {
        let body = parse_body(&set(&[r#"sku="123""#])).unwrap();
        assert_eq!(body, json!({"sku": "123"}));
    }

    #[test]
    fn value_may_contain_equals() {
        let body = parse_body(&set(&["notes=a=b"])).unwrap();
        assert_eq!(body, json!({"notes": "a=b"}));
    }

    #[test]
    fn later_set_wins() {
        let body = parse_body(&set(&["price=1", "price=2"])).unwrap();
        assert_eq!(body, json!({"price": 2}));
    }

    #[test]
    fn missing_equals_is_rejected() {
        let error = parse_body(&set(&["name"])).unwrap_err();
        assert!(error.to_string().contains("expected KEY=VALUE"));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(parse_body(&set(&["=5"])).is_err());
    }

    #[test]
    fn json_body_must_be_an_object() {
        let args = BodyArgs {
            set: Vec::new(),
            json: Some("[1, 2]".into()),
        };
        assert!(parse_body(&args).is_err());
    }

    #[test]
    fn json_body_is_used_verbatim() {
        let args = BodyArgs {
            set: Vec::new(),
            json: Some(r#"{"price": 30, "name": "Pad"}"#.into()),
        };
        assert_eq!(parse_body(&args).unwrap(), json!({"price": 30, "name": "Pad"}));
    }

    #[test]
    fn no_input_is_an_empty_object() {
        assert_eq!(parse_body(&set(&[])).unwrap(), json!({}));
    }
}
