//! TOML reading and writing.

use serde_json::{Number, Value};

use super::{ensure_content, non_empty, FormatAdapter};
use crate::error::AdapterError;
use crate::tree::{Mapping, Tree};

#[derive(Debug, Default, Clone, Copy)]
pub struct TomlFormat;

impl FormatAdapter for TomlFormat {
    fn name(&self) -> &'static str {
        "TOML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn supports_merge(&self) -> bool {
        true
    }

    fn parse(&self, text: &str) -> Result<Tree, AdapterError> {
        ensure_content(text)?;
        let table: toml::Table =
            toml::from_str(text).map_err(|e| AdapterError::Parse(e.to_string()))?;
        non_empty(to_tree(toml::Value::Table(table))?)
    }

    fn serialize(&self, tree: &Tree) -> Result<String, AdapterError> {
        if !tree.is_object() {
            return Err(AdapterError::Serialize(
                "TOML documents must be a table at the top level".into(),
            ));
        }
        toml::to_string(tree).map_err(|e| AdapterError::Serialize(e.to_string()))
    }
}

/// Datetimes become their RFC 3339 text so every format yields the same tree.
fn to_tree(value: toml::Value) -> Result<Tree, AdapterError> {
    Ok(match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| AdapterError::Parse(format!("unsupported float value: {f}")))?,
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(to_tree)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| Ok((key, to_tree(value)?)))
                .collect::<Result<Mapping, AdapterError>>()?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tables() {
        let text = "\
title = \"demo\"

[\"$ref\"]
database = \"db.toml\"
";
        let tree = TomlFormat.parse(text).unwrap();
        assert_eq!(
            tree,
            json!({"title": "demo", "$ref": {"database": "db.toml"}})
        );
    }

    #[test]
    fn test_parse_datetimes_as_strings() {
        let text = "released = 1979-05-27\nupdated = 1979-05-27T07:32:00Z\nat = 07:32:00\n";
        let tree = TomlFormat.parse(text).unwrap();
        assert_eq!(
            tree,
            json!({
                "released": "1979-05-27",
                "updated": "1979-05-27T07:32:00Z",
                "at": "07:32:00"
            })
        );
    }

    #[test]
    fn test_parse_rejects_non_finite_floats() {
        assert!(matches!(
            TomlFormat.parse("x = nan\n"),
            Err(AdapterError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_empty_documents() {
        assert!(matches!(TomlFormat.parse(""), Err(AdapterError::Empty)));
        assert!(matches!(TomlFormat.parse("# comment\n"), Err(AdapterError::Empty)));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            TomlFormat.parse("invalid toml {{{\n"),
            Err(AdapterError::Parse(_))
        ));
    }

    #[test]
    fn test_serialize_rejects_null() {
        assert!(matches!(
            TomlFormat.serialize(&json!({"a": null})),
            Err(AdapterError::Serialize(_))
        ));
        assert!(TomlFormat.serialize(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_round_trip() {
        let tree = json!({"name": "demo", "server": {"port": 8080, "hosts": ["a", "b"]}});
        let text = TomlFormat.serialize(&tree).unwrap();
        assert_eq!(TomlFormat.parse(&text).unwrap(), tree);
    }
}
