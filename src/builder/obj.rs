use std::collections::BTreeMap;

use super::{SchemaBuilder, opt_bool, opt_keyword, opt_str, opt_u64};
use crate::error::{Result, SchemaError};
use crate::model::{BoolOr, ObjectMetadata};
use crate::raw::{RawNode, child_path};

/// `additionalProperties` / `additionalItems` before resolution.
pub type AdditionalBuilder = BoolOr<Box<SchemaBuilder>>;

#[derive(Debug, Clone)]
pub struct ObjectSchemaBuilder {
    pub metadata: ObjectMetadata,
    pub required: Vec<String>,
    pub properties: BTreeMap<String, SchemaBuilder>,
    /// Keys of `properties` as written in the source.
    pub all_properties: Vec<String>,
    pub additional_properties: AdditionalBuilder,
}

impl ObjectSchemaBuilder {
    pub(crate) fn decode<N: RawNode>(node: &N, at: &str) -> Result<Self> {
        let metadata = ObjectMetadata {
            min_properties: opt_u64(node, "minProperties", at)?,
            max_properties: opt_u64(node, "maxProperties", at)?,
            discriminator: opt_str(node, "discriminator", at)?.map(str::to_string),
            is_abstract: opt_bool(node, "x-abstract", at)?.unwrap_or(false),
        };
        let required = string_list(node, "required", at)?.unwrap_or_default();

        let props_at = child_path(at, "properties");
        let (properties, all_properties) = match node.get("properties") {
            None => (BTreeMap::new(), Vec::new()),
            Some(props) => {
                let entries = props.entries().ok_or_else(|| {
                    SchemaError::malformed(&props_at, format!("expected a map, found {}", props.kind()))
                })?;
                let mut properties = BTreeMap::new();
                for (name, prop) in entries {
                    let schema = SchemaBuilder::decode(prop, &child_path(&props_at, name))?;
                    properties.insert(name.to_string(), schema);
                }
                // second, order-preserving read of the same node
                let order = props.keys().unwrap_or_default();
                (properties, order.into_iter().map(str::to_string).collect())
            }
        };

        let additional_properties = additional(node, "additionalProperties", at)?;

        Ok(Self { metadata, required, properties, all_properties, additional_properties })
    }
}

/// Decode a bool-or-schema keyword, defaulting to `false` when absent.
pub(crate) fn additional<N: RawNode>(node: &N, keyword: &str, at: &str) -> Result<AdditionalBuilder> {
    let Some(value) = node.get(keyword) else {
        return Ok(BoolOr::Bool(false));
    };
    if let Some(flag) = value.as_bool() {
        return Ok(BoolOr::Bool(flag));
    }
    if value.is_map() {
        let schema = SchemaBuilder::decode(value, &child_path(at, keyword))?;
        return Ok(BoolOr::Schema(Box::new(schema)));
    }
    Err(SchemaError::malformed(
        &child_path(at, keyword),
        format!("expected a boolean or a schema, found {}", value.kind()),
    ))
}

fn string_list<N: RawNode>(node: &N, keyword: &str, at: &str) -> Result<Option<Vec<String>>> {
    let list_at = child_path(at, keyword);
    let Some(items) = opt_keyword(node, keyword, "a sequence of strings", at, N::items)? else {
        return Ok(None);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| SchemaError::TypeCoercionFailure {
                at: format!("{list_at}/{i}"),
                keyword: keyword.to_string(),
                expected: "a string",
                found: item.kind(),
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SchemaTypeBuilder;
    use serde_json::{Value, json};

    fn object(v: Value) -> ObjectSchemaBuilder {
        ObjectSchemaBuilder::decode(&v, "").unwrap()
    }

    #[test]
    fn all_properties_follow_declaration_order() {
        let v: Value = serde_json::from_str(
            r#"{"type": "object", "properties": {"zulu": {}, "alpha": {}, "mike": {}}}"#,
        )
        .unwrap();
        let o = object(v);
        assert_eq!(o.all_properties, vec!["zulu", "alpha", "mike"]);
        // the map itself is sorted, not declaration ordered
        assert_eq!(o.properties.keys().collect::<Vec<_>>(), vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn all_properties_independent_of_required() {
        let o = object(json!({"properties": {"a": {}, "b": {}}, "required": ["b", "ghost"]}));
        assert_eq!(o.all_properties, vec!["a", "b"]);
        assert_eq!(o.required, vec!["b", "ghost"]);
    }

    #[test]
    fn additional_properties_defaults_to_false() {
        let o = object(json!({"type": "object"}));
        assert!(matches!(o.additional_properties, BoolOr::Bool(false)));
        assert!(o.required.is_empty());
        assert!(o.all_properties.is_empty());
    }

    #[test]
    fn additional_properties_bool_or_schema() {
        let o = object(json!({"type": "object", "additionalProperties": true}));
        assert!(matches!(o.additional_properties, BoolOr::Bool(true)));

        let o = object(json!({"type": "object", "additionalProperties": {"type": "string"}}));
        match o.additional_properties {
            BoolOr::Schema(s) => assert!(matches!(s.ty, SchemaTypeBuilder::String(..))),
            other => panic!("expected schema, got {other:?}"),
        }

        let err = ObjectSchemaBuilder::decode(&json!({"additionalProperties": 3}), "/o").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { ref at, .. } if at == "/o/additionalProperties"));
    }

    #[test]
    fn required_must_be_strings() {
        let err = ObjectSchemaBuilder::decode(&json!({"required": ["a", 1]}), "/o").unwrap_err();
        assert!(matches!(err, SchemaError::TypeCoercionFailure { ref at, .. } if at == "/o/required/1"));
        let err = ObjectSchemaBuilder::decode(&json!({"required": "a"}), "/o").unwrap_err();
        assert!(matches!(err, SchemaError::TypeCoercionFailure { .. }));
    }

    #[test]
    fn properties_must_be_a_map() {
        let err = ObjectSchemaBuilder::decode(&json!({"properties": ["a"]}), "/o").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { ref at, .. } if at == "/o/properties"));
    }

    #[test]
    fn nested_property_errors_carry_location() {
        let err = ObjectSchemaBuilder::decode(
            &json!({"properties": {"a/b": {"type": "integer", "minimum": "low"}}}),
            "/definitions/T",
        )
        .unwrap_err();
        assert_eq!(err.at(), "/definitions/T/properties/a~1b/minimum");
    }

    #[test]
    fn object_metadata() {
        let o = object(json!({"minProperties": 1, "maxProperties": 4, "discriminator": "kind"}));
        assert_eq!(o.metadata.min_properties, Some(1));
        assert_eq!(o.metadata.max_properties, Some(4));
        assert_eq!(o.metadata.discriminator.as_deref(), Some("kind"));
        assert!(!o.metadata.is_abstract);
    }

    #[test]
    fn abstract_object() {
        let o = object(json!({"type": "object", "x-abstract": true, "properties": {"k": {"type": "string"}}}));
        assert!(o.metadata.is_abstract);

        let err = ObjectSchemaBuilder::decode(&json!({"x-abstract": "yes"}), "/o").unwrap_err();
        assert!(matches!(err, SchemaError::TypeCoercionFailure { ref at, .. } if at == "/o/x-abstract"));
    }
}
