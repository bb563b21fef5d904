//! Decode pass: raw document nodes → reference-unaware builder values.
//!
//! Each node is classified by its keyword set and decoded on its own. Pointers
//! keep only their reference string; nothing is resolved here, so the output
//! mirrors the source document one-to-one (including property order).
pub mod arr;
pub mod num;
pub mod obj;
pub mod string;

use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::model::{IntegerFormat, NumberFormat, StringFormat};
use crate::raw::{RawNode, child_path};
use crate::resolver::Pointer;

pub use arr::{ArrayItemsBuilder, ArraySchemaBuilder};
pub use num::{Numeric, NumericMetadataBuilder};
pub use obj::{AdditionalBuilder, ObjectSchemaBuilder};
pub use string::StringMetadataBuilder;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    pub metadata: MetadataBuilder,
    pub ty: SchemaTypeBuilder,
}

#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub enumerated_values: Option<Vec<Value>>,
    pub example: Option<Value>,
    pub nullable: bool,
}

#[derive(Debug, Clone)]
pub enum SchemaTypeBuilder {
    Pointer(Pointer),
    Object(Box<ObjectSchemaBuilder>),
    Array(Box<ArraySchemaBuilder>),
    AllOf(Box<CompositionBuilder>),
    OneOf(Box<CompositionBuilder>),
    String(Option<StringFormat>, StringMetadataBuilder),
    Number(Option<NumberFormat>, NumericMetadataBuilder<f64>),
    Integer(Option<IntegerFormat>, NumericMetadataBuilder<i64>),
    Enumeration,
    Boolean,
    File,
    Any,
    Null,
}

/// Payload shared by `allOf` and `oneOf`.
#[derive(Debug, Clone)]
pub struct CompositionBuilder {
    pub subschemas: Vec<SchemaBuilder>,
    /// `x-abstract`, `false` when absent.
    pub is_abstract: bool,
}

/// Schema kind decided from a node's keyword set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discriminant {
    Pointer,
    Object,
    Array,
    AllOf,
    OneOf,
    String,
    Number,
    Integer,
    Boolean,
    File,
    Enumeration,
    Any,
    Null,
}

// ————————————————————————————————————————————————————————————————————————————
// CLASSIFY
// ————————————————————————————————————————————————————————————————————————————

/// Decide which schema kind `node` represents.
///
/// Priority: `$ref`, object markers, array markers, `allOf`, `oneOf`, scalar
/// `type`, `enum`, then `any`/absent and `null`.
pub fn classify<N: RawNode>(node: &N, at: &str) -> Result<Discriminant> {
    if !node.is_map() {
        return Err(SchemaError::malformed(
            at,
            format!("expected a schema object, found {}", node.kind()),
        ));
    }
    if node.contains_key("$ref") {
        return Ok(Discriminant::Pointer);
    }
    let ty = opt_str(node, "type", at)?;
    if ty == Some("object") || node.contains_key("properties") {
        return Ok(Discriminant::Object);
    }
    if ty == Some("array") || node.contains_key("items") {
        return Ok(Discriminant::Array);
    }
    if node.contains_key("allOf") {
        return Ok(Discriminant::AllOf);
    }
    if node.contains_key("oneOf") {
        return Ok(Discriminant::OneOf);
    }
    match ty {
        Some("string") => return Ok(Discriminant::String),
        Some("number") => return Ok(Discriminant::Number),
        Some("integer") => return Ok(Discriminant::Integer),
        Some("boolean") => return Ok(Discriminant::Boolean),
        Some("file") => return Ok(Discriminant::File),
        _ => {}
    }
    if node.contains_key("enum") {
        return Ok(Discriminant::Enumeration);
    }
    match ty {
        None | Some("any") => Ok(Discriminant::Any),
        Some("null") => Ok(Discriminant::Null),
        Some(other) => Err(SchemaError::malformed(at, format!("unknown schema type `{other}`"))),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DECODE
// ————————————————————————————————————————————————————————————————————————————

impl SchemaBuilder {
    /// Decode one raw node (and everything nested under it).
    pub fn decode<N: RawNode>(node: &N, at: &str) -> Result<Self> {
        let discriminant = classify(node, at)?;
        let metadata = MetadataBuilder::decode(node, at)?;
        let ty = SchemaTypeBuilder::decode(discriminant, node, at)?;
        Ok(Self { metadata, ty })
    }
}

impl SchemaTypeBuilder {
    fn decode<N: RawNode>(discriminant: Discriminant, node: &N, at: &str) -> Result<Self> {
        Ok(match discriminant {
            Discriminant::Pointer => {
                let reference = opt_str(node, "$ref", at)?.unwrap_or_default();
                SchemaTypeBuilder::Pointer(Pointer::new(reference, &child_path(at, "$ref")))
            }
            Discriminant::Object => {
                SchemaTypeBuilder::Object(Box::new(ObjectSchemaBuilder::decode(node, at)?))
            }
            Discriminant::Array => {
                SchemaTypeBuilder::Array(Box::new(ArraySchemaBuilder::decode(node, at)?))
            }
            Discriminant::AllOf => {
                SchemaTypeBuilder::AllOf(Box::new(CompositionBuilder::decode(node, "allOf", at)?))
            }
            Discriminant::OneOf => {
                SchemaTypeBuilder::OneOf(Box::new(CompositionBuilder::decode(node, "oneOf", at)?))
            }
            Discriminant::String => SchemaTypeBuilder::String(
                opt_str(node, "format", at)?.map(StringFormat::from),
                StringMetadataBuilder::decode(node, at)?,
            ),
            Discriminant::Number => SchemaTypeBuilder::Number(
                opt_str(node, "format", at)?.map(NumberFormat::from),
                NumericMetadataBuilder::decode(node, at)?,
            ),
            Discriminant::Integer => SchemaTypeBuilder::Integer(
                opt_str(node, "format", at)?.map(IntegerFormat::from),
                NumericMetadataBuilder::decode(node, at)?,
            ),
            Discriminant::Enumeration => SchemaTypeBuilder::Enumeration,
            Discriminant::Boolean => SchemaTypeBuilder::Boolean,
            Discriminant::File => SchemaTypeBuilder::File,
            Discriminant::Any => SchemaTypeBuilder::Any,
            Discriminant::Null => SchemaTypeBuilder::Null,
        })
    }
}

impl MetadataBuilder {
    fn decode<N: RawNode>(node: &N, at: &str) -> Result<Self> {
        let enumerated_values = match node.get("enum") {
            None => None,
            Some(values) => {
                let items = values.items().ok_or_else(|| {
                    SchemaError::malformed(
                        &child_path(at, "enum"),
                        format!("expected a sequence, found {}", values.kind()),
                    )
                })?;
                Some(items.into_iter().map(N::to_json).collect())
            }
        };
        Ok(Self {
            title: opt_str(node, "title", at)?.map(str::to_string),
            description: opt_str(node, "description", at)?.map(str::to_string),
            default: node.get("default").map(N::to_json),
            enumerated_values,
            example: node.get("example").map(N::to_json),
            nullable: opt_bool(node, "x-nullable", at)?.unwrap_or(false),
        })
    }
}

impl CompositionBuilder {
    fn decode<N: RawNode>(node: &N, keyword: &str, at: &str) -> Result<Self> {
        let list_at = child_path(at, keyword);
        let subschemas = schema_list(node.get(keyword), &list_at)?;
        Ok(Self {
            subschemas,
            is_abstract: opt_bool(node, "x-abstract", at)?.unwrap_or(false),
        })
    }
}

/// Decode a non-empty sequence of subschema nodes.
pub(crate) fn schema_list<N: RawNode>(list: Option<&N>, at: &str) -> Result<Vec<SchemaBuilder>> {
    let items = list.and_then(N::items).ok_or_else(|| {
        SchemaError::malformed(at, "expected a sequence of subschemas")
    })?;
    if items.is_empty() {
        return Err(SchemaError::malformed(at, "expected at least one subschema"));
    }
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| SchemaBuilder::decode(item, &format!("{at}/{i}")))
        .collect()
}

// ————————————————————————————————————————————————————————————————————————————
// KEYWORD COERCION
// ————————————————————————————————————————————————————————————————————————————

fn coercion<N: RawNode>(value: &N, keyword: &str, expected: &'static str, at: &str) -> SchemaError {
    SchemaError::TypeCoercionFailure {
        at: child_path(at, keyword),
        keyword: keyword.to_string(),
        expected,
        found: value.kind(),
    }
}

/// Coerce an optional keyword with `convert`; absent keywords yield `None`.
pub(crate) fn opt_keyword<'a, N: RawNode, T>(
    node: &'a N,
    keyword: &str,
    expected: &'static str,
    at: &str,
    convert: impl FnOnce(&'a N) -> Option<T>,
) -> Result<Option<T>> {
    match node.get(keyword) {
        None => Ok(None),
        Some(value) => match convert(value) {
            Some(v) => Ok(Some(v)),
            None => Err(coercion(value, keyword, expected, at)),
        },
    }
}

pub(crate) fn opt_str<'a, N: RawNode>(node: &'a N, keyword: &str, at: &str) -> Result<Option<&'a str>> {
    opt_keyword(node, keyword, "a string", at, N::as_str)
}

pub(crate) fn opt_bool<N: RawNode>(node: &N, keyword: &str, at: &str) -> Result<Option<bool>> {
    opt_keyword(node, keyword, "a boolean", at, N::as_bool)
}

pub(crate) fn opt_u64<N: RawNode>(node: &N, keyword: &str, at: &str) -> Result<Option<u64>> {
    opt_keyword(node, keyword, "a non-negative integer", at, N::as_u64)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kind_of(v: Value) -> Discriminant {
        classify(&v, "").unwrap()
    }

    #[test]
    fn classification_priority() {
        assert_eq!(kind_of(json!({"$ref": "#/definitions/A", "type": "object"})), Discriminant::Pointer);
        assert_eq!(kind_of(json!({"properties": {}})), Discriminant::Object);
        assert_eq!(kind_of(json!({"type": "object", "items": {}})), Discriminant::Object);
        assert_eq!(kind_of(json!({"items": {"type": "string"}})), Discriminant::Array);
        assert_eq!(kind_of(json!({"allOf": [{}], "oneOf": [{}]})), Discriminant::AllOf);
        assert_eq!(kind_of(json!({"oneOf": [{}]})), Discriminant::OneOf);
        assert_eq!(kind_of(json!({"type": "string", "enum": ["a"]})), Discriminant::String);
        assert_eq!(kind_of(json!({"type": "integer"})), Discriminant::Integer);
        assert_eq!(kind_of(json!({"type": "number"})), Discriminant::Number);
        assert_eq!(kind_of(json!({"type": "boolean"})), Discriminant::Boolean);
        assert_eq!(kind_of(json!({"type": "file"})), Discriminant::File);
        assert_eq!(kind_of(json!({"enum": [1, 2]})), Discriminant::Enumeration);
        assert_eq!(kind_of(json!({})), Discriminant::Any);
        assert_eq!(kind_of(json!({"type": "any"})), Discriminant::Any);
        assert_eq!(kind_of(json!({"type": "null"})), Discriminant::Null);
    }

    #[test]
    fn unknown_type_is_malformed() {
        let err = classify(&json!({"type": "tuple"}), "/definitions/T").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { ref at, .. } if at == "/definitions/T"));
    }

    #[test]
    fn non_object_node_is_malformed() {
        let err = SchemaBuilder::decode(&json!(42), "/x").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { .. }));
    }

    #[test]
    fn non_string_type_is_coercion_failure() {
        let err = classify(&json!({"type": ["string", "null"]}), "").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::TypeCoercionFailure { ref keyword, found: "array", .. } if keyword == "type"
        ));
    }

    #[test]
    fn pointer_keeps_reference_unresolved() {
        let b = SchemaBuilder::decode(&json!({"$ref": "#/definitions/Missing"}), "/p").unwrap();
        match b.ty {
            SchemaTypeBuilder::Pointer(p) => {
                assert_eq!(p.reference(), "#/definitions/Missing");
                assert_eq!(p.at(), "/p/$ref");
            }
            other => panic!("expected pointer, got {other:?}"),
        }
    }

    #[test]
    fn metadata_is_decoded_for_every_kind() {
        let b = SchemaBuilder::decode(
            &json!({
                "title": "Colour",
                "description": "primary colours",
                "enum": ["red", "green", "blue"],
                "default": "red",
                "example": "green",
                "x-nullable": true
            }),
            "",
        )
        .unwrap();
        assert!(matches!(b.ty, SchemaTypeBuilder::Enumeration));
        assert_eq!(b.metadata.title.as_deref(), Some("Colour"));
        assert_eq!(b.metadata.enumerated_values.as_ref().unwrap().len(), 3);
        assert_eq!(b.metadata.default, Some(json!("red")));
        assert_eq!(b.metadata.example, Some(json!("green")));
        assert!(b.metadata.nullable);
    }

    #[test]
    fn leaf_formats_are_carried() {
        let b = SchemaBuilder::decode(&json!({"type": "string", "format": "date-time"}), "").unwrap();
        assert!(matches!(b.ty, SchemaTypeBuilder::String(Some(StringFormat::DateTime), _)));
        let b = SchemaBuilder::decode(&json!({"type": "integer", "format": "int32"}), "").unwrap();
        assert!(matches!(b.ty, SchemaTypeBuilder::Integer(Some(IntegerFormat::Int32), _)));
        let b = SchemaBuilder::decode(&json!({"type": "number"}), "").unwrap();
        assert!(matches!(b.ty, SchemaTypeBuilder::Number(None, _)));

        let err = SchemaBuilder::decode(&json!({"type": "number", "format": 64}), "").unwrap_err();
        assert!(matches!(err, SchemaError::TypeCoercionFailure { ref keyword, .. } if keyword == "format"));
    }

    #[test]
    fn composition_must_be_non_empty_sequence() {
        let err = SchemaBuilder::decode(&json!({"oneOf": []}), "/d").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { ref at, .. } if at == "/d/oneOf"));

        let err = SchemaBuilder::decode(&json!({"allOf": {"type": "string"}}), "/d").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { .. }));

        let err = SchemaBuilder::decode(&json!({"allOf": [{"type": "string"}, 7]}), "/d").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { ref at, .. } if at == "/d/allOf/1"));
    }

    #[test]
    fn one_of_abstract_defaults_false() {
        let b = SchemaBuilder::decode(&json!({"oneOf": [{"type": "string"}]}), "").unwrap();
        match b.ty {
            SchemaTypeBuilder::OneOf(c) => {
                assert!(!c.is_abstract);
                assert_eq!(c.subschemas.len(), 1);
            }
            other => panic!("expected oneOf, got {other:?}"),
        }

        let err = SchemaBuilder::decode(&json!({"oneOf": [{}], "x-abstract": "yes"}), "").unwrap_err();
        assert!(matches!(err, SchemaError::TypeCoercionFailure { ref keyword, .. } if keyword == "x-abstract"));
    }
}
