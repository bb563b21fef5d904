//! Resolved model → Swagger-shaped JSON.
//!
//! Structures render as `$ref`s, so cyclic graphs emit finitely. Keywords
//! holding their default value are omitted.
use serde_json::{Map, Value, json};

use crate::document::{Document, ParseOptions};
use crate::model::{
    ArrayItems, BoolOr, Metadata, NumericMetadata, ObjectSchema, Schema, SchemaType, StringMetadata,
};
use crate::raw::escape_segment;

pub fn schema_to_json(schema: &Schema) -> Value {
    schema_to_json_with(schema, &ParseOptions::default())
}

pub fn schema_to_json_with(schema: &Schema, options: &ParseOptions) -> Value {
    let mut o = Map::new();
    emit_type(&schema.ty, options, &mut o);
    emit_metadata(&schema.metadata, &mut o);
    Value::Object(o)
}

/// The whole definitions table, keyed as in the source.
pub fn document_to_json(doc: &Document, options: &ParseOptions) -> Value {
    let definitions: Map<String, Value> = doc
        .iter()
        .map(|(name, schema)| (name.to_string(), schema_to_json_with(schema, options)))
        .collect();
    json!({ "definitions": definitions })
}

fn emit_metadata(m: &Metadata, o: &mut Map<String, Value>) {
    if let Some(t) = &m.title {
        o.insert("title".into(), Value::from(t.clone()));
    }
    if let Some(d) = &m.description {
        o.insert("description".into(), Value::from(d.clone()));
    }
    if let Some(values) = &m.enumerated_values {
        o.insert("enum".into(), Value::Array(values.clone()));
    }
    if let Some(d) = &m.default {
        o.insert("default".into(), d.clone());
    }
    if let Some(e) = &m.example {
        o.insert("example".into(), e.clone());
    }
    if m.nullable {
        o.insert("x-nullable".into(), Value::Bool(true));
    }
}

fn emit_type(ty: &SchemaType, options: &ParseOptions, o: &mut Map<String, Value>) {
    let nested = |s: &Schema| schema_to_json_with(s, options);
    match ty {
        SchemaType::Structure(s) => {
            let reference = format!("#{}/{}", options.definitions_path, escape_segment(s.name()));
            o.insert("$ref".into(), Value::from(reference));
        }
        SchemaType::Object(obj) => emit_object(obj, options, o),
        SchemaType::Array(arr) => {
            o.insert("type".into(), Value::from("array"));
            let items = match &arr.items {
                ArrayItems::One(item) => nested(item.as_ref()),
                ArrayItems::Many(items) => Value::Array(items.iter().map(nested).collect()),
            };
            o.insert("items".into(), items);
            if let BoolOr::Schema(_) | BoolOr::Bool(true) = arr.additional_items {
                o.insert("additionalItems".into(), bool_or(&arr.additional_items, options));
            }
            if let Some(n) = arr.metadata.min_items {
                o.insert("minItems".into(), Value::from(n));
            }
            if let Some(n) = arr.metadata.max_items {
                o.insert("maxItems".into(), Value::from(n));
            }
            if arr.metadata.unique_items {
                o.insert("uniqueItems".into(), Value::Bool(true));
            }
        }
        SchemaType::AllOf(all) => {
            o.insert("allOf".into(), Value::Array(all.subschemas.iter().map(nested).collect()));
            if all.is_abstract {
                o.insert("x-abstract".into(), Value::Bool(true));
            }
        }
        SchemaType::OneOf(one) => {
            o.insert("oneOf".into(), Value::Array(one.subschemas.iter().map(nested).collect()));
            if one.is_abstract {
                o.insert("x-abstract".into(), Value::Bool(true));
            }
        }
        SchemaType::String(format, m) => {
            o.insert("type".into(), Value::from("string"));
            if let Some(f) = format {
                o.insert("format".into(), Value::from(f.as_str()));
            }
            emit_string(m, o);
        }
        SchemaType::Number(format, m) => {
            o.insert("type".into(), Value::from("number"));
            if let Some(f) = format {
                o.insert("format".into(), Value::from(f.as_str()));
            }
            emit_numeric(m, o);
        }
        SchemaType::Integer(format, m) => {
            o.insert("type".into(), Value::from("integer"));
            if let Some(f) = format {
                o.insert("format".into(), Value::from(f.as_str()));
            }
            emit_numeric(m, o);
        }
        // values are carried by `enum` in the metadata
        SchemaType::Enumeration => {}
        SchemaType::Boolean => {
            o.insert("type".into(), Value::from("boolean"));
        }
        SchemaType::File => {
            o.insert("type".into(), Value::from("file"));
        }
        SchemaType::Any => {}
        SchemaType::Null => {
            o.insert("type".into(), Value::from("null"));
        }
    }
}

fn emit_object(obj: &ObjectSchema, options: &ParseOptions, o: &mut Map<String, Value>) {
    o.insert("type".into(), Value::from("object"));
    if !obj.required.is_empty() {
        o.insert(
            "required".into(),
            Value::Array(obj.required.iter().cloned().map(Value::from).collect()),
        );
    }
    if !obj.properties.is_empty() {
        let props: Map<String, Value> = obj
            .ordered_properties()
            .map(|(name, s)| (name.to_string(), schema_to_json_with(s, options)))
            .collect();
        o.insert("properties".into(), Value::Object(props));
    }
    if let BoolOr::Schema(_) | BoolOr::Bool(true) = obj.additional_properties {
        o.insert("additionalProperties".into(), bool_or(&obj.additional_properties, options));
    }
    if let Some(n) = obj.metadata.min_properties {
        o.insert("minProperties".into(), Value::from(n));
    }
    if let Some(n) = obj.metadata.max_properties {
        o.insert("maxProperties".into(), Value::from(n));
    }
    if let Some(d) = &obj.metadata.discriminator {
        o.insert("discriminator".into(), Value::from(d.clone()));
    }
    if obj.metadata.is_abstract {
        o.insert("x-abstract".into(), Value::Bool(true));
    }
}

fn bool_or(v: &BoolOr<Box<Schema>>, options: &ParseOptions) -> Value {
    match v {
        BoolOr::Bool(flag) => Value::Bool(*flag),
        BoolOr::Schema(s) => schema_to_json_with(s, options),
    }
}

fn emit_string(m: &StringMetadata, o: &mut Map<String, Value>) {
    if let Some(n) = m.min_length {
        o.insert("minLength".into(), Value::from(n));
    }
    if let Some(n) = m.max_length {
        o.insert("maxLength".into(), Value::from(n));
    }
    if let Some(p) = &m.pattern {
        o.insert("pattern".into(), Value::from(p.clone()));
    }
}

fn emit_numeric<T: Copy + Into<Value>>(m: &NumericMetadata<T>, o: &mut Map<String, Value>) {
    if let Some(n) = m.minimum {
        o.insert("minimum".into(), n.into());
    }
    if m.exclusive_minimum {
        o.insert("exclusiveMinimum".into(), Value::Bool(true));
    }
    if let Some(n) = m.maximum {
        o.insert("maximum".into(), n.into());
    }
    if m.exclusive_maximum {
        o.insert("exclusiveMaximum".into(), Value::Bool(true));
    }
    if let Some(n) = m.multiple_of {
        o.insert("multipleOf".into(), n.into());
    }
}
