use super::obj::{AdditionalBuilder, additional};
use super::{SchemaBuilder, opt_bool, opt_u64, schema_list};
use crate::error::{Result, SchemaError};
use crate::model::ArrayMetadata;
use crate::raw::{RawNode, child_path};

#[derive(Debug, Clone)]
pub struct ArraySchemaBuilder {
    pub metadata: ArrayMetadata,
    pub items: ArrayItemsBuilder,
    pub additional_items: AdditionalBuilder,
}

#[derive(Debug, Clone)]
pub enum ArrayItemsBuilder {
    One(Box<SchemaBuilder>),
    Many(Vec<SchemaBuilder>),
}

impl ArraySchemaBuilder {
    pub(crate) fn decode<N: RawNode>(node: &N, at: &str) -> Result<Self> {
        let items_at = child_path(at, "items");
        let items = match node.get("items") {
            None => return Err(SchemaError::malformed(at, "array schema without `items`")),
            Some(items) if items.is_map() => {
                ArrayItemsBuilder::One(Box::new(SchemaBuilder::decode(items, &items_at)?))
            }
            Some(items) if items.items().is_some() => {
                ArrayItemsBuilder::Many(schema_list(Some(items), &items_at)?)
            }
            Some(items) => {
                return Err(SchemaError::malformed(
                    &items_at,
                    format!("expected a schema or a sequence of schemas, found {}", items.kind()),
                ));
            }
        };
        Ok(Self {
            metadata: ArrayMetadata {
                min_items: opt_u64(node, "minItems", at)?,
                max_items: opt_u64(node, "maxItems", at)?,
                unique_items: opt_bool(node, "uniqueItems", at)?.unwrap_or(false),
            },
            items,
            additional_items: additional(node, "additionalItems", at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SchemaTypeBuilder;
    use crate::model::BoolOr;
    use serde_json::json;

    #[test]
    fn single_item_schema() {
        let a = ArraySchemaBuilder::decode(
            &json!({"type": "array", "items": {"type": "string"}, "minItems": 1, "uniqueItems": true}),
            "",
        )
        .unwrap();
        match a.items {
            ArrayItemsBuilder::One(item) => assert!(matches!(item.ty, SchemaTypeBuilder::String(..))),
            other => panic!("expected one, got {other:?}"),
        }
        assert_eq!(a.metadata.min_items, Some(1));
        assert_eq!(a.metadata.max_items, None);
        assert!(a.metadata.unique_items);
        assert!(matches!(a.additional_items, BoolOr::Bool(false)));
    }

    #[test]
    fn tuple_items_keep_order() {
        let a = ArraySchemaBuilder::decode(
            &json!({"items": [{"type": "integer"}, {"type": "boolean"}], "additionalItems": true}),
            "",
        )
        .unwrap();
        match a.items {
            ArrayItemsBuilder::Many(items) => {
                assert!(matches!(items[0].ty, SchemaTypeBuilder::Integer(..)));
                assert!(matches!(items[1].ty, SchemaTypeBuilder::Boolean));
            }
            other => panic!("expected many, got {other:?}"),
        }
        assert!(matches!(a.additional_items, BoolOr::Bool(true)));
    }

    #[test]
    fn missing_or_scalar_items_is_malformed() {
        let err = ArraySchemaBuilder::decode(&json!({"type": "array"}), "/a").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { ref at, .. } if at == "/a"));
        let err = ArraySchemaBuilder::decode(&json!({"items": "string"}), "/a").unwrap_err();
        assert!(matches!(err, SchemaError::MalformedNode { ref at, .. } if at == "/a/items"));
    }
}
